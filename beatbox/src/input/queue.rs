//! Interrupt-to-main-loop event queue.
//!
//! Edge and timer interrupts [`push`](EventQueue::push) typed events; the
//! main loop [`pop`](EventQueue::pop)s and dispatches them. This replaces
//! callback registration: interrupt handlers only timestamp what happened.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`push()`](EventQueue::push) (the producer).
//! - Only ONE context may call [`pop()`](EventQueue::pop) (the consumer).
//!
//! With several interrupt sources, give each its own queue or run them at
//! the same priority so they cannot preempt each other.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// One of the five front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Select,
}

impl Button {
    pub const ALL: [Button; 5] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Select,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Something an interrupt observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A button pin changed level (either direction).
    ButtonEdge { button: Button, at_us: u64 },
    /// A periodic timer fired.
    TimerTick { at_us: u64 },
}

/// Lock-free single-producer single-consumer ring of [`Event`]s.
///
/// Usable capacity is `N - 1`: one slot stays empty to tell full from empty.
pub struct EventQueue<const N: usize> {
    slots: [UnsafeCell<Event>; N],
    /// Next slot to write (producer only).
    head: AtomicUsize,
    /// Next slot to read (consumer only).
    tail: AtomicUsize,
}

// SAFETY: the producer only writes the slot at `head` before publishing it
// with a Release store; the consumer only reads the slot at `tail` after an
// Acquire load shows it published. No slot is accessed from both sides at
// once under the single-producer single-consumer contract.
unsafe impl<const N: usize> Sync for EventQueue<N> {}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue. `N` must be at least 2.
    pub const fn new() -> Self {
        assert!(N >= 2, "event queue needs at least 2 slots (1 usable)");
        const IDLE: UnsafeCell<Event> = UnsafeCell::new(Event::TimerTick { at_us: 0 });
        EventQueue {
            slots: [IDLE; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Enqueue from the producer side. Returns the event back when full.
    pub fn push(&self, event: Event) -> Result<(), Event> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;
        if next == self.tail.load(Ordering::Acquire) {
            return Err(event);
        }
        // SAFETY: sole producer; `next != tail` means the consumer is not
        // reading this slot.
        unsafe {
            *self.slots[head].get() = event;
        }
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Dequeue from the consumer side.
    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: sole consumer; `tail != head` means the slot was published.
        let event = unsafe { *self.slots[tail].get() };
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % N == tail
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
