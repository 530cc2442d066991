//! Front-panel button pad.
//!
//! Five active-low buttons read through [`embedded_hal::digital::InputPin`],
//! each with its own [`Debouncer`]. Call [`ButtonPad::poll`] once per
//! main-loop iteration.

use embedded_hal::digital::InputPin;

use super::debounce::{Debouncer, Press};
use super::queue::{Button, Event};

/// Presses completed during one poll, at most one per button.
pub type Presses = heapless::Vec<(Button, Press), 5>;

/// The five buttons, indexed by [`Button::index`].
pub struct ButtonPad<P> {
    pins: [P; 5],
    debouncers: [Debouncer; 5],
}

impl<P> ButtonPad<P>
where
    P: InputPin,
{
    /// `pins` in [`Button::ALL`] order: left, right, up, down, select.
    pub fn new(pins: [P; 5]) -> Self {
        Self {
            pins,
            debouncers: [Debouncer::new(); 5],
        }
    }

    /// Feed an interrupt event. Timer ticks are ignored.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::ButtonEdge { button, at_us } = *event {
            self.debouncers[button.index()].note_edge(at_us);
        }
    }

    /// Sample every pin and return the presses that completed.
    pub fn poll(&mut self, now_us: u64) -> Result<Presses, P::Error> {
        let mut presses = Presses::new();
        for button in Button::ALL {
            let i = button.index();
            // pulled up: low means pressed
            let pressed = self.pins[i].is_low()?;
            if let Some(press) = self.debouncers[i].update(pressed, now_us) {
                trace!("buttons: {} press {}", i, press == Press::Long);
                // one entry per button, capacity 5
                let _ = presses.push((button, press));
            }
        }
        Ok(presses)
    }

    /// Debounced level of one button.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.debouncers[button.index()].is_pressed()
    }

    pub fn release(self) -> [P; 5] {
        self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Input pin whose level is set by the test through a shared cell.
    struct MockPin<'a> {
        low: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low.get())
        }
    }

    #[test]
    fn reports_short_and_long_presses() {
        let levels: [Cell<bool>; 5] = Default::default();
        let mut pad = ButtonPad::new(core::array::from_fn(|i| MockPin { low: &levels[i] }));

        levels[Button::Select.index()].set(true);
        assert!(pad.poll(0).unwrap().is_empty());
        assert!(pad.poll(20_000).unwrap().is_empty());
        assert!(pad.is_pressed(Button::Select));

        levels[Button::Select.index()].set(false);
        pad.poll(100_000).unwrap();
        let presses = pad.poll(120_000).unwrap();
        assert_eq!(&presses[..], &[(Button::Select, Press::Short)]);

        levels[Button::Up.index()].set(true);
        pad.poll(200_000).unwrap();
        pad.poll(220_000).unwrap();
        levels[Button::Up.index()].set(false);
        pad.poll(700_000).unwrap();
        let presses = pad.poll(720_000).unwrap();
        assert_eq!(&presses[..], &[(Button::Up, Press::Long)]);
    }

    #[test]
    fn edge_events_delay_acceptance() {
        let levels: [Cell<bool>; 5] = Default::default();
        let mut pad = ButtonPad::new(core::array::from_fn(|i| MockPin { low: &levels[i] }));

        levels[Button::Left.index()].set(true);
        pad.poll(0).unwrap();
        pad.handle_event(&Event::ButtonEdge {
            button: Button::Left,
            at_us: 10_000,
        });
        pad.handle_event(&Event::TimerTick { at_us: 11_000 });
        pad.poll(16_000).unwrap();
        assert!(!pad.is_pressed(Button::Left));
        pad.poll(25_000).unwrap();
        assert!(pad.is_pressed(Button::Left));
    }
}
