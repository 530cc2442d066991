//! Button input: interrupt events, debouncing and the button pad driver.

pub mod debounce;
pub mod queue;

#[cfg(feature = "hal")]
pub mod buttons;

pub use debounce::{Debouncer, Press};
pub use queue::{Button, Event, EventQueue};

#[cfg(feature = "hal")]
pub use buttons::{ButtonPad, Presses};
