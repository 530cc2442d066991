//! Fatal-error handling.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Half-period of the fault blink.
pub const HALT_BLINK_MS: u32 = 250;

/// Blink `led` forever.
///
/// For failures there is no way to recover from, such as a display driver
/// that fails to initialise. Pin errors are ignored: there is nowhere left
/// to report them.
///
/// # Example
/// ```ignore
/// if panel.init().is_err() {
///     beatbox::halt(&mut led, &mut delay);
/// }
/// ```
pub fn halt<L, D>(led: &mut L, delay: &mut D) -> !
where
    L: OutputPin,
    D: DelayNs,
{
    error!("halted");
    loop {
        blink_once(led, delay);
    }
}

fn blink_once<L, D>(led: &mut L, delay: &mut D)
where
    L: OutputPin,
    D: DelayNs,
{
    let _ = led.set_high();
    delay.delay_ms(HALT_BLINK_MS);
    let _ = led.set_low();
    delay.delay_ms(HALT_BLINK_MS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct MockLed {
        high: bool,
        toggles: usize,
    }

    impl ErrorType for MockLed {
        type Error = Infallible;
    }

    impl OutputPin for MockLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.toggles += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.toggles += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn one_blink_period() {
        let mut led = MockLed::default();
        let mut delay = MockDelay::default();
        blink_once(&mut led, &mut delay);
        assert_eq!(led.toggles, 2);
        assert!(!led.high);
        assert_eq!(delay.total_ns, 2 * HALT_BLINK_MS as u64 * 1_000_000);
    }
}
