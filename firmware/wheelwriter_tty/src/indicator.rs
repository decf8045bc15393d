/// Error Indicator
/// Soft-fault LED that blinks once per second while enabled. The blink is
/// advanced by the clock tick; the main loop only enables or disables it.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::v2::OutputPin;

pub struct Indicator {
    enabled: AtomicBool,
    lit: AtomicBool,
}

impl Indicator {
    pub const fn new() -> Self {
        Indicator {
            enabled: AtomicBool::new(false),
            lit: AtomicBool::new(false),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Stop blinking and force the LED off.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.lit.store(false, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Acquire)
    }

    /// Called once per second from the tick interrupt.
    pub(crate) fn blink(&self) {
        if self.is_enabled() {
            self.lit.fetch_xor(true, Ordering::AcqRel);
        }
    }

    /// Copy the current state to an active-low LED pin.
    pub fn drive<P: OutputPin>(&self, pin: &mut P) -> Result<(), P::Error> {
        if self.is_lit() {
            pin.set_low()
        } else {
            pin.set_high()
        }
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_blink_only_when_enabled() {
        let indicator = Indicator::new();
        indicator.blink();
        assert!(!indicator.is_lit());

        indicator.enable();
        indicator.blink();
        assert!(indicator.is_lit());
        indicator.blink();
        assert!(!indicator.is_lit());
    }

    #[test]
    fn test_disable_forces_off() {
        let indicator = Indicator::new();
        indicator.enable();
        indicator.blink();
        assert!(indicator.is_lit());

        indicator.disable();
        assert!(!indicator.is_enabled());
        assert!(!indicator.is_lit());
        indicator.blink();
        assert!(!indicator.is_lit());
    }

    #[test]
    fn test_drive_is_active_low() {
        let indicator = Indicator::new();
        let mut pin = MockPin { high: false };

        indicator.drive(&mut pin).unwrap();
        assert!(pin.high);

        indicator.enable();
        indicator.blink();
        indicator.drive(&mut pin).unwrap();
        assert!(!pin.high);
    }
}
