//! Analog trigger to digital latch filter.
//!
//! The console expects the trigger's digital click bit to agree with the
//! analog depth. A single noisy analog sample above the threshold must not
//! set the bit, so the latch needs two consecutive polls above
//! [`TRIGGER_THRESHOLD`] before it reports pressed, and drops immediately
//! on the first sample at or below it.

/// Raw analog value the trigger must exceed.
pub const TRIGGER_THRESHOLD: u8 = 0x30;

/// Consecutive samples above threshold needed to confirm.
const CONFIRM_COUNT: u8 = 2;

/// Per-trigger hysteresis counter, saturating at 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerLatch(u8);

impl TriggerLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Feed one poll's raw analog reading.
    #[inline]
    pub fn update(&mut self, raw: u8) {
        if raw > TRIGGER_THRESHOLD {
            if self.0 < CONFIRM_COUNT {
                self.0 += 1;
            }
        } else {
            self.0 = 0;
        }
    }

    /// Whether the digital bit may be reported.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        self.0 >= CONFIRM_COUNT
    }

    /// Current counter value, 0..=2.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u8 {
        self.0
    }
}
