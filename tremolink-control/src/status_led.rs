/// Input silence after which the indicator starts blinking.
pub const IDLE_TIMEOUT_US: u64 = 5_000_000;

/// Half-period of the idle blink.
pub const BLINK_TOGGLE_US: u64 = 1_000_000;

/// Status indicator level: solid while a mode is active, a slow blink once
/// the input has been silent for [`IDLE_TIMEOUT_US`], otherwise off.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLed {
    level: bool,
    last_toggle_us: u64,
}

impl StatusLed {
    pub const fn new() -> Self {
        Self {
            level: false,
            last_toggle_us: 0,
        }
    }

    /// Computes the pin level for this iteration. `last_input_us` is when the
    /// controller last saw any input activity.
    pub fn poll(&mut self, active: bool, last_input_us: u64, now_us: u64) -> bool {
        if active {
            self.level = true;
            self.last_toggle_us = now_us;
        } else if now_us.saturating_sub(last_input_us) > IDLE_TIMEOUT_US {
            if now_us - self.last_toggle_us >= BLINK_TOGGLE_US {
                self.level = !self.level;
                self.last_toggle_us = now_us;
            }
        } else {
            self.level = false;
            self.last_toggle_us = now_us;
        }
        self.level
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
