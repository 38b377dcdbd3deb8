//! Triangle channel.

use crate::channel::Channel;
use crate::length::LengthCounter;

/// 32-step triangle. The timer is clocked every CPU cycle.
#[derive(Debug, Clone, Default)]
pub struct Triangle {
    period: u16,
    timer: u16,
    phase: u8,
    pub(crate) length: LengthCounter,
    linear: u8,
    linear_reload_value: u8,
    linear_reload: bool,
    /// Also halts the length counter.
    control: bool,
}

/// Output for a 5-bit sequencer phase: 15 down to 0, then 0 up to 15.
/// Inverting the low four bits during the first half folds a ramp into a
/// triangle.
#[must_use]
pub const fn sequence_level(phase: u8) -> u8 {
    let ramp = phase & 0x0F;
    if phase & 0x10 == 0 { ramp ^ 0x0F } else { ramp }
}

impl Triangle {
    #[must_use]
    pub fn period(&self) -> u16 {
        self.period
    }

    #[must_use]
    pub fn linear_counter(&self) -> u8 {
        self.linear
    }
}

impl Channel for Triangle {
    fn step(&mut self) {
        if self.timer == 0 {
            self.timer = self.period;
            if self.length.is_active() && self.linear > 0 {
                self.phase = (self.phase + 1) & 0x1F;
            }
        } else {
            self.timer -= 1;
        }
    }

    fn quarter_frame(&mut self) {
        if self.linear_reload {
            self.linear = self.linear_reload_value;
        } else if self.linear > 0 {
            self.linear -= 1;
        }
        if !self.control {
            self.linear_reload = false;
        }
    }

    fn half_frame(&mut self) {
        self.length.clock();
    }

    fn write(&mut self, register: u8, value: u8) {
        match register & 0x03 {
            0 => {
                self.control = value & 0x80 != 0;
                self.length.halt = self.control;
                self.linear_reload_value = value & 0x7F;
            }
            1 => {}
            2 => self.period = (self.period & 0x0700) | u16::from(value),
            _ => {
                self.period = (self.period & 0x00FF) | (u16::from(value & 0x07) << 8);
                self.length.load(value >> 3);
                self.linear_reload = true;
            }
        }
    }

    fn level(&self) -> u8 {
        // Periods under 2 are ultrasonic and silenced
        if !self.length.is_active() || self.linear == 0 || self.period < 2 {
            return 0;
        }
        sequence_level(self.phase)
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.length.set_enabled(enabled);
    }

    fn is_active(&self) -> bool {
        self.length.is_active()
    }
}
