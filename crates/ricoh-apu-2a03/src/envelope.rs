//! Decay envelope shared by the pulse and noise channels.

/// Counts 15 down to 0 at quarter-frame rate, optionally looping.
#[derive(Debug, Clone, Default)]
pub(crate) struct Envelope {
    pub(crate) start: bool,
    divider: u8,
    decay: u8,
    /// Constant volume, or the divider period when decaying.
    volume: u8,
    constant: bool,
    /// Shared with the length counter's halt bit.
    looping: bool,
}

impl Envelope {
    /// Apply the low six bits of a channel's control register.
    pub(crate) fn write_control(&mut self, value: u8) {
        self.looping = value & 0x20 != 0;
        self.constant = value & 0x10 != 0;
        self.volume = value & 0x0F;
    }

    pub(crate) fn clock(&mut self) {
        if self.start {
            self.start = false;
            self.decay = 15;
            self.divider = self.volume;
        } else if self.divider == 0 {
            self.divider = self.volume;
            if self.decay > 0 {
                self.decay -= 1;
            } else if self.looping {
                self.decay = 15;
            }
        } else {
            self.divider -= 1;
        }
    }

    pub(crate) fn level(&self) -> u8 {
        if self.constant { self.volume } else { self.decay }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_then_holds_at_zero() {
        let mut env = Envelope::default();
        env.write_control(0x00);
        env.start = true;
        env.clock();
        assert_eq!(env.level(), 15);
        for _ in 0..15 {
            env.clock();
        }
        assert_eq!(env.level(), 0);
        env.clock();
        assert_eq!(env.level(), 0);
    }

    #[test]
    fn loop_flag_wraps_to_fifteen() {
        let mut env = Envelope::default();
        env.write_control(0x20);
        env.start = true;
        for _ in 0..17 {
            env.clock();
        }
        assert_eq!(env.level(), 15);
    }

    #[test]
    fn constant_volume_ignores_decay() {
        let mut env = Envelope::default();
        env.write_control(0x17);
        env.start = true;
        env.clock();
        env.clock();
        assert_eq!(env.level(), 7);
    }
}
