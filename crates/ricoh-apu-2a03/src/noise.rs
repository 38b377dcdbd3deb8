//! Noise channel.

use crate::Region;
use crate::channel::Channel;
use crate::envelope::Envelope;
use crate::length::LengthCounter;
use crate::tables::noise_periods;

/// Pseudo-random channel driven by a 15-bit LFSR. Feedback is bit 0 XOR
/// bit 1, or bit 0 XOR bit 6 in short mode.
#[derive(Debug, Clone)]
pub struct Noise {
    periods: &'static [u16; 16],
    period: u16,
    timer: u16,
    shift: u16,
    short_mode: bool,
    pub(crate) envelope: Envelope,
    pub(crate) length: LengthCounter,
}

impl Noise {
    #[must_use]
    pub fn new(region: Region) -> Self {
        let periods = noise_periods(region);
        Self {
            periods,
            period: periods[0],
            timer: 0,
            shift: 1,
            short_mode: false,
            envelope: Envelope::default(),
            length: LengthCounter::default(),
        }
    }

    #[must_use]
    pub fn period(&self) -> u16 {
        self.period
    }

    #[must_use]
    pub fn shift_register(&self) -> u16 {
        self.shift
    }
}

impl Channel for Noise {
    /// One CPU cycle. Periods are in CPU cycles.
    fn step(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            return;
        }
        self.timer = self.period.saturating_sub(1);
        let tap = if self.short_mode { 6 } else { 1 };
        let feedback = (self.shift ^ (self.shift >> tap)) & 1;
        self.shift = (self.shift >> 1) | (feedback << 14);
    }

    fn quarter_frame(&mut self) {
        self.envelope.clock();
    }

    fn half_frame(&mut self) {
        self.length.clock();
    }

    fn write(&mut self, register: u8, value: u8) {
        match register & 0x03 {
            0 => {
                self.length.halt = value & 0x20 != 0;
                self.envelope.write_control(value);
            }
            1 => {}
            2 => {
                self.short_mode = value & 0x80 != 0;
                self.period = self.periods[usize::from(value & 0x0F)];
            }
            _ => {
                self.length.load(value >> 3);
                self.envelope.start = true;
            }
        }
    }

    fn level(&self) -> u8 {
        // Bit 0 set silences the output
        if !self.length.is_active() || self.shift & 1 != 0 {
            return 0;
        }
        self.envelope.level()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.length.set_enabled(enabled);
    }

    fn is_active(&self) -> bool {
        self.length.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_lfsr(noise: &mut Noise) {
        noise.timer = 0;
        noise.step();
    }

    #[test]
    fn long_mode_sequence_has_full_period() {
        let mut noise = Noise::new(Region::Ntsc);
        let start = noise.shift_register();
        let mut steps = 0u32;
        loop {
            clock_lfsr(&mut noise);
            steps += 1;
            if noise.shift_register() == start {
                break;
            }
            assert!(steps < 40_000);
        }
        assert_eq!(steps, 32_767);
    }

    #[test]
    fn short_mode_repeats_quickly() {
        let mut noise = Noise::new(Region::Ntsc);
        noise.write(2, 0x80);
        let start = noise.shift_register();
        let mut steps = 0u32;
        loop {
            clock_lfsr(&mut noise);
            steps += 1;
            if noise.shift_register() == start {
                break;
            }
            assert!(steps < 40_000);
        }
        assert_eq!(steps, 93);
    }

    #[test]
    fn region_selects_period_table() {
        let mut ntsc = Noise::new(Region::Ntsc);
        let mut pal = Noise::new(Region::Pal);
        ntsc.write(2, 0x0F);
        pal.write(2, 0x0F);
        assert_eq!(ntsc.period(), 4068);
        assert_eq!(pal.period(), 3778);
    }

    /// CPU cycles between consecutive LFSR clocks.
    fn clock_gaps(noise: &mut Noise, cycles: u32) -> Vec<u32> {
        let mut gaps = Vec::new();
        let mut last = None;
        let mut previous = noise.shift_register();
        for cycle in 0..cycles {
            noise.step();
            if noise.shift_register() != previous {
                if let Some(at) = last {
                    gaps.push(cycle - at);
                }
                last = Some(cycle);
                previous = noise.shift_register();
            }
        }
        gaps
    }

    #[test]
    fn lfsr_clocks_at_table_period_in_cpu_cycles() {
        let mut fast = Noise::new(Region::Ntsc);
        let gaps = clock_gaps(&mut fast, 40);
        assert!(!gaps.is_empty());
        assert!(gaps.iter().all(|&g| g == 4), "{gaps:?}");

        let mut slow = Noise::new(Region::Ntsc);
        slow.write(2, 0x0F);
        let gaps = clock_gaps(&mut slow, 4068 * 4);
        assert!(gaps.iter().all(|&g| g == 4068), "{gaps:?}");
    }
}
