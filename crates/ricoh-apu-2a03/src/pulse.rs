//! Pulse (square wave) channels.

use crate::channel::Channel;
use crate::envelope::Envelope;
use crate::length::LengthCounter;
use crate::sweep::{PulseUnit, Sweep};
use crate::tables::DUTY_MASKS;

#[derive(Debug, Clone)]
pub struct Pulse {
    period: u16,
    timer: u16,
    phase: u8,
    duty: u8,
    pub(crate) envelope: Envelope,
    pub(crate) length: LengthCounter,
    sweep: Sweep,
}

impl Pulse {
    #[must_use]
    pub fn new(unit: PulseUnit) -> Self {
        Self {
            period: 0,
            timer: 0,
            phase: 0,
            duty: 0,
            envelope: Envelope::default(),
            length: LengthCounter::default(),
            sweep: Sweep::new(unit),
        }
    }

    #[must_use]
    pub fn period(&self) -> u16 {
        self.period
    }

    #[must_use]
    pub fn duty(&self) -> u8 {
        self.duty
    }
}

impl Channel for Pulse {
    /// One APU cycle (every other CPU cycle).
    fn step(&mut self) {
        if self.timer == 0 {
            self.timer = self.period;
            self.phase = (self.phase + 1) & 0x07;
        } else {
            self.timer -= 1;
        }
    }

    fn quarter_frame(&mut self) {
        self.envelope.clock();
    }

    fn half_frame(&mut self) {
        self.length.clock();
        self.period = self.sweep.clock(self.period);
    }

    fn write(&mut self, register: u8, value: u8) {
        match register & 0x03 {
            0 => {
                self.duty = value >> 6;
                self.length.halt = value & 0x20 != 0;
                self.envelope.write_control(value);
            }
            1 => self.sweep.write(value),
            2 => self.period = (self.period & 0x0700) | u16::from(value),
            _ => {
                self.period = (self.period & 0x00FF) | (u16::from(value & 0x07) << 8);
                self.length.load(value >> 3);
                self.envelope.start = true;
                self.phase = 0;
            }
        }
    }

    fn level(&self) -> u8 {
        let high = (DUTY_MASKS[usize::from(self.duty)] >> self.phase) & 1 != 0;
        if !self.length.is_active() || self.sweep.mutes(self.period) || !high {
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

    fn playing(duty: u8) -> Pulse {
        let mut pulse = Pulse::new(PulseUnit::One);
        pulse.set_enabled(true);
        // Constant volume 9
        pulse.write(0, (duty << 6) | 0x19);
        pulse.write(2, 0x40);
        pulse.write(3, 0x08);
        pulse
    }

    fn waveform(pulse: &mut Pulse) -> Vec<u8> {
        (0..8)
            .map(|_| {
                let level = pulse.level();
                for _ in 0..=0x40 {
                    pulse.step();
                }
                level
            })
            .collect()
    }

    #[test]
    fn fifty_percent_duty_is_high_for_four_phases() {
        let mut pulse = playing(2);
        let wave = waveform(&mut pulse);
        assert_eq!(wave.iter().filter(|&&l| l == 9).count(), 4);
    }

    #[test]
    fn seventy_five_percent_is_inverted_twenty_five() {
        let mut quarter = playing(1);
        let mut three_quarter = playing(3);
        let a = waveform(&mut quarter);
        let b = waveform(&mut three_quarter);
        for (x, y) in a.iter().zip(&b) {
            assert_ne!(*x == 0, *y == 0);
        }
    }

    #[test]
    fn silent_once_disabled() {
        let mut pulse = playing(3);
        pulse.set_enabled(false);
        assert_eq!(pulse.level(), 0);
        assert!(!pulse.is_active());
    }
}
