//! NES configuration.

use ricoh_apu_2a03::Region;

/// Video region. Determines frame timing and APU rates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NesRegion {
    /// 60 Hz, 262 scanlines, 1,789,773 Hz CPU.
    #[default]
    Ntsc,
    /// 50 Hz, 312 scanlines, 1,662,607 Hz CPU.
    Pal,
}

impl NesRegion {
    /// Master crystal frequency in Hz.
    #[must_use]
    pub const fn crystal_hz(self) -> u64 {
        match self {
            Self::Ntsc => 21_477_272,
            Self::Pal => 26_601_712,
        }
    }

    /// Crystal ticks per CPU cycle.
    #[must_use]
    pub const fn cpu_divisor(self) -> u64 {
        match self {
            Self::Ntsc => 12,
            Self::Pal => 16,
        }
    }

    /// Crystal ticks per PPU dot.
    #[must_use]
    pub const fn ppu_divisor(self) -> u64 {
        match self {
            Self::Ntsc => 4,
            Self::Pal => 5,
        }
    }

    /// Scanlines per frame, including vblank and pre-render.
    #[must_use]
    pub const fn scanlines_per_frame(self) -> u16 {
        match self {
            Self::Ntsc => 262,
            Self::Pal => 312,
        }
    }

    /// CPU clock in Hz: crystal over the CPU divisor, rounded to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn cpu_hz(self) -> u32 {
        let divisor = self.cpu_divisor();
        ((self.crystal_hz() + divisor / 2) / divisor) as u32
    }

    /// Crystal ticks in one frame.
    #[must_use]
    pub const fn ticks_per_frame(self) -> u64 {
        ricoh_ppu_2c02::DOTS_PER_LINE as u64 * self.scanlines_per_frame() as u64 * self.ppu_divisor()
    }

    #[must_use]
    pub const fn apu_region(self) -> Region {
        match self {
            Self::Ntsc => Region::Ntsc,
            Self::Pal => Region::Pal,
        }
    }
}

/// Default power-on seed when none is supplied.
pub const DEFAULT_SEED: u64 = 0x2A03_6502;

/// Machine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NesConfig {
    pub region: NesRegion,
    /// Seed for power-on register contents.
    pub seed: u64,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Speed multiplier. Zero or negative runs unpaced.
    pub throttle: f32,
    /// Treat running behind the frame deadline as fatal.
    pub strict_timing: bool,
    /// Frames behind the deadline tolerated before a shortfall is declared.
    pub lag_tolerance_frames: u32,
}

impl Default for NesConfig {
    fn default() -> Self {
        Self {
            region: NesRegion::Ntsc,
            seed: DEFAULT_SEED,
            sample_rate: 48_000,
            throttle: 1.0,
            strict_timing: false,
            lag_tolerance_frames: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_dots_per_cpu_cycle_on_ntsc() {
        let r = NesRegion::Ntsc;
        assert_eq!(r.cpu_divisor() / r.ppu_divisor(), 3);
        // 21,477,272 / 12 = 1,789,772.67
        assert_eq!(r.cpu_hz(), 1_789_773);
    }

    #[test]
    fn cpu_rate_agrees_with_apu_region() {
        for r in [NesRegion::Ntsc, NesRegion::Pal] {
            assert_eq!(r.cpu_hz(), r.apu_region().cpu_hz(), "{r:?}");
        }
    }

    #[test]
    fn pal_timing() {
        let r = NesRegion::Pal;
        assert_eq!(r.cpu_hz(), 1_662_607);
        assert_eq!(r.ticks_per_frame(), 341 * 312 * 5);
        assert_eq!(r.apu_region(), Region::Pal);
    }

    #[test]
    fn ntsc_frame_is_89342_dots() {
        assert_eq!(NesRegion::Ntsc.ticks_per_frame() / 4, 89_342);
    }
}
