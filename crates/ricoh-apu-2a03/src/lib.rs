//! Ricoh 2A03 APU.
//!
//! Two pulse channels, a triangle, a noise channel and the delta
//! modulation channel, clocked by a shared frame sequencer and combined
//! by the non-linear mixer. The DMC's memory reads are requested from the
//! owner rather than performed here, so the system decides how many CPU
//! cycles to steal.

mod apu;
mod channel;
mod dmc;
mod envelope;
mod frame;
mod length;
mod mixer;
mod noise;
mod pulse;
mod sweep;
mod tables;
mod triangle;

pub use apu::Apu;
pub use channel::Channel;
pub use dmc::Dmc;
pub use frame::{FrameEvents, FrameMode, FrameSequencer};
pub use mixer::{ChannelLevels, mix};
pub use noise::Noise;
pub use pulse::Pulse;
pub use sweep::PulseUnit;
pub use triangle::{Triangle, sequence_level};

/// Television standard. Selects the CPU clock and timing tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Ntsc,
    Pal,
}

impl Region {
    /// CPU (and APU) clock in Hz, rounded to the nearest cycle.
    #[must_use]
    pub const fn cpu_hz(self) -> u32 {
        match self {
            Region::Ntsc => 1_789_773,
            Region::Pal => 1_662_607,
        }
    }
}
