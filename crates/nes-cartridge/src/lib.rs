//! NES cartridges.
//!
//! The console only ever talks to a cartridge through [`Cartridge`]:
//! side-effecting CPU reads and writes, a side-effect-free `peek` for DMA,
//! an IRQ line and an optional hook that shapes the mixed audio signal.
//! [`DiscreteCartridge`] is the simplest board: raw program and character
//! ROM images with no bank switching.

mod discrete;
mod error;

pub use discrete::{CHR_SIZE, DiscreteCartridge, PRG_LARGE, PRG_SMALL};
pub use error::{CartridgeError, Rom};

/// Nametable arrangement wired on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
}

/// A cartridge plugged into the CPU bus at `$4020-$FFFF`.
///
/// `cpu_read`/`cpu_write` are bus cycles and may change board state;
/// `peek` must not.
pub trait Cartridge: Send {
    fn cpu_read(&mut self, addr: u16) -> u8;

    fn cpu_write(&mut self, addr: u16, value: u8);

    /// Read without side effects. Used by DMA and state inspection.
    fn peek(&self, addr: u16) -> u8;

    /// Whether the board is asserting IRQ.
    fn irq_pending(&self) -> bool {
        false
    }

    /// Expansion audio hook, applied to every mixed sample.
    fn shape_audio(&self, sample: f32) -> f32 {
        sample
    }

    fn mirroring(&self) -> Mirroring;

    /// Character ROM contents (empty when the board has none).
    fn chr(&self) -> &[u8];
}
