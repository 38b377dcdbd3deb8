//! CPU fault taxonomy.

use thiserror::Error;

/// A condition that stops the CPU.
///
/// Neither kind is recoverable mid-instruction. The CPU parks itself and
/// the owning system is expected to shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuFault {
    /// A sequencer was stepped past the cycles it defines. Always an
    /// emulator bug, never something a program can cause.
    #[error("{sequencer} sequencer stepped on undefined cycle {cycle}")]
    Timing {
        sequencer: &'static str,
        cycle: u8,
    },
    /// A JAM opcode was executed. Real hardware locks up here.
    #[error("CPU jammed on opcode ${opcode:02X} at ${pc:04X}")]
    Jam { opcode: u8, pc: u16 },
}
