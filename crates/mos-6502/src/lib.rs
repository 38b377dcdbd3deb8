//! Cycle-accurate MOS 6502 as found in the Ricoh 2A03.
//!
//! Every `tick()` is one bus cycle. The 256-slot [`OPCODES`] table pairs
//! each opcode with an addressing-mode sequencer and an [`Operation`];
//! undocumented opcodes are implemented, JAM slots stop the CPU with a
//! [`CpuFault`]. The decimal flag is stored but ignored by arithmetic.

mod cpu;
mod error;
pub mod flags;
mod instruction;
mod interrupt;
mod latch;
mod ops;
mod registers;
mod sequencer;
mod table;

pub use cpu::Mos6502;
pub use error::CpuFault;
pub use flags::Status;
pub use instruction::{Access, Condition, Index, Instruction, Mode, Operation};
pub use interrupt::Interrupt;
pub use latch::Latches;
pub use registers::Registers;
pub use table::OPCODES;
