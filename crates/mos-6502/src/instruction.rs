//! Opcode descriptors.
//!
//! Each of the 256 opcode slots maps to an [`Instruction`]: either an
//! addressing mode wrapped around an [`Operation`], or one of the
//! instructions with a bespoke cycle sequence (branches, stack and flow
//! control, interrupts, JAM).

use crate::Mos6502;
use crate::interrupt::Interrupt;

/// How an operation uses its memory operand. This decides the cycle
/// shape the addressing-mode sequencer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Operand is read, then the operation runs. Indexed modes may finish
    /// a cycle early when no page is crossed.
    Read,
    /// The operation produces a byte that is written. Indexed modes always
    /// pay the fix-up cycle.
    Write,
    /// Read, write the old value back while modifying, write the result.
    ReadModifyWrite,
}

/// An operation paired with its bus access class.
///
/// `exec` works on the CPU's latches: read operations consume
/// `latch.data`, write operations leave the byte to store in `latch.data`,
/// read-modify-write operations transform `latch.data` in place.
#[derive(Clone, Copy)]
pub struct Operation {
    pub mnemonic: &'static str,
    pub access: Access,
    pub(crate) exec: fn(&mut Mos6502),
}

impl Operation {
    pub(crate) const fn read(mnemonic: &'static str, exec: fn(&mut Mos6502)) -> Self {
        Self {
            mnemonic,
            access: Access::Read,
            exec,
        }
    }

    pub(crate) const fn write(mnemonic: &'static str, exec: fn(&mut Mos6502)) -> Self {
        Self {
            mnemonic,
            access: Access::Write,
            exec,
        }
    }

    pub(crate) const fn modify(mnemonic: &'static str, exec: fn(&mut Mos6502)) -> Self {
        Self {
            mnemonic,
            access: Access::ReadModifyWrite,
            exec,
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("mnemonic", &self.mnemonic)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    X,
    Y,
}

/// Memory addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Immediate,
    ZeroPage,
    ZeroPageIndexed(Index),
    Absolute,
    AbsoluteIndexed(Index),
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
}

impl Mode {
    /// Sequencer name used in fault reports.
    #[must_use]
    pub const fn sequencer(self) -> &'static str {
        match self {
            Mode::Immediate => "immediate",
            Mode::ZeroPage => "direct-page",
            Mode::ZeroPageIndexed(_) => "direct-page-indexed",
            Mode::Absolute => "absolute",
            Mode::AbsoluteIndexed(_) => "absolute-indexed",
            Mode::IndexedIndirect => "indexed-indirect",
            Mode::IndirectIndexed => "indirect-indexed",
        }
    }
}

/// Branch condition: taken when `flag` is in state `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub flag: u8,
    pub set: bool,
}

/// One opcode slot.
#[derive(Debug, Clone, Copy)]
pub enum Instruction {
    Memory(Mode, Operation),
    /// Register-only operation after a dummy read of the next byte.
    Implied(Operation),
    /// Read-modify-write operation applied to A.
    Accumulator(Operation),
    Branch(Condition),
    /// PHA/PHP: the operation yields the byte to push.
    Push(Operation),
    /// PLA/PLP: the operation consumes the pulled byte.
    Pull(Operation),
    Jsr,
    Rts,
    Rti,
    JmpAbsolute,
    JmpIndirect,
    /// BRK, and the hardware sequences injected at instruction boundaries.
    Interrupt(Interrupt),
    Jam,
}

impl Instruction {
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Memory(_, op)
            | Instruction::Implied(op)
            | Instruction::Accumulator(op)
            | Instruction::Push(op)
            | Instruction::Pull(op) => op.mnemonic,
            Instruction::Branch(cond) => branch_mnemonic(*cond),
            Instruction::Jsr => "JSR",
            Instruction::Rts => "RTS",
            Instruction::Rti => "RTI",
            Instruction::JmpAbsolute | Instruction::JmpIndirect => "JMP",
            Instruction::Interrupt(kind) => kind.name(),
            Instruction::Jam => "JAM",
        }
    }

    #[must_use]
    pub fn is_jam(&self) -> bool {
        matches!(self, Instruction::Jam)
    }
}

fn branch_mnemonic(cond: Condition) -> &'static str {
    use crate::flags::{C, N, V, Z};
    match (cond.flag, cond.set) {
        (N, false) => "BPL",
        (N, true) => "BMI",
        (V, false) => "BVC",
        (V, true) => "BVS",
        (C, false) => "BCC",
        (C, true) => "BCS",
        (Z, false) => "BNE",
        (Z, true) => "BEQ",
        _ => "B??",
    }
}
