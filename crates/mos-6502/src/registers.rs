//! 6502 register file.

use rand::Rng;

use crate::Status;
use crate::flags::{I, U};

/// 6502 programmer-visible registers.
///
/// - A: accumulator
/// - X, Y: index registers
/// - S: stack pointer into page 1 ($0100-$01FF)
/// - PC: program counter, addressable as PCL/PCH halves
/// - P: status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Points at the next free stack slot.
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Deterministic post-reset state: zeroed A/X/Y, S = $FD, I set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status(U | I),
        }
    }

    /// Power-on contents. Real silicon comes up with whatever the
    /// transistors settle to, so every register is drawn from `rng`.
    pub fn power_on(rng: &mut impl Rng) -> Self {
        Self {
            a: rng.random(),
            x: rng.random(),
            y: rng.random(),
            s: rng.random(),
            pc: rng.random(),
            p: Status::from_byte(rng.random()),
        }
    }

    #[must_use]
    pub const fn pcl(&self) -> u8 {
        self.pc as u8
    }

    #[must_use]
    pub const fn pch(&self) -> u8 {
        (self.pc >> 8) as u8
    }

    /// Replace the low byte of PC, leaving the high byte untouched.
    pub fn set_pcl(&mut self, value: u8) {
        self.pc = (self.pc & 0xFF00) | u16::from(value);
    }

    /// Replace the high byte of PC, leaving the low byte untouched.
    pub fn set_pch(&mut self, value: u8) {
        self.pc = (self.pc & 0x00FF) | (u16::from(value) << 8);
    }

    /// Return PC and post-increment it.
    pub fn next_pc(&mut self) -> u16 {
        let pc = self.pc;
        self.pc = self.pc.wrapping_add(1);
        pc
    }

    /// Push slot address; decrements S.
    pub fn push(&mut self) -> u16 {
        let addr = self.stack_addr();
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Pull slot address; increments S first.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        self.stack_addr()
    }

    /// Address S currently points at.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        0x0100 | (self.s as u16)
    }
}
