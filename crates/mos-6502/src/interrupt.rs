//! BRK and the hardware interrupt sequences.
//!
//! All four share one seven-cycle shape. Reset keeps the stack cycles
//! but turns the writes into reads, so S still drops by three and
//! nothing is stored.

use emu_core::Bus;

use crate::Mos6502;
use crate::flags::I;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Software interrupt (opcode $00).
    Break,
    Irq,
    Nmi,
    Reset,
}

impl Interrupt {
    /// Address of the vector's low byte.
    #[must_use]
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => 0xFFFA,
            Interrupt::Reset => 0xFFFC,
            Interrupt::Break | Interrupt::Irq => 0xFFFE,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Interrupt::Break => "BRK",
            Interrupt::Irq => "IRQ",
            Interrupt::Nmi => "NMI",
            Interrupt::Reset => "RESET",
        }
    }
}

impl Mos6502 {
    pub(crate) fn interrupt_cycle<B: Bus>(&mut self, bus: &mut B, kind: Interrupt) {
        match self.cycle {
            1 => {
                // BRK skips its padding byte; hardware sequences leave PC
                // pointing at the instruction they pre-empted.
                bus.read(self.regs.pc);
                if kind == Interrupt::Break {
                    self.regs.pc = self.regs.pc.wrapping_add(1);
                }
            }
            2 => self.stack_cycle(bus, kind, self.regs.pch()),
            3 => self.stack_cycle(bus, kind, self.regs.pcl()),
            4 => {
                let status = if kind == Interrupt::Break {
                    self.regs.p.to_byte_brk()
                } else {
                    self.regs.p.to_byte_irq()
                };
                self.stack_cycle(bus, kind, status);

                // A pending NMI hijacks BRK and IRQ at this point; the
                // pushed status keeps its original B bit.
                let vector = if matches!(kind, Interrupt::Break | Interrupt::Irq) && self.nmi_pending {
                    self.nmi_pending = false;
                    Interrupt::Nmi.vector()
                } else {
                    kind.vector()
                };
                let [low, high] = vector.to_le_bytes();
                self.latch.adl = low;
                self.latch.adh = high;
            }
            5 => {
                self.regs.p.set(I);
                let vector = self.latch.drive();
                self.latch.db = bus.read(vector);
            }
            6 => {
                let vector = self.latch.addr.wrapping_add(1);
                let high = bus.read(vector);
                self.regs.pc = u16::from_le_bytes([self.latch.db, high]);
                if kind == Interrupt::Reset {
                    tracing::debug!(pc = format_args!("${:04X}", self.regs.pc), "reset vector taken");
                }
                self.finish();
            }
            cycle => self.timing_fault("interrupt", cycle),
        }
    }

    fn stack_cycle<B: Bus>(&mut self, bus: &mut B, kind: Interrupt, value: u8) {
        let addr = self.regs.push();
        if kind == Interrupt::Reset {
            bus.read(addr);
        } else {
            bus.write(addr, value);
        }
    }
}
