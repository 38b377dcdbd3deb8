//! Per-cycle sequencers.
//!
//! `self.cycle` counts from 1 (the cycle after the opcode fetch). Each
//! call performs exactly one bus access. Memory modes compute an address
//! and then hand over to [`Mos6502::access`], which is shared by every
//! mode and shaped by the operation's [`Access`] class.

use emu_core::Bus;

use crate::Mos6502;
use crate::instruction::{Access, Condition, Index, Instruction, Mode, Operation};

impl Mos6502 {
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B) {
        match self.instruction {
            Instruction::Memory(mode, op) => self.memory(bus, mode, op),
            Instruction::Implied(op) => self.implied(bus, op),
            Instruction::Accumulator(op) => self.accumulator(bus, op),
            Instruction::Branch(cond) => self.branch(bus, cond),
            Instruction::Push(op) => self.push(bus, op),
            Instruction::Pull(op) => self.pull(bus, op),
            Instruction::Jsr => self.jsr(bus),
            Instruction::Rts => self.rts(bus),
            Instruction::Rti => self.rti(bus),
            Instruction::JmpAbsolute => self.jmp_absolute(bus),
            Instruction::JmpIndirect => self.jmp_indirect(bus),
            Instruction::Interrupt(kind) => self.interrupt_cycle(bus, kind),
            Instruction::Jam => self.jam(bus),
        }
    }

    fn index(&self, index: Index) -> u8 {
        match index {
            Index::X => self.regs.x,
            Index::Y => self.regs.y,
        }
    }

    // ===== Operand access tail =====

    /// Final cycles of every memory mode, once `adl`/`adh` hold the
    /// effective address. `step` counts from 0.
    fn access<B: Bus>(&mut self, bus: &mut B, op: Operation, step: u8, sequencer: &'static str) {
        match (op.access, step) {
            (Access::Read, 0) => {
                let addr = self.latch.drive();
                self.latch.data = bus.read(addr);
                (op.exec)(self);
                self.finish();
            }
            (Access::Write, 0) => {
                // exec first: the SH* family rewrites adh before it is driven
                (op.exec)(self);
                let addr = self.latch.drive();
                bus.write(addr, self.latch.data);
                self.finish();
            }
            (Access::ReadModifyWrite, 0) => {
                let addr = self.latch.drive();
                self.latch.data = bus.read(addr);
            }
            (Access::ReadModifyWrite, 1) => {
                bus.write(self.latch.addr, self.latch.data);
                (op.exec)(self);
            }
            (Access::ReadModifyWrite, 2) => {
                bus.write(self.latch.addr, self.latch.data);
                self.finish();
            }
            _ => self.timing_fault(sequencer, self.cycle),
        }
    }

    /// Indexed fix-up cycle shared by `abs,X`/`abs,Y` and `(zp),Y`.
    /// Reads that stayed on the page complete here.
    fn fix_up<B: Bus>(&mut self, bus: &mut B, op: Operation) {
        let addr = self.latch.drive();
        if op.access == Access::Read && !self.latch.page_crossed {
            self.latch.data = bus.read(addr);
            (op.exec)(self);
            self.finish();
            return;
        }
        bus.read(addr);
        if self.latch.page_crossed {
            self.latch.adh = self.latch.adh.wrapping_add(1);
        }
    }

    // ===== Memory addressing modes =====

    fn memory<B: Bus>(&mut self, bus: &mut B, mode: Mode, op: Operation) {
        let name = mode.sequencer();
        let cycle = self.cycle;
        match mode {
            Mode::Immediate => match cycle {
                1 => {
                    self.latch.data = self.read_pc(bus);
                    (op.exec)(self);
                    self.finish();
                }
                _ => self.timing_fault(name, cycle),
            },

            // LDA zp - 3 cycles, ASL zp - 5 cycles
            Mode::ZeroPage => match cycle {
                1 => {
                    let offset = self.read_pc(bus);
                    self.latch.zero_page(offset);
                }
                _ => self.access(bus, op, cycle - 2, name),
            },

            // LDA zp,X - 4 cycles, index wraps within page zero
            Mode::ZeroPageIndexed(index) => match cycle {
                1 => {
                    let offset = self.read_pc(bus);
                    self.latch.zero_page(offset);
                }
                2 => {
                    let addr = self.latch.drive();
                    bus.read(addr);
                    self.latch.adl = self.latch.adl.wrapping_add(self.index(index));
                }
                _ => self.access(bus, op, cycle - 3, name),
            },

            // LDA abs - 4 cycles
            Mode::Absolute => match cycle {
                1 => self.latch.adl = self.read_pc(bus),
                2 => self.latch.adh = self.read_pc(bus),
                _ => self.access(bus, op, cycle - 3, name),
            },

            // LDA abs,X - 4 cycles (+1 page cross), STA abs,X - 5 cycles
            Mode::AbsoluteIndexed(index) => match cycle {
                1 => self.latch.adl = self.read_pc(bus),
                2 => {
                    self.latch.adh = self.read_pc(bus);
                    self.latch.index_low(self.index(index));
                }
                3 => self.fix_up(bus, op),
                _ => self.access(bus, op, cycle - 4, name),
            },

            // LDA (zp,X) - 6 cycles
            Mode::IndexedIndirect => match cycle {
                1 => self.latch.db = self.read_pc(bus),
                2 => {
                    bus.read(u16::from(self.latch.db));
                    self.latch.db = self.latch.db.wrapping_add(self.regs.x);
                }
                3 => self.latch.adl = bus.read(u16::from(self.latch.db)),
                4 => self.latch.adh = bus.read(u16::from(self.latch.db.wrapping_add(1))),
                _ => self.access(bus, op, cycle - 5, name),
            },

            // LDA (zp),Y - 5 cycles (+1 page cross), STA (zp),Y - 6 cycles
            Mode::IndirectIndexed => match cycle {
                1 => self.latch.db = self.read_pc(bus),
                2 => self.latch.adl = bus.read(u16::from(self.latch.db)),
                3 => {
                    self.latch.adh = bus.read(u16::from(self.latch.db.wrapping_add(1)));
                    self.latch.index_low(self.regs.y);
                }
                4 => self.fix_up(bus, op),
                _ => self.access(bus, op, cycle - 5, name),
            },
        }
    }

    // ===== Register-only =====

    // TAX - 2 cycles
    fn implied<B: Bus>(&mut self, bus: &mut B, op: Operation) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
                (op.exec)(self);
                self.finish();
            }
            cycle => self.timing_fault("implied", cycle),
        }
    }

    // ASL A - 2 cycles
    fn accumulator<B: Bus>(&mut self, bus: &mut B, op: Operation) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
                self.latch.data = self.regs.a;
                (op.exec)(self);
                self.regs.a = self.latch.data;
                self.finish();
            }
            cycle => self.timing_fault("accumulator", cycle),
        }
    }

    // ===== Branches =====

    /// 2 cycles not taken, 3 taken, 4 when the target is on another page.
    /// The offset is added to PCL alone; PCH is fixed up a cycle later.
    fn branch<B: Bus>(&mut self, bus: &mut B, cond: Condition) {
        match self.cycle {
            1 => {
                self.latch.db = self.read_pc(bus);
                if self.regs.p.is_set(cond.flag) != cond.set {
                    self.finish();
                }
            }
            2 => {
                bus.read(self.regs.pc);
                let target = self.regs.pc.wrapping_add(self.latch.db as i8 as u16);
                let [low, high] = target.to_le_bytes();
                self.regs.set_pcl(low);
                self.latch.adh = high;
                if self.regs.pch() == high {
                    self.finish();
                }
            }
            3 => {
                bus.read(self.regs.pc);
                self.regs.set_pch(self.latch.adh);
                self.finish();
            }
            cycle => self.timing_fault("branch", cycle),
        }
    }

    // ===== Stack =====

    // PHA - 3 cycles
    fn push<B: Bus>(&mut self, bus: &mut B, op: Operation) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
            }
            2 => {
                (op.exec)(self);
                let addr = self.regs.push();
                bus.write(addr, self.latch.data);
                self.finish();
            }
            cycle => self.timing_fault("push", cycle),
        }
    }

    // PLA - 4 cycles
    fn pull<B: Bus>(&mut self, bus: &mut B, op: Operation) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
            }
            2 => {
                bus.read(self.regs.stack_addr());
            }
            3 => {
                let addr = self.regs.pop();
                self.latch.data = bus.read(addr);
                (op.exec)(self);
                self.finish();
            }
            cycle => self.timing_fault("pull", cycle),
        }
    }

    // ===== Flow control =====

    // JSR abs - 6 cycles. The pushed return address is the last operand
    // byte, not the next instruction.
    fn jsr<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => self.latch.adl = self.read_pc(bus),
            2 => {
                bus.read(self.regs.stack_addr());
            }
            3 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.pch());
            }
            4 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.pcl());
            }
            5 => {
                self.latch.adh = bus.read(self.regs.pc);
                self.regs.pc = self.latch.drive();
                self.finish();
            }
            cycle => self.timing_fault("jsr", cycle),
        }
    }

    // RTS - 6 cycles
    fn rts<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
            }
            2 => {
                bus.read(self.regs.stack_addr());
            }
            3 => {
                let addr = self.regs.pop();
                self.latch.adl = bus.read(addr);
            }
            4 => {
                let addr = self.regs.pop();
                self.latch.adh = bus.read(addr);
            }
            5 => {
                let addr = self.latch.drive();
                bus.read(addr);
                self.regs.pc = addr.wrapping_add(1);
                self.finish();
            }
            cycle => self.timing_fault("rts", cycle),
        }
    }

    // RTI - 6 cycles
    fn rti<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                bus.read(self.regs.pc);
            }
            2 => {
                bus.read(self.regs.stack_addr());
            }
            3 => {
                let addr = self.regs.pop();
                self.regs.p = crate::Status::from_byte(bus.read(addr));
            }
            4 => {
                let addr = self.regs.pop();
                self.latch.adl = bus.read(addr);
            }
            5 => {
                let addr = self.regs.pop();
                self.latch.adh = bus.read(addr);
                self.regs.pc = self.latch.drive();
                self.finish();
            }
            cycle => self.timing_fault("rti", cycle),
        }
    }

    // JMP abs - 3 cycles
    fn jmp_absolute<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => self.latch.adl = self.read_pc(bus),
            2 => {
                self.latch.adh = bus.read(self.regs.pc);
                self.regs.pc = self.latch.drive();
                self.finish();
            }
            cycle => self.timing_fault("jmp", cycle),
        }
    }

    // JMP (abs) - 5 cycles. The pointer's high byte is fetched without
    // carrying into the page: JMP ($10FF) reads $10FF and $1000.
    fn jmp_indirect<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => self.latch.adl = self.read_pc(bus),
            2 => self.latch.adh = self.read_pc(bus),
            3 => {
                let pointer = self.latch.drive();
                self.latch.db = bus.read(pointer);
            }
            4 => {
                self.latch.adl = self.latch.adl.wrapping_add(1);
                let pointer = self.latch.drive();
                let high = bus.read(pointer);
                self.regs.pc = u16::from_le_bytes([self.latch.db, high]);
                self.finish();
            }
            cycle => self.timing_fault("jmp-indirect", cycle),
        }
    }

    fn jam<B: Bus>(&mut self, bus: &mut B) {
        bus.read(self.regs.pc);
        let pc = self.regs.pc.wrapping_sub(1);
        self.halt(crate::CpuFault::Jam {
            opcode: self.opcode,
            pc,
        });
    }
}
