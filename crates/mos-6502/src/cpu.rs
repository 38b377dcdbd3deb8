//! CPU step engine.
//!
//! Each `tick()` performs exactly one bus access. Cycle 0 of every
//! instruction is the opcode fetch, where pending reset, NMI and IRQ are
//! polled in that order; the remaining cycles are driven by the
//! sequencer the opcode table selects.

use emu_core::{Bus, Cpu, Observable, Value};
use rand::Rng;
use tracing::{error, trace};

use crate::error::CpuFault;
use crate::flags::{C, D, I, N, V, Z};
use crate::instruction::Instruction;
use crate::interrupt::Interrupt;
use crate::latch::Latches;
use crate::table::OPCODES;
use crate::Registers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FetchOpcode,
    Execute,
    /// Jammed or faulted. Only a reset leaves this state.
    Stopped,
}

/// The 6502 core of the Ricoh 2A03.
#[derive(Debug)]
pub struct Mos6502 {
    pub regs: Registers,
    state: State,
    pub(crate) opcode: u8,
    pub(crate) instruction: Instruction,
    /// Position inside the current instruction (0 = opcode fetch).
    pub(crate) cycle: u8,
    pub(crate) latch: Latches,
    nmi_line: bool,
    /// Latched NMI edge, consumed when the sequence starts.
    pub(crate) nmi_pending: bool,
    irq_line: bool,
    reset_pending: bool,
    fault: Option<CpuFault>,
    total_cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// A CPU with deterministic registers and no reset pending. Tests
    /// place PC directly.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            state: State::FetchOpcode,
            opcode: 0,
            instruction: OPCODES[0xEA],
            cycle: 0,
            latch: Latches::default(),
            nmi_line: false,
            nmi_pending: false,
            irq_line: false,
            reset_pending: false,
            fault: None,
            total_cycles: 0,
        }
    }

    /// A CPU in its power-on state: registers drawn from `rng` and the
    /// reset sequence queued for the first tick.
    pub fn power_on(rng: &mut impl Rng) -> Self {
        let mut cpu = Self::new();
        cpu.regs = Registers::power_on(rng);
        cpu.reset_pending = true;
        cpu
    }

    /// The fault that stopped the CPU, if any.
    #[must_use]
    pub fn fault(&self) -> Option<CpuFault> {
        self.fault
    }

    /// Take the fault so the owner reports it once.
    pub fn take_fault(&mut self) -> Option<CpuFault> {
        self.fault.take()
    }

    /// True between instructions, when the next tick fetches an opcode
    /// or starts an interrupt sequence.
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.state == State::FetchOpcode
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Opcode of the instruction in flight (or last executed).
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    fn execute_cycle<B: Bus>(&mut self, bus: &mut B) {
        self.total_cycles += 1;

        match self.state {
            State::FetchOpcode => self.fetch(bus),
            State::Execute => {
                self.execute(bus);
                if self.state == State::Execute {
                    self.cycle += 1;
                }
            }
            State::Stopped => {
                bus.read(self.regs.pc);
            }
        }
    }

    fn fetch<B: Bus>(&mut self, bus: &mut B) {
        self.latch.page_crossed = false;

        let hardware = if self.reset_pending {
            self.reset_pending = false;
            Some(Interrupt::Reset)
        } else if self.nmi_pending {
            self.nmi_pending = false;
            Some(Interrupt::Nmi)
        } else if self.irq_line && !self.regs.p.is_set(I) {
            Some(Interrupt::Irq)
        } else {
            None
        };

        if let Some(kind) = hardware {
            // The opcode fetch still happens; its result is discarded.
            bus.read(self.regs.pc);
            self.instruction = Instruction::Interrupt(kind);
        } else {
            self.opcode = self.read_pc(bus);
            self.instruction = OPCODES[usize::from(self.opcode)];
            trace!(
                pc = format_args!("${:04X}", self.regs.pc.wrapping_sub(1)),
                opcode = format_args!("${:02X}", self.opcode),
                mnemonic = self.instruction.mnemonic(),
                "fetch"
            );
        }
        self.cycle = 1;
        self.state = State::Execute;
    }

    /// Read the byte at PC and advance PC.
    pub(crate) fn read_pc<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.next_pc();
        bus.read(pc)
    }

    pub(crate) fn finish(&mut self) {
        self.state = State::FetchOpcode;
        self.cycle = 0;
    }

    pub(crate) fn timing_fault(&mut self, sequencer: &'static str, cycle: u8) {
        self.halt(CpuFault::Timing { sequencer, cycle });
    }

    pub(crate) fn halt(&mut self, fault: CpuFault) {
        match fault {
            CpuFault::Jam { .. } => error!(%fault, "CPU jammed"),
            CpuFault::Timing { .. } => error!(%fault, "timing defect in CPU sequencer"),
        }
        self.fault = Some(fault);
        self.state = State::Stopped;
        self.cycle = 0;
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;

    fn tick<B: Bus>(&mut self, bus: &mut B) {
        self.execute_cycle(bus);
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.state == State::Stopped
    }

    fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    fn set_nmi_line(&mut self, asserted: bool) {
        if asserted && !self.nmi_line {
            self.nmi_pending = true;
        }
        self.nmi_line = asserted;
    }

    fn reset(&mut self) {
        self.reset_pending = true;
        self.fault = None;
        if self.state == State::Stopped {
            self.state = State::FetchOpcode;
            self.cycle = 0;
        }
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "p" => Some(self.regs.p.0.into()),
            "flags.c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" => Some(self.regs.p.is_set(N).into()),
            "cycle" => Some(Value::U64(self.total_cycles)),
            "halted" => Some(self.is_halted().into()),
            "opcode" => Some(self.opcode.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "flags.c", "flags.z", "flags.i", "flags.d", "flags.v",
            "flags.n", "cycle", "halted", "opcode",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn lda_immediate_takes_two_cycles() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();

        // LDA #$42
        bus.load(0x0000, &[0xA9, 0x42]);

        cpu.tick(&mut bus);
        assert!(!cpu.is_instruction_complete());
        cpu.tick(&mut bus);

        assert!(cpu.is_instruction_complete());
        assert_eq!(cpu.regs.a, 0x42);
        assert_eq!(cpu.regs.pc, 0x0002);
    }

    #[test]
    fn sta_zero_page_writes_on_third_cycle() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();

        cpu.regs.a = 0x55;
        // STA $10
        bus.load(0x0000, &[0x85, 0x10]);

        cpu.tick(&mut bus);
        cpu.tick(&mut bus);
        assert_eq!(bus.peek(0x0010), 0x00);
        cpu.tick(&mut bus);
        assert_eq!(bus.peek(0x0010), 0x55);
        assert!(cpu.is_instruction_complete());
    }

    #[test]
    fn jam_stops_the_cpu_with_a_fault() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0400, &[0x02]);
        cpu.regs.pc = 0x0400;

        cpu.tick(&mut bus);
        cpu.tick(&mut bus);

        assert!(cpu.is_halted());
        assert_eq!(
            cpu.fault(),
            Some(CpuFault::Jam {
                opcode: 0x02,
                pc: 0x0400
            })
        );

        // Stays parked
        for _ in 0..10 {
            cpu.tick(&mut bus);
        }
        assert!(cpu.is_halted());
        assert_eq!(cpu.regs.pc, 0x0401);
    }

    #[test]
    fn overrunning_a_sequencer_is_a_timing_fault() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();
        // LDA $1234
        bus.load(0x0000, &[0xAD, 0x34, 0x12]);

        cpu.tick(&mut bus);
        cpu.cycle = 9;
        cpu.tick(&mut bus);

        assert!(cpu.is_halted());
        assert_eq!(
            cpu.take_fault(),
            Some(CpuFault::Timing {
                sequencer: "absolute",
                cycle: 9
            })
        );
        assert_eq!(cpu.fault(), None);
    }

    #[test]
    fn reset_recovers_a_stopped_cpu() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0000, &[0x02]);
        bus.load(0xFFFC, &[0x00, 0x80]);

        cpu.tick(&mut bus);
        cpu.tick(&mut bus);
        assert!(cpu.is_halted());

        cpu.reset();
        for _ in 0..7 {
            cpu.tick(&mut bus);
        }
        assert!(!cpu.is_halted());
        assert_eq!(cpu.regs.pc, 0x8000);
    }

    #[test]
    fn observable_paths_resolve() {
        let mut cpu = Mos6502::new();
        cpu.regs.pc = 0xC000;
        cpu.regs.a = 0x0A;

        assert_eq!(cpu.query("pc"), Some(Value::U16(0xC000)));
        assert_eq!(cpu.query("a"), Some(Value::U8(0x0A)));
        assert_eq!(cpu.query("flags.i"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("nonsense"), None);
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
    }
}
