//! Cycle count of every opcode slot.

use emu_core::{Cpu, SimpleBus};
use mos_6502::{Access, Instruction, Mode, Mos6502, OPCODES};

/// Documented cycle counts with no page crossing and branches not taken.
/// Zero marks a JAM slot.
#[rustfmt::skip]
const CYCLES: [u32; 256] = [
    7,6,0,8,3,3,5,5,3,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,4,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,3,2,2,2,3,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    6,6,0,8,3,3,5,5,4,2,2,2,5,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    2,6,2,6,3,3,3,3,2,2,2,2,4,4,4,4,
    2,6,0,6,4,4,4,4,2,5,2,5,5,5,5,5,
    2,6,2,6,3,3,3,3,2,2,2,2,4,4,4,4,
    2,5,0,5,4,4,4,4,2,4,2,4,4,4,4,4,
    2,6,2,8,3,3,5,5,2,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
    2,6,2,8,3,3,5,5,2,2,2,2,4,4,6,6,
    2,5,0,8,4,4,6,6,2,4,2,7,4,4,7,7,
];

/// Run from a fresh fetch until the next instruction boundary or halt.
fn count_cycles(cpu: &mut Mos6502, bus: &mut SimpleBus) -> u32 {
    cpu.tick(bus);
    let mut cycles = 1;
    while !cpu.is_instruction_complete() && !cpu.is_halted() {
        assert!(cycles < 16, "runaway instruction");
        cpu.tick(bus);
        cycles += 1;
    }
    cycles
}

fn setup(opcode: u8, index: u8) -> (Mos6502, SimpleBus) {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();
    // Operand $0310; as a zero-page pointer, $10 holds the same address
    bus.load(0x0200, &[opcode, 0x10, 0x03]);
    bus.load(0x0010, &[0x10, 0x03]);
    cpu.regs.pc = 0x0200;
    cpu.regs.x = index;
    cpu.regs.y = index;
    if let Instruction::Branch(cond) = OPCODES[usize::from(opcode)] {
        // Branch not taken
        if cond.set {
            cpu.regs.p.clear(cond.flag);
        } else {
            cpu.regs.p.set(cond.flag);
        }
    }
    (cpu, bus)
}

#[test]
fn every_opcode_takes_documented_cycles() {
    for opcode in 0..=255u8 {
        let expected = CYCLES[usize::from(opcode)];
        let (mut cpu, mut bus) = setup(opcode, 0);
        let cycles = count_cycles(&mut cpu, &mut bus);

        if expected == 0 {
            assert!(cpu.is_halted(), "${opcode:02X} should jam");
        } else {
            assert!(!cpu.is_halted(), "${opcode:02X} halted: {:?}", cpu.fault());
            assert_eq!(cycles, expected, "${opcode:02X} {}", OPCODES[usize::from(opcode)].mnemonic());
        }
    }
}

#[test]
fn page_cross_costs_a_cycle_only_for_reads() {
    for opcode in 0..=255u8 {
        let Instruction::Memory(mode, op) = OPCODES[usize::from(opcode)] else {
            continue;
        };
        if !matches!(mode, Mode::AbsoluteIndexed(_) | Mode::IndirectIndexed) {
            continue;
        }

        let (mut cpu, mut bus) = setup(opcode, 0xFF);
        let cycles = count_cycles(&mut cpu, &mut bus);
        let base = CYCLES[usize::from(opcode)];
        let expected = if op.access == Access::Read { base + 1 } else { base };
        assert_eq!(cycles, expected, "${opcode:02X} {} with page cross", op.mnemonic);
    }
}
