//! Reset, IRQ and NMI sequencing.

use emu_core::{Cpu, SimpleBus};
use mos_6502::{Mos6502, flags};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run_instruction(cpu: &mut Mos6502, bus: &mut SimpleBus) -> u32 {
    cpu.tick(bus);
    let mut cycles = 1;
    while !cpu.is_instruction_complete() {
        assert!(cycles < 16, "runaway instruction");
        cpu.tick(bus);
        cycles += 1;
    }
    cycles
}

/// NOP sled at $0200 looping back via JMP, handler at $0300.
fn machine(handler: &[u8]) -> (Mos6502, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0200, &[0xEA, 0xEA, 0xEA, 0x4C, 0x00, 0x02]);
    bus.load(0x0300, handler);
    bus.load(0xFFFA, &[0x00, 0x03, 0x00, 0x02, 0x00, 0x03]);
    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x0200;
    cpu.regs.s = 0xFF;
    (cpu, bus)
}

#[test]
fn reset_takes_six_cycles_and_writes_nothing() {
    for seed in [1, 7, 0xDEAD_BEEF] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cpu = Mos6502::power_on(&mut rng);
        let mut bus = SimpleBus::new();
        bus.load(0xFFFC, &[0x34, 0x92]);
        let s_before = cpu.regs.s;

        // Fetch slot, then the sequence proper
        cpu.tick(&mut bus);
        let mut cycles = 0;
        while !cpu.is_instruction_complete() {
            cpu.tick(&mut bus);
            cycles += 1;
        }

        assert_eq!(cycles, 6);
        assert_eq!(bus.writes(), 0);
        assert_eq!(cpu.regs.s, s_before.wrapping_sub(3));
        assert!(cpu.regs.p.is_set(flags::I));
        assert_eq!(cpu.regs.pc, 0x9234);
    }
}

#[test]
fn power_on_state_depends_on_seed() {
    let a = Mos6502::power_on(&mut StdRng::seed_from_u64(1));
    let b = Mos6502::power_on(&mut StdRng::seed_from_u64(1));
    assert_eq!(a.regs, b.regs);
}

#[test]
fn irq_pushes_status_without_break_bit() {
    let (mut cpu, mut bus) = machine(&[0x40]);
    cpu.regs.p.clear(flags::I);
    cpu.set_irq_line(true);

    assert_eq!(run_instruction(&mut cpu, &mut bus), 7);

    assert_eq!(cpu.regs.pc, 0x0300);
    assert!(cpu.regs.p.is_set(flags::I));
    let pushed = bus.peek(0x01FD);
    assert_eq!(pushed & 0x20, 0x20);
    assert_eq!(pushed & 0x10, 0x00);
    // Interrupted before the first NOP ran
    assert_eq!(bus.peek(0x01FF), 0x02);
    assert_eq!(bus.peek(0x01FE), 0x00);
}

#[test]
fn irq_is_ignored_while_interrupts_disabled() {
    let (mut cpu, mut bus) = machine(&[0x40]);
    cpu.set_irq_line(true);

    for _ in 0..10 {
        run_instruction(&mut cpu, &mut bus);
    }
    assert!(cpu.regs.pc < 0x0300);
    assert_eq!(bus.writes(), 0);
}

#[test]
fn irq_is_level_triggered() {
    // Handler: INX; RTI
    let (mut cpu, mut bus) = machine(&[0xE8, 0x40]);
    cpu.regs.p.clear(flags::I);
    cpu.set_irq_line(true);

    // IRQ, INX, RTI, and straight back in because the line is still low
    for _ in 0..4 {
        run_instruction(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.regs.x, 1);
    assert_eq!(cpu.regs.pc, 0x0300);
}

#[test]
fn nmi_fires_once_per_edge() {
    // Handler: INY; RTI
    let (mut cpu, mut bus) = machine(&[0xC8, 0x40]);

    cpu.set_nmi_line(true);
    for _ in 0..50 {
        run_instruction(&mut cpu, &mut bus);
        // Line held asserted the whole time
        cpu.set_nmi_line(true);
    }
    assert_eq!(cpu.regs.y, 1);

    cpu.set_nmi_line(false);
    cpu.set_nmi_line(true);
    for _ in 0..50 {
        run_instruction(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.regs.y, 2);
}

#[test]
fn nmi_ignores_interrupt_disable() {
    let (mut cpu, mut bus) = machine(&[0x40]);
    assert!(cpu.regs.p.is_set(flags::I));

    cpu.set_nmi_line(true);
    run_instruction(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.pc, 0x0300);
    assert_eq!(bus.peek(0x01FD) & 0x30, 0x20);
}

#[test]
fn nmi_during_brk_hijacks_vector() {
    let mut bus = SimpleBus::new();
    bus.load(0x0200, &[0x00, 0xEA]);
    bus.load(0x0400, &[0xEA]);
    // NMI -> $0400, IRQ/BRK -> $0300
    bus.load(0xFFFA, &[0x00, 0x04, 0x00, 0x02, 0x00, 0x03]);
    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0x0200;
    cpu.regs.s = 0xFF;

    cpu.tick(&mut bus);
    cpu.tick(&mut bus);
    cpu.set_nmi_line(true);
    while !cpu.is_instruction_complete() {
        cpu.tick(&mut bus);
    }

    assert_eq!(cpu.regs.pc, 0x0400);
    // Status still carries the BRK marker
    assert_eq!(bus.peek(0x01FD) & 0x10, 0x10);

    // The NMI was consumed by the hijack
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0401);
}
