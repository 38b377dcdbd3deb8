//! Operations wrapped by the addressing-mode sequencers.
//!
//! Every function works on the CPU's data latch (see [`Operation`]). The
//! constants at the bottom pair each function with its access class; the
//! opcode table is built from them.

use crate::Mos6502;
use crate::flags::{C, D, I, N, V, Z};
use crate::instruction::Operation;
use crate::Status;

// ===== Loads =====

fn lda(cpu: &mut Mos6502) {
    cpu.regs.a = cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn ldx(cpu: &mut Mos6502) {
    cpu.regs.x = cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.x);
}

fn ldy(cpu: &mut Mos6502) {
    cpu.regs.y = cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.y);
}

fn lax(cpu: &mut Mos6502) {
    cpu.regs.a = cpu.latch.data;
    cpu.regs.x = cpu.latch.data;
    cpu.regs.p.update_nz(cpu.latch.data);
}

fn las(cpu: &mut Mos6502) {
    let value = cpu.latch.data & cpu.regs.s;
    cpu.regs.a = value;
    cpu.regs.x = value;
    cpu.regs.s = value;
    cpu.regs.p.update_nz(value);
}

// ===== Logic and arithmetic =====

fn ora(cpu: &mut Mos6502) {
    cpu.regs.a |= cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn and(cpu: &mut Mos6502) {
    cpu.regs.a &= cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn eor(cpu: &mut Mos6502) {
    cpu.regs.a ^= cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

/// Binary add. The D flag is ignored: the 2A03 has no decimal adder.
fn add_with_carry(cpu: &mut Mos6502, value: u8) {
    let a = cpu.regs.a;
    let sum = u16::from(a) + u16::from(value) + u16::from(cpu.regs.p.is_set(C));
    let result = sum as u8;
    cpu.regs.p.set_if(C, sum > 0xFF);
    cpu.regs.p.set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
    cpu.regs.a = result;
    cpu.regs.p.update_nz(result);
}

fn adc(cpu: &mut Mos6502) {
    add_with_carry(cpu, cpu.latch.data);
}

fn sbc(cpu: &mut Mos6502) {
    add_with_carry(cpu, !cpu.latch.data);
}

fn compare(p: &mut Status, register: u8, value: u8) {
    p.set_if(C, register >= value);
    p.update_nz(register.wrapping_sub(value));
}

fn cmp(cpu: &mut Mos6502) {
    compare(&mut cpu.regs.p, cpu.regs.a, cpu.latch.data);
}

fn cpx(cpu: &mut Mos6502) {
    compare(&mut cpu.regs.p, cpu.regs.x, cpu.latch.data);
}

fn cpy(cpu: &mut Mos6502) {
    compare(&mut cpu.regs.p, cpu.regs.y, cpu.latch.data);
}

fn bit(cpu: &mut Mos6502) {
    let value = cpu.latch.data;
    cpu.regs.p.set_if(Z, cpu.regs.a & value == 0);
    cpu.regs.p.set_if(N, value & 0x80 != 0);
    cpu.regs.p.set_if(V, value & 0x40 != 0);
}

fn nop(_cpu: &mut Mos6502) {}

// ===== Immediate-only undocumented operations =====

/// AND, then copy N into C.
fn anc(cpu: &mut Mos6502) {
    and(cpu);
    let negative = cpu.regs.p.is_set(N);
    cpu.regs.p.set_if(C, negative);
}

/// AND, then LSR A.
fn alr(cpu: &mut Mos6502) {
    let value = cpu.regs.a & cpu.latch.data;
    cpu.regs.a = shift_right(&mut cpu.regs.p, value);
}

/// AND, then ROR A with C and V taken from bits 6 and 5 of the result.
fn arr(cpu: &mut Mos6502) {
    let value = cpu.regs.a & cpu.latch.data;
    let result = (value >> 1) | (u8::from(cpu.regs.p.is_set(C)) << 7);
    cpu.regs.p.update_nz(result);
    cpu.regs.p.set_if(C, result & 0x40 != 0);
    cpu.regs.p.set_if(V, ((result >> 6) ^ (result >> 5)) & 1 != 0);
    cpu.regs.a = result;
}

/// X = (A AND X) - operand, compare-style carry.
fn sbx(cpu: &mut Mos6502) {
    let (result, borrow) = (cpu.regs.a & cpu.regs.x).overflowing_sub(cpu.latch.data);
    cpu.regs.p.set_if(C, !borrow);
    cpu.regs.x = result;
    cpu.regs.p.update_nz(result);
}

/// Analog-unstable on real chips. Modelled with the common $EE magic
/// constant.
const UNSTABLE_MAGIC: u8 = 0xEE;

fn lxa(cpu: &mut Mos6502) {
    let value = (cpu.regs.a | UNSTABLE_MAGIC) & cpu.latch.data;
    cpu.regs.a = value;
    cpu.regs.x = value;
    cpu.regs.p.update_nz(value);
}

fn ane(cpu: &mut Mos6502) {
    cpu.regs.a = (cpu.regs.a | UNSTABLE_MAGIC) & cpu.regs.x & cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

// ===== Stores =====

fn sta(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.a;
}

fn stx(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.x;
}

fn sty(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.y;
}

fn sax(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.a & cpu.regs.x;
}

/// The SH* family stores `value & (H + 1)` where H is the base address
/// high byte. When indexing crossed a page, the stored byte also replaces
/// the high byte of the target address.
fn store_and_high(cpu: &mut Mos6502, value: u8) {
    let latch = &mut cpu.latch;
    let base_high = if latch.page_crossed {
        latch.adh.wrapping_sub(1)
    } else {
        latch.adh
    };
    let stored = value & base_high.wrapping_add(1);
    if latch.page_crossed {
        latch.adh = stored;
    }
    latch.data = stored;
}

fn sha(cpu: &mut Mos6502) {
    store_and_high(cpu, cpu.regs.a & cpu.regs.x);
}

fn shx(cpu: &mut Mos6502) {
    store_and_high(cpu, cpu.regs.x);
}

fn shy(cpu: &mut Mos6502) {
    store_and_high(cpu, cpu.regs.y);
}

fn tas(cpu: &mut Mos6502) {
    cpu.regs.s = cpu.regs.a & cpu.regs.x;
    store_and_high(cpu, cpu.regs.s);
}

// ===== Shifts and read-modify-write =====

fn shift_left(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x80 != 0);
    let result = value << 1;
    p.update_nz(result);
    result
}

fn shift_right(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x01 != 0);
    let result = value >> 1;
    p.update_nz(result);
    result
}

fn rotate_left(p: &mut Status, value: u8) -> u8 {
    let result = (value << 1) | u8::from(p.is_set(C));
    p.set_if(C, value & 0x80 != 0);
    p.update_nz(result);
    result
}

fn rotate_right(p: &mut Status, value: u8) -> u8 {
    let result = (value >> 1) | (u8::from(p.is_set(C)) << 7);
    p.set_if(C, value & 0x01 != 0);
    p.update_nz(result);
    result
}

fn asl(cpu: &mut Mos6502) {
    cpu.latch.data = shift_left(&mut cpu.regs.p, cpu.latch.data);
}

fn lsr(cpu: &mut Mos6502) {
    cpu.latch.data = shift_right(&mut cpu.regs.p, cpu.latch.data);
}

fn rol(cpu: &mut Mos6502) {
    cpu.latch.data = rotate_left(&mut cpu.regs.p, cpu.latch.data);
}

fn ror(cpu: &mut Mos6502) {
    cpu.latch.data = rotate_right(&mut cpu.regs.p, cpu.latch.data);
}

fn inc(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.latch.data.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.latch.data);
}

fn dec(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.latch.data.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.latch.data);
}

/// ASL memory, then ORA.
fn slo(cpu: &mut Mos6502) {
    asl(cpu);
    ora(cpu);
}

/// ROL memory, then AND.
fn rla(cpu: &mut Mos6502) {
    rol(cpu);
    and(cpu);
}

/// LSR memory, then EOR.
fn sre(cpu: &mut Mos6502) {
    lsr(cpu);
    eor(cpu);
}

/// ROR memory, then ADC.
fn rra(cpu: &mut Mos6502) {
    ror(cpu);
    adc(cpu);
}

/// DEC memory, then CMP.
fn dcp(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.latch.data.wrapping_sub(1);
    cmp(cpu);
}

/// INC memory, then SBC.
fn isc(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.latch.data.wrapping_add(1);
    sbc(cpu);
}

// ===== Register transfers, counters and flags =====

fn tax(cpu: &mut Mos6502) {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.x);
}

fn tay(cpu: &mut Mos6502) {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.y);
}

fn txa(cpu: &mut Mos6502) {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn tya(cpu: &mut Mos6502) {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn tsx(cpu: &mut Mos6502) {
    cpu.regs.x = cpu.regs.s;
    cpu.regs.p.update_nz(cpu.regs.x);
}

/// The only transfer that leaves the flags alone.
fn txs(cpu: &mut Mos6502) {
    cpu.regs.s = cpu.regs.x;
}

fn inx(cpu: &mut Mos6502) {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.x);
}

fn iny(cpu: &mut Mos6502) {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.y);
}

fn dex(cpu: &mut Mos6502) {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.x);
}

fn dey(cpu: &mut Mos6502) {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.y);
}

fn clc(cpu: &mut Mos6502) {
    cpu.regs.p.clear(C);
}

fn sec(cpu: &mut Mos6502) {
    cpu.regs.p.set(C);
}

fn cli(cpu: &mut Mos6502) {
    cpu.regs.p.clear(I);
}

fn sei(cpu: &mut Mos6502) {
    cpu.regs.p.set(I);
}

fn clv(cpu: &mut Mos6502) {
    cpu.regs.p.clear(V);
}

fn cld(cpu: &mut Mos6502) {
    cpu.regs.p.clear(D);
}

fn sed(cpu: &mut Mos6502) {
    cpu.regs.p.set(D);
}

// ===== Stack =====

fn pha(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.a;
}

fn php(cpu: &mut Mos6502) {
    cpu.latch.data = cpu.regs.p.to_byte_brk();
}

fn pla(cpu: &mut Mos6502) {
    cpu.regs.a = cpu.latch.data;
    cpu.regs.p.update_nz(cpu.regs.a);
}

fn plp(cpu: &mut Mos6502) {
    cpu.regs.p = Status::from_byte(cpu.latch.data);
}

// ===== Descriptors =====

pub(crate) const LDA: Operation = Operation::read("LDA", lda);
pub(crate) const LDX: Operation = Operation::read("LDX", ldx);
pub(crate) const LDY: Operation = Operation::read("LDY", ldy);
pub(crate) const LAX: Operation = Operation::read("LAX", lax);
pub(crate) const LAS: Operation = Operation::read("LAS", las);
pub(crate) const ORA: Operation = Operation::read("ORA", ora);
pub(crate) const AND: Operation = Operation::read("AND", and);
pub(crate) const EOR: Operation = Operation::read("EOR", eor);
pub(crate) const ADC: Operation = Operation::read("ADC", adc);
pub(crate) const SBC: Operation = Operation::read("SBC", sbc);
pub(crate) const CMP: Operation = Operation::read("CMP", cmp);
pub(crate) const CPX: Operation = Operation::read("CPX", cpx);
pub(crate) const CPY: Operation = Operation::read("CPY", cpy);
pub(crate) const BIT: Operation = Operation::read("BIT", bit);
pub(crate) const NOP: Operation = Operation::read("NOP", nop);
pub(crate) const ANC: Operation = Operation::read("ANC", anc);
pub(crate) const ALR: Operation = Operation::read("ALR", alr);
pub(crate) const ARR: Operation = Operation::read("ARR", arr);
pub(crate) const SBX: Operation = Operation::read("SBX", sbx);
pub(crate) const LXA: Operation = Operation::read("LXA", lxa);
pub(crate) const ANE: Operation = Operation::read("ANE", ane);

pub(crate) const STA: Operation = Operation::write("STA", sta);
pub(crate) const STX: Operation = Operation::write("STX", stx);
pub(crate) const STY: Operation = Operation::write("STY", sty);
pub(crate) const SAX: Operation = Operation::write("SAX", sax);
pub(crate) const SHA: Operation = Operation::write("SHA", sha);
pub(crate) const SHX: Operation = Operation::write("SHX", shx);
pub(crate) const SHY: Operation = Operation::write("SHY", shy);
pub(crate) const TAS: Operation = Operation::write("TAS", tas);

pub(crate) const ASL: Operation = Operation::modify("ASL", asl);
pub(crate) const LSR: Operation = Operation::modify("LSR", lsr);
pub(crate) const ROL: Operation = Operation::modify("ROL", rol);
pub(crate) const ROR: Operation = Operation::modify("ROR", ror);
pub(crate) const INC: Operation = Operation::modify("INC", inc);
pub(crate) const DEC: Operation = Operation::modify("DEC", dec);
pub(crate) const SLO: Operation = Operation::modify("SLO", slo);
pub(crate) const RLA: Operation = Operation::modify("RLA", rla);
pub(crate) const SRE: Operation = Operation::modify("SRE", sre);
pub(crate) const RRA: Operation = Operation::modify("RRA", rra);
pub(crate) const DCP: Operation = Operation::modify("DCP", dcp);
pub(crate) const ISC: Operation = Operation::modify("ISC", isc);

pub(crate) const TAX: Operation = Operation::read("TAX", tax);
pub(crate) const TAY: Operation = Operation::read("TAY", tay);
pub(crate) const TXA: Operation = Operation::read("TXA", txa);
pub(crate) const TYA: Operation = Operation::read("TYA", tya);
pub(crate) const TSX: Operation = Operation::read("TSX", tsx);
pub(crate) const TXS: Operation = Operation::read("TXS", txs);
pub(crate) const INX: Operation = Operation::read("INX", inx);
pub(crate) const INY: Operation = Operation::read("INY", iny);
pub(crate) const DEX: Operation = Operation::read("DEX", dex);
pub(crate) const DEY: Operation = Operation::read("DEY", dey);
pub(crate) const CLC: Operation = Operation::read("CLC", clc);
pub(crate) const SEC: Operation = Operation::read("SEC", sec);
pub(crate) const CLI: Operation = Operation::read("CLI", cli);
pub(crate) const SEI: Operation = Operation::read("SEI", sei);
pub(crate) const CLV: Operation = Operation::read("CLV", clv);
pub(crate) const CLD: Operation = Operation::read("CLD", cld);
pub(crate) const SED: Operation = Operation::read("SED", sed);

pub(crate) const PHA: Operation = Operation::write("PHA", pha);
pub(crate) const PHP: Operation = Operation::write("PHP", php);
pub(crate) const PLA: Operation = Operation::read("PLA", pla);
pub(crate) const PLP: Operation = Operation::read("PLP", plp);

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_with(a: u8, data: u8) -> Mos6502 {
        let mut cpu = Mos6502::new();
        cpu.regs.a = a;
        cpu.latch.data = data;
        cpu
    }

    #[test]
    fn adc_sets_overflow_on_signed_wrap() {
        let mut cpu = cpu_with(0x50, 0x50);
        cpu.regs.p.clear(C);
        adc(&mut cpu);
        assert_eq!(cpu.regs.a, 0xA0);
        assert!(cpu.regs.p.is_set(V));
        assert!(cpu.regs.p.is_set(N));
        assert!(!cpu.regs.p.is_set(C));
    }

    #[test]
    fn decimal_flag_does_not_change_adc() {
        let mut binary = cpu_with(0x09, 0x01);
        binary.regs.p.clear(C);
        adc(&mut binary);

        let mut decimal = cpu_with(0x09, 0x01);
        decimal.regs.p.clear(C);
        decimal.regs.p.set(D);
        adc(&mut decimal);

        assert_eq!(binary.regs.a, 0x0A);
        assert_eq!(decimal.regs.a, 0x0A);
    }

    #[test]
    fn sbc_borrows_through_inverted_carry() {
        let mut cpu = cpu_with(0x10, 0x20);
        cpu.regs.p.set(C);
        sbc(&mut cpu);
        assert_eq!(cpu.regs.a, 0xF0);
        assert!(!cpu.regs.p.is_set(C));
    }

    #[test]
    fn eor_is_exclusive_or() {
        let mut cpu = cpu_with(0b1100, 0b1010);
        eor(&mut cpu);
        assert_eq!(cpu.regs.a, 0b0110);
    }

    #[test]
    fn arr_takes_carry_and_overflow_from_result() {
        let mut cpu = cpu_with(0xFF, 0xC0);
        cpu.regs.p.set(C);
        arr(&mut cpu);
        // (0xC0 >> 1) | 0x80 = 0xE0: bit 6 set, bits 6 and 5 equal
        assert_eq!(cpu.regs.a, 0xE0);
        assert!(cpu.regs.p.is_set(C));
        assert!(!cpu.regs.p.is_set(V));
    }

    #[test]
    fn sbx_subtracts_from_a_and_x() {
        let mut cpu = cpu_with(0xF0, 0x10);
        cpu.regs.x = 0x3F;
        sbx(&mut cpu);
        assert_eq!(cpu.regs.x, 0x20);
        assert!(cpu.regs.p.is_set(C));
    }

    #[test]
    fn dcp_compares_decremented_value() {
        let mut cpu = cpu_with(0x40, 0x41);
        dcp(&mut cpu);
        assert_eq!(cpu.latch.data, 0x40);
        assert!(cpu.regs.p.is_set(Z));
        assert!(cpu.regs.p.is_set(C));
    }

    #[test]
    fn shx_masks_with_high_byte_plus_one() {
        let mut cpu = Mos6502::new();
        cpu.regs.x = 0xFF;
        cpu.latch.adh = 0x12;
        cpu.latch.page_crossed = false;
        shx(&mut cpu);
        assert_eq!(cpu.latch.data, 0x13);
        assert_eq!(cpu.latch.adh, 0x12);
    }

    #[test]
    fn shx_corrupts_high_byte_on_page_cross() {
        let mut cpu = Mos6502::new();
        cpu.regs.x = 0x0F;
        // Base high $12 already fixed up to $13
        cpu.latch.adh = 0x13;
        cpu.latch.page_crossed = true;
        shx(&mut cpu);
        assert_eq!(cpu.latch.data, 0x03);
        assert_eq!(cpu.latch.adh, 0x03);
    }

    #[test]
    fn plp_discards_break_bit() {
        let mut cpu = Mos6502::new();
        cpu.latch.data = 0xFF;
        plp(&mut cpu);
        assert_eq!(cpu.regs.p.0, 0xEF);
    }
}
