//! The 256-entry opcode table.

use crate::flags::{C, N, V, Z};
use crate::instruction::{Condition, Index, Instruction, Mode, Operation};
use crate::interrupt::Interrupt;
#[allow(clippy::wildcard_imports)]
use crate::ops::*;

const fn imm(op: Operation) -> Instruction {
    Instruction::Memory(Mode::Immediate, op)
}

const fn zp(op: Operation) -> Instruction {
    Instruction::Memory(Mode::ZeroPage, op)
}

const fn zpx(op: Operation) -> Instruction {
    Instruction::Memory(Mode::ZeroPageIndexed(Index::X), op)
}

const fn zpy(op: Operation) -> Instruction {
    Instruction::Memory(Mode::ZeroPageIndexed(Index::Y), op)
}

const fn abs(op: Operation) -> Instruction {
    Instruction::Memory(Mode::Absolute, op)
}

const fn abx(op: Operation) -> Instruction {
    Instruction::Memory(Mode::AbsoluteIndexed(Index::X), op)
}

const fn aby(op: Operation) -> Instruction {
    Instruction::Memory(Mode::AbsoluteIndexed(Index::Y), op)
}

const fn izx(op: Operation) -> Instruction {
    Instruction::Memory(Mode::IndexedIndirect, op)
}

const fn izy(op: Operation) -> Instruction {
    Instruction::Memory(Mode::IndirectIndexed, op)
}

const fn imp(op: Operation) -> Instruction {
    Instruction::Implied(op)
}

const fn acc(op: Operation) -> Instruction {
    Instruction::Accumulator(op)
}

const fn br(flag: u8, set: bool) -> Instruction {
    Instruction::Branch(Condition { flag, set })
}

const JAM: Instruction = Instruction::Jam;

/// Opcode byte to instruction, including every undocumented slot.
#[rustfmt::skip]
pub static OPCODES: [Instruction; 256] = [
    // $00
    Instruction::Interrupt(Interrupt::Break), izx(ORA), JAM, izx(SLO),
    zp(NOP), zp(ORA), zp(ASL), zp(SLO),
    Instruction::Push(PHP), imm(ORA), acc(ASL), imm(ANC),
    abs(NOP), abs(ORA), abs(ASL), abs(SLO),
    // $10
    br(N, false), izy(ORA), JAM, izy(SLO),
    zpx(NOP), zpx(ORA), zpx(ASL), zpx(SLO),
    imp(CLC), aby(ORA), imp(NOP), aby(SLO),
    abx(NOP), abx(ORA), abx(ASL), abx(SLO),
    // $20
    Instruction::Jsr, izx(AND), JAM, izx(RLA),
    zp(BIT), zp(AND), zp(ROL), zp(RLA),
    Instruction::Pull(PLP), imm(AND), acc(ROL), imm(ANC),
    abs(BIT), abs(AND), abs(ROL), abs(RLA),
    // $30
    br(N, true), izy(AND), JAM, izy(RLA),
    zpx(NOP), zpx(AND), zpx(ROL), zpx(RLA),
    imp(SEC), aby(AND), imp(NOP), aby(RLA),
    abx(NOP), abx(AND), abx(ROL), abx(RLA),
    // $40
    Instruction::Rti, izx(EOR), JAM, izx(SRE),
    zp(NOP), zp(EOR), zp(LSR), zp(SRE),
    Instruction::Push(PHA), imm(EOR), acc(LSR), imm(ALR),
    Instruction::JmpAbsolute, abs(EOR), abs(LSR), abs(SRE),
    // $50
    br(V, false), izy(EOR), JAM, izy(SRE),
    zpx(NOP), zpx(EOR), zpx(LSR), zpx(SRE),
    imp(CLI), aby(EOR), imp(NOP), aby(SRE),
    abx(NOP), abx(EOR), abx(LSR), abx(SRE),
    // $60
    Instruction::Rts, izx(ADC), JAM, izx(RRA),
    zp(NOP), zp(ADC), zp(ROR), zp(RRA),
    Instruction::Pull(PLA), imm(ADC), acc(ROR), imm(ARR),
    Instruction::JmpIndirect, abs(ADC), abs(ROR), abs(RRA),
    // $70
    br(V, true), izy(ADC), JAM, izy(RRA),
    zpx(NOP), zpx(ADC), zpx(ROR), zpx(RRA),
    imp(SEI), aby(ADC), imp(NOP), aby(RRA),
    abx(NOP), abx(ADC), abx(ROR), abx(RRA),
    // $80
    imm(NOP), izx(STA), imm(NOP), izx(SAX),
    zp(STY), zp(STA), zp(STX), zp(SAX),
    imp(DEY), imm(NOP), imp(TXA), imm(ANE),
    abs(STY), abs(STA), abs(STX), abs(SAX),
    // $90
    br(C, false), izy(STA), JAM, izy(SHA),
    zpx(STY), zpx(STA), zpy(STX), zpy(SAX),
    imp(TYA), aby(STA), imp(TXS), aby(TAS),
    abx(SHY), abx(STA), aby(SHX), aby(SHA),
    // $A0
    imm(LDY), izx(LDA), imm(LDX), izx(LAX),
    zp(LDY), zp(LDA), zp(LDX), zp(LAX),
    imp(TAY), imm(LDA), imp(TAX), imm(LXA),
    abs(LDY), abs(LDA), abs(LDX), abs(LAX),
    // $B0
    br(C, true), izy(LDA), JAM, izy(LAX),
    zpx(LDY), zpx(LDA), zpy(LDX), zpy(LAX),
    imp(CLV), aby(LDA), imp(TSX), aby(LAS),
    abx(LDY), abx(LDA), aby(LDX), aby(LAX),
    // $C0
    imm(CPY), izx(CMP), imm(NOP), izx(DCP),
    zp(CPY), zp(CMP), zp(DEC), zp(DCP),
    imp(INY), imm(CMP), imp(DEX), imm(SBX),
    abs(CPY), abs(CMP), abs(DEC), abs(DCP),
    // $D0
    br(Z, false), izy(CMP), JAM, izy(DCP),
    zpx(NOP), zpx(CMP), zpx(DEC), zpx(DCP),
    imp(CLD), aby(CMP), imp(NOP), aby(DCP),
    abx(NOP), abx(CMP), abx(DEC), abx(DCP),
    // $E0
    imm(CPX), izx(SBC), imm(NOP), izx(ISC),
    zp(CPX), zp(SBC), zp(INC), zp(ISC),
    imp(INX), imm(SBC), imp(NOP), imm(SBC),
    abs(CPX), abs(SBC), abs(INC), abs(ISC),
    // $F0
    br(Z, true), izy(SBC), JAM, izy(ISC),
    zpx(NOP), zpx(SBC), zpx(INC), zpx(ISC),
    imp(SED), aby(SBC), imp(NOP), aby(ISC),
    abx(NOP), abx(SBC), abx(INC), abx(ISC),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Access;

    #[test]
    fn twelve_jam_slots() {
        let jams: Vec<usize> = (0..256).filter(|&i| OPCODES[i].is_jam()).collect();
        assert_eq!(
            jams,
            vec![0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2]
        );
    }

    #[test]
    fn mnemonics_at_landmark_slots() {
        assert_eq!(OPCODES[0x00].mnemonic(), "BRK");
        assert_eq!(OPCODES[0x20].mnemonic(), "JSR");
        assert_eq!(OPCODES[0xA9].mnemonic(), "LDA");
        assert_eq!(OPCODES[0xEA].mnemonic(), "NOP");
        assert_eq!(OPCODES[0xEB].mnemonic(), "SBC");
        assert_eq!(OPCODES[0xD0].mnemonic(), "BNE");
        assert_eq!(OPCODES[0x9E].mnemonic(), "SHX");
    }

    #[test]
    fn store_family_uses_write_access() {
        for opcode in [0x85, 0x8D, 0x9D, 0x91, 0x87, 0x93, 0x9B, 0x9C, 0x9E, 0x9F] {
            let Instruction::Memory(_, op) = OPCODES[opcode] else {
                panic!("${opcode:02X} is not a memory instruction");
            };
            assert_eq!(op.access, Access::Write, "${opcode:02X}");
        }
    }
}
