//! The opcode table.
//!
//! One record per documented opcode: encoded size, base cycle count,
//! and addressing mode, straight from the published 6502 timing table.
//! The dispatch loop consults this to decide how many operand bytes to
//! consume and how many cycles to charge; dynamic penalties (page
//! crossings, taken branches) are added by the semantics.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::addressing::AddressingMode;

/// The BRK opcode byte; the run loops halt when it comes up for fetch.
pub(crate) const BRK_CODE: u8 = 0x00;

/// The 56 documented 6502 mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{self:?}").to_uppercase();
        f.write_str(&name)
    }
}

/// One opcode record: encoding byte, mnemonic, total size in bytes
/// (opcode plus operands), base cycles, and addressing mode.
pub struct Opcode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub size: u8,
    pub cycles: u8,
    pub mode: AddressingMode,
}

impl Opcode {
    const fn new(
        code: u8,
        mnemonic: Mnemonic,
        size: u8,
        cycles: u8,
        mode: AddressingMode,
    ) -> Self {
        Self {
            code,
            mnemonic,
            size,
            cycles,
            mode,
        }
    }
}

use AddressingMode::*;
use Mnemonic::*;

lazy_static! {
    /// All 151 documented opcodes.
    pub static ref OPCODES: Vec<Opcode> = vec![
        Opcode::new(0x00, Brk, 1, 7, Implied),
        Opcode::new(0xEA, Nop, 1, 2, Implied),

        Opcode::new(0x69, Adc, 2, 2, Immediate),
        Opcode::new(0x65, Adc, 2, 3, ZeroPage),
        Opcode::new(0x75, Adc, 2, 4, ZeroPageX),
        Opcode::new(0x6D, Adc, 3, 4, Absolute),
        Opcode::new(0x7D, Adc, 3, 4, AbsoluteX),
        Opcode::new(0x79, Adc, 3, 4, AbsoluteY),
        Opcode::new(0x61, Adc, 2, 6, IndirectX),
        Opcode::new(0x71, Adc, 2, 5, IndirectY),

        Opcode::new(0xE9, Sbc, 2, 2, Immediate),
        Opcode::new(0xE5, Sbc, 2, 3, ZeroPage),
        Opcode::new(0xF5, Sbc, 2, 4, ZeroPageX),
        Opcode::new(0xED, Sbc, 3, 4, Absolute),
        Opcode::new(0xFD, Sbc, 3, 4, AbsoluteX),
        Opcode::new(0xF9, Sbc, 3, 4, AbsoluteY),
        Opcode::new(0xE1, Sbc, 2, 6, IndirectX),
        Opcode::new(0xF1, Sbc, 2, 5, IndirectY),

        Opcode::new(0x29, And, 2, 2, Immediate),
        Opcode::new(0x25, And, 2, 3, ZeroPage),
        Opcode::new(0x35, And, 2, 4, ZeroPageX),
        Opcode::new(0x2D, And, 3, 4, Absolute),
        Opcode::new(0x3D, And, 3, 4, AbsoluteX),
        Opcode::new(0x39, And, 3, 4, AbsoluteY),
        Opcode::new(0x21, And, 2, 6, IndirectX),
        Opcode::new(0x31, And, 2, 5, IndirectY),

        Opcode::new(0x49, Eor, 2, 2, Immediate),
        Opcode::new(0x45, Eor, 2, 3, ZeroPage),
        Opcode::new(0x55, Eor, 2, 4, ZeroPageX),
        Opcode::new(0x4D, Eor, 3, 4, Absolute),
        Opcode::new(0x5D, Eor, 3, 4, AbsoluteX),
        Opcode::new(0x59, Eor, 3, 4, AbsoluteY),
        Opcode::new(0x41, Eor, 2, 6, IndirectX),
        Opcode::new(0x51, Eor, 2, 5, IndirectY),

        Opcode::new(0x09, Ora, 2, 2, Immediate),
        Opcode::new(0x05, Ora, 2, 3, ZeroPage),
        Opcode::new(0x15, Ora, 2, 4, ZeroPageX),
        Opcode::new(0x0D, Ora, 3, 4, Absolute),
        Opcode::new(0x1D, Ora, 3, 4, AbsoluteX),
        Opcode::new(0x19, Ora, 3, 4, AbsoluteY),
        Opcode::new(0x01, Ora, 2, 6, IndirectX),
        Opcode::new(0x11, Ora, 2, 5, IndirectY),

        Opcode::new(0x24, Bit, 2, 3, ZeroPage),
        Opcode::new(0x2C, Bit, 3, 4, Absolute),

        Opcode::new(0x0A, Asl, 1, 2, Accumulator),
        Opcode::new(0x06, Asl, 2, 5, ZeroPage),
        Opcode::new(0x16, Asl, 2, 6, ZeroPageX),
        Opcode::new(0x0E, Asl, 3, 6, Absolute),
        Opcode::new(0x1E, Asl, 3, 7, AbsoluteX),

        Opcode::new(0x4A, Lsr, 1, 2, Accumulator),
        Opcode::new(0x46, Lsr, 2, 5, ZeroPage),
        Opcode::new(0x56, Lsr, 2, 6, ZeroPageX),
        Opcode::new(0x4E, Lsr, 3, 6, Absolute),
        Opcode::new(0x5E, Lsr, 3, 7, AbsoluteX),

        Opcode::new(0x2A, Rol, 1, 2, Accumulator),
        Opcode::new(0x26, Rol, 2, 5, ZeroPage),
        Opcode::new(0x36, Rol, 2, 6, ZeroPageX),
        Opcode::new(0x2E, Rol, 3, 6, Absolute),
        Opcode::new(0x3E, Rol, 3, 7, AbsoluteX),

        Opcode::new(0x6A, Ror, 1, 2, Accumulator),
        Opcode::new(0x66, Ror, 2, 5, ZeroPage),
        Opcode::new(0x76, Ror, 2, 6, ZeroPageX),
        Opcode::new(0x6E, Ror, 3, 6, Absolute),
        Opcode::new(0x7E, Ror, 3, 7, AbsoluteX),

        Opcode::new(0xE6, Inc, 2, 5, ZeroPage),
        Opcode::new(0xF6, Inc, 2, 6, ZeroPageX),
        Opcode::new(0xEE, Inc, 3, 6, Absolute),
        Opcode::new(0xFE, Inc, 3, 7, AbsoluteX),

        Opcode::new(0xC6, Dec, 2, 5, ZeroPage),
        Opcode::new(0xD6, Dec, 2, 6, ZeroPageX),
        Opcode::new(0xCE, Dec, 3, 6, Absolute),
        Opcode::new(0xDE, Dec, 3, 7, AbsoluteX),

        Opcode::new(0xE8, Inx, 1, 2, Implied),
        Opcode::new(0xC8, Iny, 1, 2, Implied),
        Opcode::new(0xCA, Dex, 1, 2, Implied),
        Opcode::new(0x88, Dey, 1, 2, Implied),

        Opcode::new(0xC9, Cmp, 2, 2, Immediate),
        Opcode::new(0xC5, Cmp, 2, 3, ZeroPage),
        Opcode::new(0xD5, Cmp, 2, 4, ZeroPageX),
        Opcode::new(0xCD, Cmp, 3, 4, Absolute),
        Opcode::new(0xDD, Cmp, 3, 4, AbsoluteX),
        Opcode::new(0xD9, Cmp, 3, 4, AbsoluteY),
        Opcode::new(0xC1, Cmp, 2, 6, IndirectX),
        Opcode::new(0xD1, Cmp, 2, 5, IndirectY),

        Opcode::new(0xE0, Cpx, 2, 2, Immediate),
        Opcode::new(0xE4, Cpx, 2, 3, ZeroPage),
        Opcode::new(0xEC, Cpx, 3, 4, Absolute),

        Opcode::new(0xC0, Cpy, 2, 2, Immediate),
        Opcode::new(0xC4, Cpy, 2, 3, ZeroPage),
        Opcode::new(0xCC, Cpy, 3, 4, Absolute),

        Opcode::new(0xA9, Lda, 2, 2, Immediate),
        Opcode::new(0xA5, Lda, 2, 3, ZeroPage),
        Opcode::new(0xB5, Lda, 2, 4, ZeroPageX),
        Opcode::new(0xAD, Lda, 3, 4, Absolute),
        Opcode::new(0xBD, Lda, 3, 4, AbsoluteX),
        Opcode::new(0xB9, Lda, 3, 4, AbsoluteY),
        Opcode::new(0xA1, Lda, 2, 6, IndirectX),
        Opcode::new(0xB1, Lda, 2, 5, IndirectY),

        Opcode::new(0xA2, Ldx, 2, 2, Immediate),
        Opcode::new(0xA6, Ldx, 2, 3, ZeroPage),
        Opcode::new(0xB6, Ldx, 2, 4, ZeroPageY),
        Opcode::new(0xAE, Ldx, 3, 4, Absolute),
        Opcode::new(0xBE, Ldx, 3, 4, AbsoluteY),

        Opcode::new(0xA0, Ldy, 2, 2, Immediate),
        Opcode::new(0xA4, Ldy, 2, 3, ZeroPage),
        Opcode::new(0xB4, Ldy, 2, 4, ZeroPageX),
        Opcode::new(0xAC, Ldy, 3, 4, Absolute),
        Opcode::new(0xBC, Ldy, 3, 4, AbsoluteX),

        Opcode::new(0x85, Sta, 2, 3, ZeroPage),
        Opcode::new(0x95, Sta, 2, 4, ZeroPageX),
        Opcode::new(0x8D, Sta, 3, 4, Absolute),
        Opcode::new(0x9D, Sta, 3, 5, AbsoluteX),
        Opcode::new(0x99, Sta, 3, 5, AbsoluteY),
        Opcode::new(0x81, Sta, 2, 6, IndirectX),
        Opcode::new(0x91, Sta, 2, 6, IndirectY),

        Opcode::new(0x86, Stx, 2, 3, ZeroPage),
        Opcode::new(0x96, Stx, 2, 4, ZeroPageY),
        Opcode::new(0x8E, Stx, 3, 4, Absolute),

        Opcode::new(0x84, Sty, 2, 3, ZeroPage),
        Opcode::new(0x94, Sty, 2, 4, ZeroPageX),
        Opcode::new(0x8C, Sty, 3, 4, Absolute),

        Opcode::new(0xAA, Tax, 1, 2, Implied),
        Opcode::new(0xA8, Tay, 1, 2, Implied),
        Opcode::new(0x8A, Txa, 1, 2, Implied),
        Opcode::new(0x98, Tya, 1, 2, Implied),
        Opcode::new(0xBA, Tsx, 1, 2, Implied),
        Opcode::new(0x9A, Txs, 1, 2, Implied),

        Opcode::new(0x48, Pha, 1, 3, Implied),
        Opcode::new(0x08, Php, 1, 3, Implied),
        Opcode::new(0x68, Pla, 1, 4, Implied),
        Opcode::new(0x28, Plp, 1, 4, Implied),

        Opcode::new(0x4C, Jmp, 3, 3, Absolute),
        Opcode::new(0x6C, Jmp, 3, 5, Indirect),
        Opcode::new(0x20, Jsr, 3, 6, Absolute),
        Opcode::new(0x60, Rts, 1, 6, Implied),
        Opcode::new(0x40, Rti, 1, 6, Implied),

        Opcode::new(0x10, Bpl, 2, 2, Relative),
        Opcode::new(0x30, Bmi, 2, 2, Relative),
        Opcode::new(0x50, Bvc, 2, 2, Relative),
        Opcode::new(0x70, Bvs, 2, 2, Relative),
        Opcode::new(0x90, Bcc, 2, 2, Relative),
        Opcode::new(0xB0, Bcs, 2, 2, Relative),
        Opcode::new(0xD0, Bne, 2, 2, Relative),
        Opcode::new(0xF0, Beq, 2, 2, Relative),

        Opcode::new(0x18, Clc, 1, 2, Implied),
        Opcode::new(0x38, Sec, 1, 2, Implied),
        Opcode::new(0x58, Cli, 1, 2, Implied),
        Opcode::new(0x78, Sei, 1, 2, Implied),
        Opcode::new(0xB8, Clv, 1, 2, Implied),
        Opcode::new(0xD8, Cld, 1, 2, Implied),
        Opcode::new(0xF8, Sed, 1, 2, Implied),
    ];

    /// Byte-indexed view of [`OPCODES`].
    pub static ref OPCODE_MAP: HashMap<u8, &'static Opcode> =
        OPCODES.iter().map(|op| (op.code, op)).collect();
}

/// Look up the record for an opcode byte.
#[must_use]
pub fn lookup(code: u8) -> Option<&'static Opcode> {
    OPCODE_MAP.get(&code).copied()
}
