//! # ByteVM Opcode Definitions
//!
//! Opcodes and operand tags share one unsigned byte space and are pairwise
//! distinct.
//!
//! ## Opcode Map
//!
//! - 0xA0-0xA3: Arithmetic (ADD, SUB, MUL, DIV)
//! - 0xA8-0xAB: Compare (LE, LT, GE, GT)
//! - 0xEC-0xEF: Sized moves (MOVQ, MOVD, MOVW, MOVB)
//! - 0xF0-0xF4: Conditional jumps (JEQ, JLE, JLT, JGT, JGE)
//! - 0xFC-0xFF: POP, PUSH, JMP, MOV
//!
//! ## Tag Map
//!
//! - 0xB0: TOP (stack top)
//! - 0xC0: REF (memory reference), 0xC1: INSPTR (reserved)
//! - 0xD0-0xD3: BYTE, WORD, DWORD, QWORD

use crate::value::Width;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction opcode
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== Moves ==========
    /// MOV: mem[dst] = src (any width)
    Move = 0xFF,
    /// MOVB: mem[dst] = src (byte)
    Movb = 0xEF,
    /// MOVW: mem[dst..dst+2] = src (word)
    Movw = 0xEE,
    /// MOVD: mem[dst..dst+4] = src (double word)
    Movd = 0xED,
    /// MOVQ: mem[dst..dst+8] = src (quad word)
    Movq = 0xEC,

    // ========== Stack ==========
    /// PUSH: push operand bytes
    Push = 0xFD,
    /// POP: drop one byte
    Pop = 0xFC,

    // ========== Jumps ==========
    /// JMP: ip = target
    Jmp = 0xFE,
    /// JEQ: if lhs == rhs then ip = target
    Jeq = 0xF0,
    /// JLE: if lhs <= rhs then ip = target
    Jle = 0xF1,
    /// JLT: if lhs < rhs then ip = target
    Jlt = 0xF2,
    /// JGT: if lhs > rhs then ip = target
    Jgt = 0xF3,
    /// JGE: if lhs >= rhs then ip = target
    Jge = 0xF4,

    // ========== Arithmetic ==========
    /// ADD: mem[dst] = mem[dst] + src
    Add = 0xA0,
    /// SUB: mem[dst] = mem[dst] - src
    Sub = 0xA1,
    /// MUL: mem[dst] = mem[dst] * src
    Mul = 0xA2,
    /// DIV: mem[dst] = mem[dst] / src
    Div = 0xA3,

    // ========== Compare ==========
    /// LE: push(lhs <= rhs)
    Le = 0xA8,
    /// LT: push(lhs < rhs)
    Lt = 0xA9,
    /// GE: push(lhs >= rhs)
    Ge = 0xAA,
    /// GT: push(lhs > rhs)
    Gt = 0xAB,
}

impl Opcode {
    /// Every opcode
    pub const ALL: [Opcode; 21] = [
        Opcode::Move,
        Opcode::Movb,
        Opcode::Movw,
        Opcode::Movd,
        Opcode::Movq,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jle,
        Opcode::Jlt,
        Opcode::Jgt,
        Opcode::Jge,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Le,
        Opcode::Lt,
        Opcode::Ge,
        Opcode::Gt,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xFF => Some(Opcode::Move),
            0xEF => Some(Opcode::Movb),
            0xEE => Some(Opcode::Movw),
            0xED => Some(Opcode::Movd),
            0xEC => Some(Opcode::Movq),

            0xFD => Some(Opcode::Push),
            0xFC => Some(Opcode::Pop),

            0xFE => Some(Opcode::Jmp),
            0xF0 => Some(Opcode::Jeq),
            0xF1 => Some(Opcode::Jle),
            0xF2 => Some(Opcode::Jlt),
            0xF3 => Some(Opcode::Jgt),
            0xF4 => Some(Opcode::Jge),

            0xA0 => Some(Opcode::Add),
            0xA1 => Some(Opcode::Sub),
            0xA2 => Some(Opcode::Mul),
            0xA3 => Some(Opcode::Div),

            0xA8 => Some(Opcode::Le),
            0xA9 => Some(Opcode::Lt),
            0xAA => Some(Opcode::Ge),
            0xAB => Some(Opcode::Gt),

            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Canonical assembly mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Move => "MOV",
            Opcode::Movb => "MOVB",
            Opcode::Movw => "MOVW",
            Opcode::Movd => "MOVD",
            Opcode::Movq => "MOVQ",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jle => "JLE",
            Opcode::Jlt => "JLT",
            Opcode::Jgt => "JGT",
            Opcode::Jge => "JGE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Le => "LE",
            Opcode::Lt => "LT",
            Opcode::Ge => "GE",
            Opcode::Gt => "GT",
        }
    }

    /// Look up a mnemonic (case-insensitive). `MOVE` is accepted for `MOV`.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        if mnemonic.eq_ignore_ascii_case("MOVE") {
            return Some(Opcode::Move);
        }
        Self::ALL
            .into_iter()
            .find(|opcode| opcode.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    /// Number of operands
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Pop => 0,
            Opcode::Push | Opcode::Jmp => 1,
            Opcode::Jeq | Opcode::Jle | Opcode::Jlt | Opcode::Jgt | Opcode::Jge => 3,
            _ => 2,
        }
    }

    /// Width a move stores, `None` for the generic MOV or non-moves
    pub const fn move_width(self) -> Option<Width> {
        match self {
            Opcode::Movb => Some(Width::Byte),
            Opcode::Movw => Some(Width::Word),
            Opcode::Movd => Some(Width::DoubleWord),
            Opcode::Movq => Some(Width::QuadWord),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_move(self) -> bool {
        matches!(
            self,
            Opcode::Move | Opcode::Movb | Opcode::Movw | Opcode::Movd | Opcode::Movq
        )
    }

    #[inline]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }

    /// Check if the first operand names a memory destination
    #[inline]
    pub const fn writes_destination(self) -> bool {
        self.is_move() || self.is_arithmetic()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Operand tag: addressing modes and inline widths
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Current stack top byte
    Top = 0xB0,
    /// Memory reference; followed by a width tag and address, or a bare address byte
    Ref = 0xC0,
    /// Instruction pointer (reserved, never resolved)
    InsPtr = 0xC1,
    /// 1-byte value follows
    Byte = 0xD0,
    /// 2-byte value follows
    Word = 0xD1,
    /// 4-byte value follows
    DWord = 0xD2,
    /// 8-byte value follows
    QWord = 0xD3,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Top,
        Tag::Ref,
        Tag::InsPtr,
        Tag::Byte,
        Tag::Word,
        Tag::DWord,
        Tag::QWord,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xB0 => Some(Tag::Top),
            0xC0 => Some(Tag::Ref),
            0xC1 => Some(Tag::InsPtr),
            0xD0 => Some(Tag::Byte),
            0xD1 => Some(Tag::Word),
            0xD2 => Some(Tag::DWord),
            0xD3 => Some(Tag::QWord),
            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Width for width tags
    pub const fn width(self) -> Option<Width> {
        match self {
            Tag::Byte => Some(Width::Byte),
            Tag::Word => Some(Width::Word),
            Tag::DWord => Some(Width::DoubleWord),
            Tag::QWord => Some(Width::QuadWord),
            Tag::Top | Tag::Ref | Tag::InsPtr => None,
        }
    }

    /// Width tag for a width
    pub const fn for_width(width: Width) -> Self {
        match width {
            Width::Byte => Tag::Byte,
            Width::Word => Tag::Word,
            Width::DoubleWord => Tag::DWord,
            Width::QuadWord => Tag::QWord,
        }
    }

    /// Decode a raw byte as a width tag
    pub fn width_of(byte: u8) -> Option<Width> {
        Self::from_u8(byte).and_then(Tag::width)
    }

    /// Check if a raw byte in a leading operand slot would decode as a tag
    /// rather than a literal
    pub fn shadows_leading_literal(byte: u8) -> bool {
        byte == Tag::Top.to_u8() || byte == Tag::Ref.to_u8()
    }

    /// Check if a raw byte in a trailing operand slot would decode as a tag
    /// rather than a literal
    pub fn shadows_trailing_literal(byte: u8) -> bool {
        Self::shadows_leading_literal(byte) || Self::width_of(byte).is_some()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Top => "TOP",
            Tag::Ref => "REF",
            Tag::InsPtr => "INSPTR",
            Tag::Byte => "BYTE",
            Tag::Word => "WORD",
            Tag::DWord => "DWORD",
            Tag::QWord => "QWORD",
        };
        write!(f, "{}", name)
    }
}
