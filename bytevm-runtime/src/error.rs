//! Runtime error types for ByteVM

use bytevm_disassembler::DisassemblerError;
use bytevm_isa::Width;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuntimeError {
    #[error("Invalid opcode 0x{opcode:02X} at PC {pc}")]
    InvalidOpcode { opcode: u8, pc: usize },

    #[error("Operand type mismatch at PC {pc}: expected {expected}, found {found}")]
    OperandTypeMismatch {
        expected: Width,
        found: Width,
        pc: usize,
    },

    #[error("Division by zero at PC {pc}")]
    DivisionByZero { pc: usize },

    #[error("Memory out of bounds: address {address}, width {width}")]
    OutOfBounds { address: u64, width: Width },

    #[error("Stack overflow: capacity {capacity} bytes")]
    StackOverflow { capacity: usize },

    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Truncated instruction at PC {pc}")]
    TruncatedInstruction { pc: usize },

    #[error("Malformed instruction at PC {pc}")]
    MalformedInstruction { pc: usize },
}

impl RuntimeError {
    /// Check if execution may continue past the failing instruction
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RuntimeError::OperandTypeMismatch { .. })
    }
}

impl From<DisassemblerError> for RuntimeError {
    fn from(err: DisassemblerError) -> Self {
        match err {
            DisassemblerError::UnknownOpcode { opcode, offset } => {
                RuntimeError::InvalidOpcode { opcode, pc: offset }
            }
            DisassemblerError::Truncated { offset } => {
                RuntimeError::TruncatedInstruction { pc: offset }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
