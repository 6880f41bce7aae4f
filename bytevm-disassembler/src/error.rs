//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Unknown opcode 0x{opcode:02X} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("Truncated instruction at offset {offset}")]
    Truncated { offset: usize },
}

impl DisassemblerError {
    /// Offset of the first byte of the failing instruction
    pub fn offset(&self) -> usize {
        match self {
            DisassemblerError::UnknownOpcode { offset, .. }
            | DisassemblerError::Truncated { offset } => *offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
