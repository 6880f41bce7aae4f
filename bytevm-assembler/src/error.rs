//! Assembler errors

use crate::lexer::Position;
use std::fmt;
use thiserror::Error;

/// Tokenizer failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character {character:?} at {position}")]
    UnexpectedCharacter { position: Position, character: char },

    #[error("Integer literal `{text}` out of range at {position}")]
    IntegerOutOfRange { position: Position, text: String },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::IntegerOutOfRange { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Syntax error at {position}: expected {expected}, found {found}")]
    SyntaxError {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("Unknown instruction at {position}: {mnemonic}")]
    UnknownInstruction { position: Position, mnemonic: String },

    #[error("Unsupported operand at {position}: {reason}")]
    UnsupportedOperand { position: Position, reason: String },

    #[error("Duplicate label at {position}: {name}")]
    DuplicateLabel { position: Position, name: String },

    #[error("{name} are not yet implemented (at {position})")]
    UnimplementedFeature { position: Position, name: String },
}

impl AssemblerError {
    /// Start of the offending token, or just past the last token at end of input
    pub fn position(&self) -> Position {
        match self {
            AssemblerError::Lex(err) => err.position(),
            AssemblerError::SyntaxError { position, .. }
            | AssemblerError::UnknownInstruction { position, .. }
            | AssemblerError::UnsupportedOperand { position, .. }
            | AssemblerError::DuplicateLabel { position, .. }
            | AssemblerError::UnimplementedFeature { position, .. } => *position,
        }
    }

    /// Human-readable message without the position prefix
    pub fn message(&self) -> String {
        match self {
            AssemblerError::Lex(LexError::UnexpectedCharacter { character, .. }) => {
                format!("unexpected character {character:?}")
            }
            AssemblerError::Lex(LexError::IntegerOutOfRange { text, .. }) => {
                format!("integer literal `{text}` out of range")
            }
            AssemblerError::SyntaxError { expected, found, .. } => {
                format!("expected {expected}, found {found}")
            }
            AssemblerError::UnknownInstruction { mnemonic, .. } => {
                format!("unknown instruction `{mnemonic}`")
            }
            AssemblerError::UnsupportedOperand { reason, .. } => reason.clone(),
            AssemblerError::DuplicateLabel { name, .. } => {
                format!("label `{name}` is already defined")
            }
            AssemblerError::UnimplementedFeature { name, .. } => {
                format!("{name} are not yet implemented")
            }
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            position: self.position(),
            message: self.message(),
        }
    }
}

/// Positioned message suitable for editor-style reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.position.line, self.position.column, self.message)
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
