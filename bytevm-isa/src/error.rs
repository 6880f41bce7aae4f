//! # Error Types for the ByteVM instruction set

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsaError {
    #[error("Unexpected end of bytecode at offset {offset}: {needed} more byte(s) needed")]
    UnexpectedEnd { offset: usize, needed: usize },
}

pub type Result<T> = std::result::Result<T, IsaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IsaError::UnexpectedEnd { offset: 4, needed: 2 };
        assert_eq!(
            err.to_string(),
            "Unexpected end of bytecode at offset 4: 2 more byte(s) needed"
        );
    }
}
