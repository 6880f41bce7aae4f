//! Byte stack

use crate::error::{Result, RuntimeError};
use bytevm_isa::{Value, STACK_SIZE};
use serde::{Deserialize, Serialize};

/// Fixed-capacity LIFO of bytes
///
/// Multi-byte values are pushed high byte first, so the top of the stack is
/// the value's low byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    data: Vec<u8>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_SIZE),
        }
    }

    /// Push all bytes of `value`. Nothing is pushed if they do not all fit.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let bytes = value.as_bytes();
        if self.data.len() + bytes.len() > STACK_SIZE {
            return Err(RuntimeError::StackOverflow {
                capacity: STACK_SIZE,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Remove one byte
    pub fn pop(&mut self) -> Result<u8> {
        self.data.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Most recently pushed byte, 0 when empty
    pub fn top(&self) -> u8 {
        self.data.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Contents, bottom first
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
