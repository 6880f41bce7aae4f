//! # Executable bytecode buffer
//!
//! A flat, headerless byte buffer plus the instruction pointer that walks it.
//! Multi-byte values are read big-endian.

use crate::error::{IsaError, Result};
use crate::value::{Value, Width};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Assembled program with its instruction pointer
///
/// Equality and hashing only look at the bytes, never at the cursor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Executable {
    code: Vec<u8>,

    #[serde(skip)]
    cursor: usize,
}

impl Executable {
    /// Create an executable positioned at offset 0
    pub fn new(code: Vec<u8>) -> Self {
        Self { code, cursor: 0 }
    }

    /// Raw bytecode
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    /// Consume and return the raw bytecode
    pub fn into_bytes(self) -> Vec<u8> {
        self.code
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Current instruction pointer
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move the instruction pointer. Offsets past the end are allowed and
    /// simply end the program.
    #[inline]
    pub fn set_position(&mut self, offset: usize) {
        self.cursor = offset;
    }

    /// Reset the instruction pointer to offset 0
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.code.len()
    }

    /// Bytes left after the instruction pointer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.code.len().saturating_sub(self.cursor)
    }

    /// Next byte without advancing
    pub fn peek_byte(&self) -> Option<u8> {
        self.code.get(self.cursor).copied()
    }

    /// Read one byte and advance
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte().ok_or(IsaError::UnexpectedEnd {
            offset: self.cursor,
            needed: 1,
        })?;
        self.cursor += 1;
        Ok(byte)
    }

    /// Read `count` bytes and advance
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if available < count {
            return Err(IsaError::UnexpectedEnd {
                offset: self.cursor,
                needed: count - available,
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.code[start..self.cursor])
    }

    /// Read a value of the given width and advance
    pub fn read_value(&mut self, width: Width) -> Result<Value> {
        let offset = self.cursor;
        let bytes = self.read_bytes(width.bytes())?;
        Value::from_bytes(width, bytes).ok_or(IsaError::UnexpectedEnd { offset, needed: width.bytes() })
    }

    pub fn read_word(&mut self) -> Result<Value> {
        self.read_value(Width::Word)
    }

    pub fn read_double_word(&mut self) -> Result<Value> {
        self.read_value(Width::DoubleWord)
    }

    pub fn read_quad_word(&mut self) -> Result<Value> {
        self.read_value(Width::QuadWord)
    }
}

impl From<Vec<u8>> for Executable {
    fn from(code: Vec<u8>) -> Self {
        Self::new(code)
    }
}

impl PartialEq for Executable {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Executable {}

impl Hash for Executable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let mut exe = Executable::new(vec![0x01, 0x01, 0x2C, 0, 0, 0, 7]);
        assert_eq!(exe.read_byte().unwrap(), 0x01);
        assert_eq!(exe.read_word().unwrap().to_u64(), 300);
        assert_eq!(exe.read_double_word().unwrap().to_u64(), 7);
        assert!(exe.is_at_end());
    }

    #[test]
    fn test_quad_word_read() {
        let mut exe = Executable::new(vec![0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(exe.read_quad_word().unwrap().to_u64(), 0x1_0000_0002);
        assert_eq!(exe.position(), 8);
    }

    #[test]
    fn test_read_past_end() {
        let mut exe = Executable::new(vec![0x01]);
        assert_eq!(
            exe.read_word(),
            Err(IsaError::UnexpectedEnd { offset: 0, needed: 1 })
        );
        // Cursor does not move on a failed read
        assert_eq!(exe.position(), 0);
        assert_eq!(exe.read_byte().unwrap(), 0x01);
        assert_eq!(exe.read_byte(), Err(IsaError::UnexpectedEnd { offset: 1, needed: 1 }));
    }

    #[test]
    fn test_jump_past_end() {
        let mut exe = Executable::new(vec![1, 2, 3]);
        exe.set_position(200);
        assert!(exe.is_at_end());
        assert_eq!(exe.remaining(), 0);
        assert_eq!(exe.peek_byte(), None);
        exe.rewind();
        assert_eq!(exe.peek_byte(), Some(1));
    }

    #[test]
    fn test_equality_ignores_cursor() {
        let mut a = Executable::new(vec![1, 2, 3]);
        let b = Executable::new(vec![1, 2, 3]);
        a.read_byte().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Executable::new(vec![1, 2]));
    }
}
