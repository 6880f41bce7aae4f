//! Memory subsystem
//!
//! Flat byte-addressed memory of [`MEMORY_SIZE`] bytes. Multi-byte values are
//! stored big-endian. Every access is bounds-checked against its last byte.

use crate::error::{Result, RuntimeError};
use bytevm_isa::{Value, Width, MEMORY_SIZE};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Zero-filled memory
    pub fn new() -> Self {
        Memory {
            data: vec![0; MEMORY_SIZE],
        }
    }

    fn range(&self, address: u64, width: Width) -> Result<Range<usize>> {
        let out_of_bounds = RuntimeError::OutOfBounds { address, width };
        let start = usize::try_from(address).map_err(|_| out_of_bounds.clone())?;
        let end = start.checked_add(width.bytes()).ok_or(out_of_bounds.clone())?;
        if end > self.data.len() {
            return Err(out_of_bounds);
        }
        Ok(start..end)
    }

    pub fn read(&self, address: u64, width: Width) -> Result<Value> {
        let range = self.range(address, width)?;
        self.data
            .get(range)
            .and_then(|bytes| Value::from_bytes(width, bytes))
            .ok_or(RuntimeError::OutOfBounds { address, width })
    }

    pub fn read_byte(&self, address: u64) -> Result<u8> {
        let range = self.range(address, Width::Byte)?;
        Ok(self.data[range.start])
    }

    /// Store `value`'s bytes starting at `address`
    pub fn write(&mut self, address: u64, value: Value) -> Result<()> {
        let width = value.width();
        let range = self.range(address, width)?;
        self.data[range].copy_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
