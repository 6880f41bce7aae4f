//! # Value Types for ByteVM
//!
//! Values come in four widths: Byte (1), Word (2), DoubleWord (4) and
//! QuadWord (8 bytes). Each is stored as a big-endian byte array, and each
//! wider value decomposes into a high and a low half of the next narrower
//! width:
//!
//! ```text
//! QuadWord   = [ DoubleWord high | DoubleWord low ]
//! DoubleWord = [ Word high       | Word low       ]
//! Word       = [ Byte high       | Byte low       ]
//! ```
//!
//! ## Componentwise operators
//!
//! The `componentwise_*` family operates on matching bytes independently.
//! Nothing carries or borrows across byte boundaries, so
//! `Word(0x00FF) componentwise_add Word(0x0001)` is `Word(0x0000)`, not
//! `Word(0x0100)`. The result has the width of the left operand; the right
//! operand is zero-extended or truncated to its low bytes first.
//!
//! `componentwise_cmp` sums the signed per-byte differences. It orders bytes
//! correctly but is not a magnitude compare for wider values.
//!
//! For true magnitudes use [`Value::to_u64`] and [`Value::from_u64`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Operand width in bytes
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Width {
    /// 1 byte
    Byte = 1,
    /// 2 bytes
    Word = 2,
    /// 4 bytes
    DoubleWord = 4,
    /// 8 bytes
    QuadWord = 8,
}

impl Width {
    /// All widths, narrowest first
    pub const ALL: [Width; 4] = [Width::Byte, Width::Word, Width::DoubleWord, Width::QuadWord];

    /// Number of bytes
    #[inline]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Assembly keyword for this width
    pub const fn keyword(self) -> &'static str {
        match self {
            Width::Byte => "BYTE",
            Width::Word => "WORD",
            Width::DoubleWord => "DWORD",
            Width::QuadWord => "QWORD",
        }
    }

    /// Parse a size keyword (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|width| width.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Check if an unsigned magnitude fits in this width
    pub const fn fits(self, value: u64) -> bool {
        match self {
            Width::QuadWord => true,
            _ => value < (1u64 << (self.bytes() * 8)),
        }
    }

    /// Narrowest width that holds `value`
    pub fn narrowest(value: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|width| width.fits(value))
            .unwrap_or(Width::QuadWord)
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A 1/2/4/8-byte value, big-endian
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Byte(u8),
    Word([u8; 2]),
    DoubleWord([u8; 4]),
    QuadWord([u8; 8]),
}

impl Value {
    /// Zero of the given width
    pub const fn zero(width: Width) -> Self {
        match width {
            Width::Byte => Value::Byte(0),
            Width::Word => Value::Word([0; 2]),
            Width::DoubleWord => Value::DoubleWord([0; 4]),
            Width::QuadWord => Value::QuadWord([0; 8]),
        }
    }

    /// Width of this value
    #[inline]
    pub const fn width(&self) -> Width {
        match self {
            Value::Byte(_) => Width::Byte,
            Value::Word(_) => Width::Word,
            Value::DoubleWord(_) => Width::DoubleWord,
            Value::QuadWord(_) => Width::QuadWord,
        }
    }

    /// Raw big-endian bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Byte(b) => std::slice::from_ref(b),
            Value::Word(b) => b,
            Value::DoubleWord(b) => b,
            Value::QuadWord(b) => b,
        }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Value::Byte(b) => std::slice::from_mut(b),
            Value::Word(b) => b,
            Value::DoubleWord(b) => b,
            Value::QuadWord(b) => b,
        }
    }

    /// Build a value from exactly `width.bytes()` big-endian bytes
    pub fn from_bytes(width: Width, bytes: &[u8]) -> Option<Self> {
        match width {
            Width::Byte => match bytes {
                [b] => Some(Value::Byte(*b)),
                _ => None,
            },
            Width::Word => bytes.try_into().ok().map(Value::Word),
            Width::DoubleWord => bytes.try_into().ok().map(Value::DoubleWord),
            Width::QuadWord => bytes.try_into().ok().map(Value::QuadWord),
        }
    }

    /// Build a value of `width` from the low bytes of `value`
    pub const fn from_u64(width: Width, value: u64) -> Self {
        match width {
            Width::Byte => Value::Byte(value as u8),
            Width::Word => Value::Word((value as u16).to_be_bytes()),
            Width::DoubleWord => Value::DoubleWord((value as u32).to_be_bytes()),
            Width::QuadWord => Value::QuadWord(value.to_be_bytes()),
        }
    }

    /// Unsigned magnitude
    pub const fn to_u64(&self) -> u64 {
        match self {
            Value::Byte(b) => *b as u64,
            Value::Word(b) => u16::from_be_bytes(*b) as u64,
            Value::DoubleWord(b) => u32::from_be_bytes(*b) as u64,
            Value::QuadWord(b) => u64::from_be_bytes(*b),
        }
    }

    /// Zero-extend or truncate (keeping the low bytes) to `width`
    pub const fn resize(self, width: Width) -> Self {
        Value::from_u64(width, self.to_u64())
    }

    /// High half, `None` for a Byte
    pub const fn high(&self) -> Option<Value> {
        match self {
            Value::Byte(_) => None,
            Value::Word([h, _]) => Some(Value::Byte(*h)),
            Value::DoubleWord([a, b, _, _]) => Some(Value::Word([*a, *b])),
            Value::QuadWord([a, b, c, d, _, _, _, _]) => Some(Value::DoubleWord([*a, *b, *c, *d])),
        }
    }

    /// Low half, `None` for a Byte
    pub const fn low(&self) -> Option<Value> {
        match self {
            Value::Byte(_) => None,
            Value::Word([_, l]) => Some(Value::Byte(*l)),
            Value::DoubleWord([_, _, c, d]) => Some(Value::Word([*c, *d])),
            Value::QuadWord([_, _, _, _, e, f, g, h]) => Some(Value::DoubleWord([*e, *f, *g, *h])),
        }
    }

    /// Join two halves of the same width into the next wider value
    pub const fn from_halves(high: Value, low: Value) -> Option<Value> {
        match (high, low) {
            (Value::Byte(h), Value::Byte(l)) => Some(Value::Word([h, l])),
            (Value::Word([a, b]), Value::Word([c, d])) => Some(Value::DoubleWord([a, b, c, d])),
            (Value::DoubleWord([a, b, c, d]), Value::DoubleWord([e, f, g, h])) => {
                Some(Value::QuadWord([a, b, c, d, e, f, g, h]))
            }
            _ => None,
        }
    }

    fn zip_with(self, rhs: Value, op: impl Fn(u8, u8) -> u8) -> Value {
        let rhs = rhs.resize(self.width());
        let mut out = self;
        for (a, b) in out.as_bytes_mut().iter_mut().zip(rhs.as_bytes()) {
            *a = op(*a, *b);
        }
        out
    }

    /// Bytewise wrapping addition
    pub fn componentwise_add(self, rhs: Value) -> Value {
        self.zip_with(rhs, u8::wrapping_add)
    }

    /// Bytewise wrapping subtraction
    pub fn componentwise_sub(self, rhs: Value) -> Value {
        self.zip_with(rhs, u8::wrapping_sub)
    }

    /// Bytewise wrapping multiplication
    pub fn componentwise_mul(self, rhs: Value) -> Value {
        self.zip_with(rhs, u8::wrapping_mul)
    }

    /// Bytewise division; `None` if any divisor byte is zero
    pub fn checked_componentwise_div(self, rhs: Value) -> Option<Value> {
        let rhs = rhs.resize(self.width());
        if rhs.as_bytes().contains(&0) {
            return None;
        }
        Some(self.zip_with(rhs, |a, b| a / b))
    }

    pub fn componentwise_and(self, rhs: Value) -> Value {
        self.zip_with(rhs, |a, b| a & b)
    }

    pub fn componentwise_or(self, rhs: Value) -> Value {
        self.zip_with(rhs, |a, b| a | b)
    }

    pub fn componentwise_xor(self, rhs: Value) -> Value {
        self.zip_with(rhs, |a, b| a ^ b)
    }

    /// Bytewise left shift; shifting a byte by 8 or more yields 0
    pub fn componentwise_shl(self, rhs: Value) -> Value {
        self.zip_with(rhs, |a, b| a.checked_shl(u32::from(b)).unwrap_or(0))
    }

    /// Bytewise logical right shift; shifting a byte by 8 or more yields 0
    pub fn componentwise_shr(self, rhs: Value) -> Value {
        self.zip_with(rhs, |a, b| a.checked_shr(u32::from(b)).unwrap_or(0))
    }

    /// Sum of signed per-byte differences, both sides widened to the wider width
    pub fn componentwise_cmp(&self, rhs: &Value) -> i64 {
        let width = self.width().max(rhs.width());
        let lhs = self.resize(width);
        let rhs = rhs.resize(width);
        lhs.as_bytes()
            .iter()
            .zip(rhs.as_bytes())
            .map(|(a, b)| i64::from(*a) - i64::from(*b))
            .sum()
    }

    /// Sign of [`Value::componentwise_cmp`]
    pub fn componentwise_ordering(&self, rhs: &Value) -> Ordering {
        self.componentwise_cmp(rhs).cmp(&0)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Byte(value)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Byte(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u64())
    }
}
