//! ByteVM instructions and operand addressing modes
//!
//! An instruction is one opcode byte followed by `arity` operands. Each
//! operand starts with one byte that is either a tag or a plain literal:
//!
//! ```text
//! TOP                         stack top byte
//! REF  <width tag> <address>  memory at a 1/2/4/8-byte address, read at that width
//! REF  <address byte>         memory byte at a one-byte address
//! <width tag> <value>         inline value (trailing slots only)
//! <byte>                      literal byte
//! ```
//!
//! A literal byte that equals a tag is read as the tag. Encoders must escape
//! such literals (see [`Tag::shadows_leading_literal`]).

use crate::error::Result;
use crate::executable::Executable;
use crate::opcode::{Opcode, Tag};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Operand position within an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandSlot {
    /// First operand: width tags are plain literals here
    Leading,
    /// Second and third operands: width tags introduce inline values
    Trailing,
}

impl OperandSlot {
    /// Slot kind for the operand at `index`
    pub const fn for_index(index: usize) -> Self {
        if index == 0 {
            OperandSlot::Leading
        } else {
            OperandSlot::Trailing
        }
    }
}

/// Decoded operand, before resolution against VM state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    /// Plain byte
    Literal(u8),
    /// Stack top byte
    Top,
    /// Memory reference with a width-tagged address; reads `address.width()` bytes
    Reference(Value),
    /// Memory reference with a bare one-byte address; reads one byte
    ShortReference(u8),
    /// Inline value of any width
    Immediate(Value),
}

impl Operand {
    /// Decode one operand at the instruction pointer
    pub fn decode(exe: &mut Executable, slot: OperandSlot) -> Result<Operand> {
        let byte = exe.read_byte()?;

        if byte == Tag::Top.to_u8() {
            return Ok(Operand::Top);
        }

        if byte == Tag::Ref.to_u8() {
            let tag = exe.read_byte()?;
            return match Tag::width_of(tag) {
                Some(width) => Ok(Operand::Reference(exe.read_value(width)?)),
                None => Ok(Operand::ShortReference(tag)),
            };
        }

        if slot == OperandSlot::Trailing {
            if let Some(width) = Tag::width_of(byte) {
                return Ok(Operand::Immediate(exe.read_value(width)?));
            }
        }

        Ok(Operand::Literal(byte))
    }

    /// Check if this operand decodes back to itself in `slot`
    pub fn is_encodable_in(&self, slot: OperandSlot) -> bool {
        match self {
            Operand::Literal(byte) => match slot {
                OperandSlot::Leading => !Tag::shadows_leading_literal(*byte),
                OperandSlot::Trailing => !Tag::shadows_trailing_literal(*byte),
            },
            Operand::Top | Operand::Reference(_) => true,
            Operand::ShortReference(address) => Tag::width_of(*address).is_none(),
            Operand::Immediate(_) => slot == OperandSlot::Trailing,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            Operand::Literal(_) | Operand::Top => 1,
            Operand::ShortReference(_) => 2,
            Operand::Reference(address) => 2 + address.width().bytes(),
            Operand::Immediate(value) => 1 + value.width().bytes(),
        }
    }
}

/// One decoded instruction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// Check operand count against the opcode's arity
    pub fn has_valid_arity(&self) -> bool {
        self.operands.len() == self.opcode.arity()
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        1 + self.operands.iter().map(Operand::encoded_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsaError;
    use crate::value::Width;

    fn decode(bytes: &[u8], slot: OperandSlot) -> Result<Operand> {
        Operand::decode(&mut Executable::new(bytes.to_vec()), slot)
    }

    #[test]
    fn test_decode_literal() {
        assert_eq!(decode(&[5], OperandSlot::Leading), Ok(Operand::Literal(5)));
        assert_eq!(decode(&[5], OperandSlot::Trailing), Ok(Operand::Literal(5)));
    }

    #[test]
    fn test_decode_top() {
        assert_eq!(decode(&[0xB0], OperandSlot::Leading), Ok(Operand::Top));
    }

    #[test]
    fn test_decode_reference() {
        assert_eq!(
            decode(&[0xC0, 0xD0, 0x10], OperandSlot::Leading),
            Ok(Operand::Reference(Value::Byte(0x10)))
        );
        assert_eq!(
            decode(&[0xC0, 0xD1, 0x01, 0x00], OperandSlot::Trailing),
            Ok(Operand::Reference(Value::Word([0x01, 0x00])))
        );
    }

    #[test]
    fn test_decode_short_reference() {
        assert_eq!(
            decode(&[0xC0, 0x10], OperandSlot::Leading),
            Ok(Operand::ShortReference(0x10))
        );
    }

    #[test]
    fn test_width_tag_depends_on_slot() {
        assert_eq!(decode(&[0xD1, 0x01, 0x2C], OperandSlot::Leading), Ok(Operand::Literal(0xD1)));
        assert_eq!(
            decode(&[0xD1, 0x01, 0x2C], OperandSlot::Trailing),
            Ok(Operand::Immediate(Value::from_u64(Width::Word, 300)))
        );
    }

    #[test]
    fn test_insptr_is_a_literal() {
        assert_eq!(decode(&[0xC1], OperandSlot::Trailing), Ok(Operand::Literal(0xC1)));
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(
            decode(&[0xD2, 0x00], OperandSlot::Trailing),
            Err(IsaError::UnexpectedEnd { offset: 1, needed: 3 })
        );
        assert!(decode(&[0xC0], OperandSlot::Leading).is_err());
        assert!(decode(&[], OperandSlot::Leading).is_err());
    }

    #[test]
    fn test_is_encodable_in() {
        assert!(!Operand::Literal(0xB0).is_encodable_in(OperandSlot::Leading));
        assert!(Operand::Literal(0xD0).is_encodable_in(OperandSlot::Leading));
        assert!(!Operand::Literal(0xD0).is_encodable_in(OperandSlot::Trailing));
        assert!(!Operand::Immediate(Value::Byte(1)).is_encodable_in(OperandSlot::Leading));
        assert!(!Operand::ShortReference(0xD2).is_encodable_in(OperandSlot::Leading));
        assert!(Operand::ShortReference(0x20).is_encodable_in(OperandSlot::Leading));
    }

    #[test]
    fn test_encoded_len() {
        let instr = Instruction::new(
            Opcode::Move,
            vec![
                Operand::Literal(0),
                Operand::Immediate(Value::from_u64(Width::Word, 300)),
            ],
        );
        assert_eq!(instr.encoded_len(), 5);
        assert!(instr.has_valid_arity());
        assert!(!Instruction::new(Opcode::Pop, vec![Operand::Top]).has_valid_arity());
    }
}
