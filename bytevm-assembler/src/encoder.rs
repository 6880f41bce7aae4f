//! Instruction encoder
//!
//! Lays out one opcode byte followed by each operand's bytes, big-endian.

use bytevm_isa::{Instruction, Operand, Tag};

/// Encode an instruction to bytes
pub fn encode(instr: &Instruction) -> Vec<u8> {
    let mut out = Vec::with_capacity(instr.encoded_len());
    encode_into(instr, &mut out);
    out
}

/// Append an encoded instruction to `out`
pub fn encode_into(instr: &Instruction, out: &mut Vec<u8>) {
    out.push(instr.opcode.to_u8());
    for operand in &instr.operands {
        encode_operand(operand, out);
    }
}

fn encode_operand(operand: &Operand, out: &mut Vec<u8>) {
    match operand {
        Operand::Literal(byte) => out.push(*byte),
        Operand::Top => out.push(Tag::Top.to_u8()),
        Operand::Reference(address) => {
            out.push(Tag::Ref.to_u8());
            out.push(Tag::for_width(address.width()).to_u8());
            out.extend_from_slice(address.as_bytes());
        }
        Operand::ShortReference(address) => {
            out.push(Tag::Ref.to_u8());
            out.push(*address);
        }
        Operand::Immediate(value) => {
            out.push(Tag::for_width(value.width()).to_u8());
            out.extend_from_slice(value.as_bytes());
        }
    }
}
