//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use bytevm_isa::{Executable, Instruction, Opcode, Operand, OperandSlot};

/// Decode the instruction at the executable's instruction pointer and
/// advance past it.
///
/// On error the instruction pointer is left at the start of the failing
/// instruction.
pub fn decode_next(exe: &mut Executable) -> Result<Instruction> {
    let start = exe.position();
    let result = decode_at(exe, start);
    if result.is_err() {
        exe.set_position(start);
    }
    result
}

fn decode_at(exe: &mut Executable, start: usize) -> Result<Instruction> {
    let byte = exe
        .read_byte()
        .map_err(|_| DisassemblerError::Truncated { offset: start })?;
    let opcode = Opcode::from_u8(byte).ok_or(DisassemblerError::UnknownOpcode {
        opcode: byte,
        offset: start,
    })?;

    let operands = (0..opcode.arity())
        .map(|index| {
            Operand::decode(exe, OperandSlot::for_index(index))
                .map_err(|_| DisassemblerError::Truncated { offset: start })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Instruction::new(opcode, operands))
}

/// Decode a whole buffer, pairing each instruction with its offset
pub fn decode_listing(bytes: &[u8]) -> Result<Vec<(usize, Instruction)>> {
    let mut exe = Executable::new(bytes.to_vec());
    let mut listing = Vec::new();
    while !exe.is_at_end() {
        let offset = exe.position();
        listing.push((offset, decode_next(&mut exe)?));
    }
    Ok(listing)
}

/// Decode a whole buffer
pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>> {
    Ok(decode_listing(bytes)?
        .into_iter()
        .map(|(_, instr)| instr)
        .collect())
}
