//! Instruction execution for ByteVM

use crate::error::{Result, RuntimeError};
use crate::state::VMState;
use bytevm_isa::{Executable, Instruction, Opcode, Operand, Value, Width};

/// Relation tested by compare and conditional jump instructions
///
/// Applied to the componentwise difference of the two operands, not to their
/// magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    LessOrEqual,
    Less,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    pub fn for_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Jeq => Some(Comparison::Equal),
            Opcode::Le | Opcode::Jle => Some(Comparison::LessOrEqual),
            Opcode::Lt | Opcode::Jlt => Some(Comparison::Less),
            Opcode::Gt | Opcode::Jgt => Some(Comparison::Greater),
            Opcode::Ge | Opcode::Jge => Some(Comparison::GreaterOrEqual),
            _ => None,
        }
    }

    pub fn holds(self, lhs: &Value, rhs: &Value) -> bool {
        let difference = lhs.componentwise_cmp(rhs);
        match self {
            Comparison::Equal => difference == 0,
            Comparison::LessOrEqual => difference <= 0,
            Comparison::Less => difference < 0,
            Comparison::Greater => difference > 0,
            Comparison::GreaterOrEqual => difference >= 0,
        }
    }
}

/// Execute a decoded instruction
///
/// `pc` is the offset the instruction was fetched from; `exe`'s instruction
/// pointer already points past it and is only moved by jumps.
pub fn execute(
    instr: &Instruction,
    pc: usize,
    exe: &mut Executable,
    state: &mut VMState,
) -> Result<()> {
    let opcode = instr.opcode;

    match opcode {
        Opcode::Move | Opcode::Movb | Opcode::Movw | Opcode::Movd | Opcode::Movq => {
            let [dst, src] = operands::<2>(instr, pc)?;
            let address = expect_byte(state.resolve(dst)?, pc)?;
            let value = state.resolve(src)?;
            if let Some(width) = opcode.move_width() {
                expect_width(&value, width, pc)?;
            }
            state.memory.write(u64::from(address), value)?;
        }

        Opcode::Push => {
            let [operand] = operands::<1>(instr, pc)?;
            let value = state.resolve(operand)?;
            state.stack.push(value)?;
        }

        Opcode::Pop => {
            let [] = operands::<0>(instr, pc)?;
            state.stack.pop()?;
        }

        Opcode::Jmp => {
            let [target] = operands::<1>(instr, pc)?;
            let target = expect_byte(state.resolve(target)?, pc)?;
            exe.set_position(usize::from(target));
        }

        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
            let [dst, src] = operands::<2>(instr, pc)?;
            let address = u64::from(expect_byte(state.resolve(dst)?, pc)?);
            let rhs = state.resolve(src)?;
            let lhs = Value::Byte(state.memory.read_byte(address)?);
            let result = match opcode {
                Opcode::Add => lhs.componentwise_add(rhs),
                Opcode::Sub => lhs.componentwise_sub(rhs),
                Opcode::Mul => lhs.componentwise_mul(rhs),
                _ => lhs
                    .checked_componentwise_div(rhs)
                    .ok_or(RuntimeError::DivisionByZero { pc })?,
            };
            state.memory.write(address, result)?;
        }

        Opcode::Le | Opcode::Lt | Opcode::Ge | Opcode::Gt => {
            let [lhs, rhs] = operands::<2>(instr, pc)?;
            let lhs = state.resolve(lhs)?;
            let rhs = state.resolve(rhs)?;
            let holds = relation(opcode, pc)?.holds(&lhs, &rhs);
            state.stack.push(Value::Byte(u8::from(holds)))?;
        }

        Opcode::Jeq | Opcode::Jle | Opcode::Jlt | Opcode::Jgt | Opcode::Jge => {
            let [lhs, rhs, target] = operands::<3>(instr, pc)?;
            let lhs = state.resolve(lhs)?;
            let rhs = state.resolve(rhs)?;
            let target = expect_byte(state.resolve(target)?, pc)?;
            if relation(opcode, pc)?.holds(&lhs, &rhs) {
                exe.set_position(usize::from(target));
            }
        }
    }

    Ok(())
}

fn operands<const N: usize>(instr: &Instruction, pc: usize) -> Result<&[Operand; N]> {
    <&[Operand; N]>::try_from(instr.operands.as_slice())
        .map_err(|_| RuntimeError::MalformedInstruction { pc })
}

fn relation(opcode: Opcode, pc: usize) -> Result<Comparison> {
    Comparison::for_opcode(opcode).ok_or(RuntimeError::MalformedInstruction { pc })
}

fn expect_byte(value: Value, pc: usize) -> Result<u8> {
    match value {
        Value::Byte(byte) => Ok(byte),
        other => Err(RuntimeError::OperandTypeMismatch {
            expected: Width::Byte,
            found: other.width(),
            pc,
        }),
    }
}

fn expect_width(value: &Value, expected: Width, pc: usize) -> Result<()> {
    if value.width() == expected {
        Ok(())
    } else {
        Err(RuntimeError::OperandTypeMismatch {
            expected,
            found: value.width(),
            pc,
        })
    }
}
