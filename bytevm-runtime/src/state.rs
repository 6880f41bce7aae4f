//! VM state for ByteVM

use crate::error::{Result, RuntimeError};
use crate::memory::Memory;
use crate::stack::Stack;
use bytevm_isa::{Operand, Value, Width};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    /// Instruction pointer reached or passed the end of the bytecode
    EndOfProgram,
    /// `VMConfig::max_cycles` instructions executed
    CycleLimit,
    /// A fatal runtime error stopped execution
    Faulted,
}

/// Everything the VM mutates apart from the instruction pointer
#[derive(Debug, Clone, Default)]
pub struct VMState {
    pub stack: Stack,
    pub memory: Memory,

    /// Instructions executed, including skipped ones
    pub cycles: u64,

    pub halt_reason: Option<HaltReason>,

    /// Recoverable errors, in the order they occurred
    pub faults: Vec<RuntimeError>,
}

impl VMState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halt_reason.is_some()
    }

    pub fn halt(&mut self, reason: HaltReason) {
        self.halt_reason = Some(reason);
    }

    /// Resolve a decoded operand to a value
    pub fn resolve(&self, operand: &Operand) -> Result<Value> {
        match operand {
            Operand::Literal(byte) => Ok(Value::Byte(*byte)),
            Operand::Top => Ok(Value::Byte(self.stack.top())),
            Operand::Reference(address) => self.memory.read(address.to_u64(), address.width()),
            Operand::ShortReference(address) => {
                self.memory.read(u64::from(*address), Width::Byte)
            }
            Operand::Immediate(value) => Ok(*value),
        }
    }
}
