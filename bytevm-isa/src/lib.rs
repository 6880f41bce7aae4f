//! # ByteVM Instruction Set
//!
//! Single-byte opcode architecture shared by the assembler, disassembler and
//! runtime.
//!
//! ## Key Features
//! - One-byte opcodes and one-byte addressing/width tags in the same space
//! - Operands resolved polymorphically: literal, stack top, memory reference,
//!   or inline immediate of width 1/2/4/8 bytes
//! - Multi-width values with componentwise (non-carrying) arithmetic
//! - Flat, headerless bytecode buffers
//!
//! ## Example
//!
//! ```rust
//! use bytevm_isa::{Executable, Opcode, Operand, OperandSlot};
//!
//! let mut exe = Executable::new(vec![Opcode::Push.to_u8(), 5]);
//! assert_eq!(exe.read_byte().unwrap(), Opcode::Push.to_u8());
//! let operand = Operand::decode(&mut exe, OperandSlot::Leading).unwrap();
//! assert_eq!(operand, Operand::Literal(5));
//! ```

pub mod error;
pub mod value;
pub mod opcode;
pub mod executable;
pub mod instruction;

pub use error::{IsaError, Result};
pub use value::{Value, Width};
pub use opcode::{Opcode, Tag};
pub use executable::Executable;
pub use instruction::{Instruction, Operand, OperandSlot};

/// Stack capacity in bytes
pub const STACK_SIZE: usize = 1024;

/// Memory capacity in bytes
pub const MEMORY_SIZE: usize = 1024;
