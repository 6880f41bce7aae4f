//! # ByteVM Disassembler
//!
//! Decode ByteVM bytecode into instructions and format them as assembly
//! text the assembler accepts again.
//!
//! The decoder here is also what the runtime uses to fetch instructions.
//!
//! ## Example
//!
//! ```rust
//! use bytevm_isa::Executable;
//! use bytevm_disassembler::{decode, format};
//!
//! let instrs = decode(&[0xFF, 0x00, 0xD1, 0x01, 0x2C]).unwrap();
//! assert_eq!(format(&instrs[0]), "MOV 0, WORD 300");
//!
//! let text = bytevm_disassembler::disassemble(&Executable::new(vec![0xFC])).unwrap();
//! assert!(text.contains("POP"));
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::disassemble;
pub use decoder::{decode, decode_listing, decode_next};
pub use formatter::{format, format_operand};
