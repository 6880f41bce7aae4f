//! ByteVM Assembler
//!
//! Assemble ByteVM assembly language into executable bytecode.
//!
//! ## Example
//!
//! ```rust
//! use bytevm_assembler::assemble;
//!
//! let source = r#"
//!     PUSH 5
//!     MOV 0, WORD 300
//! "#;
//!
//! let executable = assemble(source).unwrap();
//! assert_eq!(executable.as_bytes(), &[0xFD, 5, 0xFF, 0, 0xD1, 0x01, 0x2C]);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, Diagnostic, LexError, Result};
pub use lexer::{tokenize, Position, SpannedToken, Token, TokenStream};
pub use assembler::{assemble, Assembler, Assembly};
pub use parser::{parse_instruction, parse_statement, Statement, StatementKind};
pub use encoder::{encode, encode_into};
