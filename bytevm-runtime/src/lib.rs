//! # ByteVM Runtime
//!
//! Execute ByteVM bytecode on a byte stack and flat byte memory.
//!
//! ## Features
//!
//! - **21 instructions**: moves, stack, arithmetic, compares and jumps
//! - **Polymorphic operands**: literal, stack top, memory reference, inline value
//! - **Componentwise arithmetic**: per-byte, no carries
//! - **1 KiB stack and 1 KiB memory**, bounds-checked
//!
//! ## Example
//!
//! ```rust,no_run
//! use bytevm_runtime::{VM, VMConfig};
//! use bytevm_isa::Executable;
//!
//! let exe = Executable::new(vec![0xFD, 0x05]); // PUSH 5
//! let vm = VM::new(exe, VMConfig::default());
//! let result = vm.run().unwrap();
//! println!("Cycles: {}", result.cycles);
//! ```

pub mod error;
pub mod stack;
pub mod memory;
pub mod state;
pub mod execute;
pub mod vm;

pub use error::{Result, RuntimeError};
pub use execute::Comparison;
pub use memory::Memory;
pub use stack::Stack;
pub use state::{HaltReason, VMState};
pub use vm::{ExecutionResult, VMConfig, VM};

/// Simple execution helper
///
/// Runs an executable with the default configuration.
pub fn run(executable: bytevm_isa::Executable) -> Result<ExecutionResult> {
    VM::new(executable, VMConfig::default()).run()
}
