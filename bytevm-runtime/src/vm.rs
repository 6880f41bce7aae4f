//! Virtual Machine for ByteVM

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::memory::Memory;
use crate::state::{HaltReason, VMState};
use bytevm_disassembler::{decode_next, format};
use bytevm_isa::{Executable, Value, Width};
use serde::{Deserialize, Serialize};

/// VM configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VMConfig {
    /// Maximum number of instructions before halting
    pub max_cycles: u64,

    /// Log every executed instruction at trace level
    pub trace: bool,

    /// Treat operand type mismatches as fatal instead of skipping the
    /// instruction
    pub strict_operands: bool,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            max_cycles: 1_000_000,
            trace: false,
            strict_operands: false,
        }
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    pub halt_reason: HaltReason,

    /// Instruction pointer at halt
    pub instruction_pointer: usize,

    /// Final stack contents, bottom first
    pub stack: Vec<u8>,

    /// Final memory contents
    pub memory: Vec<u8>,

    /// Instructions skipped because of recoverable errors
    pub faults: Vec<RuntimeError>,
}

impl ExecutionResult {
    /// Top of the final stack, 0 if empty
    pub fn stack_top(&self) -> u8 {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Read a value from the final memory image
    pub fn read_memory(&self, address: usize, width: Width) -> Option<Value> {
        let end = address.checked_add(width.bytes())?;
        Value::from_bytes(width, self.memory.get(address..end)?)
    }
}

/// ByteVM Virtual Machine
pub struct VM {
    /// Bytecode and instruction pointer
    executable: Executable,

    /// Stack, memory, cycle count and faults
    state: VMState,

    config: VMConfig,
}

impl VM {
    /// Create a VM positioned at the start of `executable`
    pub fn new(mut executable: Executable, config: VMConfig) -> Self {
        executable.rewind();
        Self {
            executable,
            state: VMState::new(),
            config,
        }
    }

    /// Execute one instruction
    ///
    /// Returns the halt reason once the VM has halted. Fatal errors halt the
    /// VM with [`HaltReason::Faulted`] and are returned.
    pub fn step(&mut self) -> Result<Option<HaltReason>> {
        if let Some(reason) = self.state.halt_reason {
            return Ok(Some(reason));
        }

        if self.executable.is_at_end() {
            return Ok(Some(self.halt(HaltReason::EndOfProgram)));
        }

        if self.state.cycles >= self.config.max_cycles {
            return Ok(Some(self.halt(HaltReason::CycleLimit)));
        }

        let pc = self.executable.position();
        let instr = match decode_next(&mut self.executable) {
            Ok(instr) => instr,
            Err(err) => return Err(self.fault(err.into())),
        };

        if self.config.trace {
            tracing::trace!(cycle = self.state.cycles, pc, "{}", format(&instr));
        }

        self.state.cycles += 1;

        match execute(&instr, pc, &mut self.executable, &mut self.state) {
            Ok(()) => Ok(None),
            Err(err) if err.is_recoverable() && !self.config.strict_operands => {
                tracing::warn!(pc, instruction = %format(&instr), "skipping instruction: {}", err);
                self.state.faults.push(err);
                Ok(None)
            }
            Err(err) => Err(self.fault(err)),
        }
    }

    /// Run the VM until halt
    ///
    /// A fatal error drops the machine. To inspect the stack and memory after
    /// a fault, drive [`VM::step`] instead and call [`VM::finish`] once it
    /// returns an error:
    ///
    /// ```
    /// use bytevm_runtime::{HaltReason, VMConfig, VM};
    /// use bytevm_isa::Executable;
    ///
    /// // PUSH 7; DIV 0, 0
    /// let mut vm = VM::new(Executable::new(vec![0xFD, 7, 0xA3, 0, 0]), VMConfig::default());
    /// let err = loop {
    ///     match vm.step() {
    ///         Ok(None) => continue,
    ///         Ok(Some(_)) => unreachable!(),
    ///         Err(err) => break err,
    ///     }
    /// };
    /// let result = vm.finish();
    /// assert_eq!(result.halt_reason, HaltReason::Faulted);
    /// assert_eq!(result.stack_top(), 7);
    /// # let _ = err;
    /// ```
    pub fn run(mut self) -> Result<ExecutionResult> {
        while self.step()?.is_none() {}
        Ok(self.finish())
    }

    fn halt(&mut self, reason: HaltReason) -> HaltReason {
        tracing::debug!(
            ?reason,
            cycles = self.state.cycles,
            pc = self.executable.position(),
            "VM halted"
        );
        self.state.halt(reason);
        reason
    }

    fn fault(&mut self, err: RuntimeError) -> RuntimeError {
        tracing::debug!(cycles = self.state.cycles, "execution failed: {}", err);
        self.state.halt(HaltReason::Faulted);
        err
    }

    /// Snapshot the machine as it stands, halted or not
    pub fn finish(self) -> ExecutionResult {
        ExecutionResult {
            cycles: self.state.cycles,
            halt_reason: self.state.halt_reason.unwrap_or(HaltReason::EndOfProgram),
            instruction_pointer: self.executable.position(),
            stack: self.state.stack.into_bytes(),
            memory: self.state.memory.into_bytes(),
            faults: self.state.faults,
        }
    }

    /// Current state (for debugging)
    pub fn state(&self) -> &VMState {
        &self.state
    }

    /// Memory, for seeding before a run
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.state.memory
    }

    pub fn instruction_pointer(&self) -> usize {
        self.executable.position()
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }
}
