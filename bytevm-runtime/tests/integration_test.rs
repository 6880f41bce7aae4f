//! Integration tests for the ByteVM runtime

use bytevm_assembler::assemble;
use bytevm_isa::{Executable, Value, Width};
use bytevm_runtime::{run, HaltReason, RuntimeError, VMConfig, VM};

fn run_source(source: &str) -> Result<bytevm_runtime::ExecutionResult, RuntimeError> {
    run(assemble(source).unwrap())
}

// ============================================================================
// Moves
// ============================================================================

#[test]
fn test_movb() {
    let result = run_source("MOVB 0, 10").unwrap();
    assert_eq!(result.memory[0], 10);
}

#[test]
fn test_mov_word() {
    let result = run_source("MOV 0, WORD 300").unwrap();
    assert_eq!(result.read_memory(0, Width::Word).unwrap().to_u64(), 300);
}

#[test]
fn test_sized_moves() {
    let result = run_source("MOVD 0, 70000\nMOVQ 8, 1").unwrap();
    assert_eq!(result.read_memory(0, Width::DoubleWord).unwrap().to_u64(), 70000);
    assert_eq!(result.read_memory(8, Width::QuadWord).unwrap().to_u64(), 1);
}

#[test]
fn test_move_from_stack_top() {
    let result = run_source("PUSH 42\nMOV 7, TOP").unwrap();
    assert_eq!(result.memory[7], 42);
}

#[test]
fn test_move_between_cells() {
    let result = run_source("MOVB 0, 9\nMOV 1, [0]").unwrap();
    assert_eq!(result.memory[1], 9);
}

// ============================================================================
// Stack
// ============================================================================

#[test]
fn test_push() {
    assert_eq!(run_source("PUSH 5").unwrap().stack_top(), 5);
}

#[test]
fn test_push_wide_value() {
    let result = run_source("MOV 0, WORD 300\nMOVW 2, 0\nPUSH [0]").unwrap();
    // One-byte references read a single byte
    assert_eq!(result.stack, vec![0x01]);
}

#[test]
fn test_pop_removes_one_byte() {
    let result = run_source("PUSH 1\nPUSH 2\nPOP").unwrap();
    assert_eq!(result.stack, vec![1]);
}

#[test]
fn test_pop_underflow() {
    assert_eq!(run_source("POP"), Err(RuntimeError::StackUnderflow));
}

#[test]
fn test_stack_overflow() {
    // PUSH 1 / JMP 0 pushes until the stack is full
    let err = run_source("PUSH 1\nJMP 0").unwrap_err();
    assert_eq!(err, RuntimeError::StackOverflow { capacity: 1024 });
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_add_wraps() {
    let mut vm = VM::new(assemble("ADD 0, 10").unwrap(), VMConfig::default());
    vm.memory_mut().write(0, Value::Byte(250)).unwrap();
    assert_eq!(vm.run().unwrap().memory[0], 4);
}

#[test]
fn test_arithmetic_sequence() {
    let result = run_source("MOVB 0, 6\nMUL 0, 7\nSUB 0, 2\nDIV 0, 4").unwrap();
    assert_eq!(result.memory[0], 10);
}

#[test]
fn test_div_by_zero() {
    assert_eq!(
        run_source("DIV 0, 0"),
        Err(RuntimeError::DivisionByZero { pc: 0 })
    );
}

#[test]
fn test_div_by_zero_reports_pc() {
    assert_eq!(
        run_source("MOVB 0, 1\nDIV 0, [5]"),
        Err(RuntimeError::DivisionByZero { pc: 4 })
    );
}

// ============================================================================
// Compares and Jumps
// ============================================================================

#[test]
fn test_compares() {
    assert_eq!(run_source("LT 3, 5").unwrap().stack_top(), 1);
    assert_eq!(run_source("LT 5, 3").unwrap().stack_top(), 0);
    assert_eq!(run_source("LE 5, 5").unwrap().stack_top(), 1);
    assert_eq!(run_source("GT 5, 5").unwrap().stack_top(), 0);
    assert_eq!(run_source("GE 9, 5").unwrap().stack_top(), 1);
}

#[test]
fn test_compare_is_componentwise() {
    // MOV 0, WORD 512 ; GT REF WORD 0, WORD 255
    // [02 00] vs [00 FF]: (2 - 0) + (0 - 255) < 0 even though 512 > 255
    let mut code = assemble("MOV 0, WORD 512").unwrap().into_bytes();
    code.extend_from_slice(&[0xAB, 0xC0, 0xD1, 0x00, 0x00, 0xD1, 0x00, 0xFF]);
    let result = run(Executable::new(code)).unwrap();
    assert_eq!(result.stack, vec![0]);
}

#[test]
fn test_jmp() {
    let result = run_source("JMP 7\nPUSH 1\nPUSH 2\nPOP\nPUSH 9").unwrap();
    assert_eq!(result.stack, vec![9]);
}

#[test]
fn test_jmp_to_stack_top() {
    let result = run_source("PUSH 6\nJMP TOP\nPUSH 1\nPUSH 2").unwrap();
    assert_eq!(result.stack, vec![6, 2]);
}

#[test]
fn test_conditional_jumps() {
    // JEQ 1, 1, 6 skips PUSH 1
    let result = run_source("JEQ 1, 1, 6\nPUSH 1\nPUSH 2").unwrap();
    assert_eq!(result.stack, vec![2]);

    let result = run_source("JGT 1, 2, 6\nPUSH 1\nPUSH 2").unwrap();
    assert_eq!(result.stack, vec![1, 2]);
}

#[test]
fn test_countdown_loop() {
    let source = r#"
        MOVB 0, 5
        SUB 0, 1        ; offset 4
        PUSH [0]
        JGT [0], 0, 4
    "#;
    let result = run_source(source).unwrap();
    assert_eq!(result.stack, vec![4, 3, 2, 1, 0]);
    assert_eq!(result.memory[0], 0);
    assert_eq!(result.cycles, 1 + 5 * 3);
}

#[test]
fn test_jump_past_end_halts() {
    let result = run_source("JMP 100\nPUSH 1").unwrap();
    assert_eq!(result.halt_reason, HaltReason::EndOfProgram);
    assert!(result.stack.is_empty());
}

#[test]
fn test_jmp_zero_hits_cycle_limit() {
    let config = VMConfig {
        max_cycles: 1000,
        ..VMConfig::default()
    };
    let result = VM::new(assemble("JMP 0").unwrap(), config).run().unwrap();
    assert_eq!(result.halt_reason, HaltReason::CycleLimit);
    assert_eq!(result.cycles, 1000);
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_unknown_opcode() {
    let result = run(Executable::new(vec![0x00]));
    assert_eq!(result, Err(RuntimeError::InvalidOpcode { opcode: 0x00, pc: 0 }));
}

#[test]
fn test_type_mismatch_continues() {
    let result = run_source("MOVW 0, [5]\nPUSH 1").unwrap();
    assert_eq!(result.faults.len(), 1);
    assert!(result.faults[0].is_recoverable());
    assert_eq!(result.stack, vec![1]);
    assert_eq!(result.cycles, 2);
}

#[test]
fn test_wide_jump_target_is_mismatch() {
    let result = run_source("JEQ 1, 1, WORD 4\nPUSH 1").unwrap();
    assert_eq!(
        result.faults,
        vec![RuntimeError::OperandTypeMismatch {
            expected: Width::Byte,
            found: Width::Word,
            pc: 0,
        }]
    );
    assert_eq!(result.stack, vec![1]);
}

#[test]
fn test_hand_encoded_out_of_bounds() {
    // PUSH REF WORD 0x0400
    let result = run(Executable::new(vec![0xFD, 0xC0, 0xD1, 0x04, 0x00]));
    assert_eq!(
        result,
        Err(RuntimeError::OutOfBounds {
            address: 1024,
            width: Width::Word,
        })
    );
}

#[test]
fn test_hand_encoded_short_reference() {
    // MOVB 3, 7 ; PUSH REF 3
    let result = run(Executable::new(vec![0xEF, 0x03, 0xD0, 0x07, 0xFD, 0xC0, 0x03])).unwrap();
    assert_eq!(result.stack, vec![7]);
}
