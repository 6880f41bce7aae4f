//! Memory and stack bounds tests

use bytevm_isa::{Value, Width, MEMORY_SIZE, STACK_SIZE};
use bytevm_runtime::{Memory, RuntimeError, Stack};
use proptest::prelude::*;

fn arb_width() -> impl Strategy<Value = Width> {
    prop::sample::select(Width::ALL.to_vec())
}

// ============================================================================
// Memory
// ============================================================================

#[test]
fn test_memory_starts_zeroed() {
    let mem = Memory::new();
    assert_eq!(mem.size(), MEMORY_SIZE);
    assert!(mem.as_bytes().iter().all(|b| *b == 0));
}

#[test]
fn test_memory_edges() {
    let mut mem = Memory::new();
    for width in Width::ALL {
        let last = (MEMORY_SIZE - width.bytes()) as u64;
        assert!(mem.write(last, Value::zero(width)).is_ok());
        assert_eq!(
            mem.write(last + 1, Value::zero(width)),
            Err(RuntimeError::OutOfBounds {
                address: last + 1,
                width,
            })
        );
    }
}

#[test]
fn test_overlapping_writes() {
    let mut mem = Memory::new();
    mem.write(0, Value::from_u64(Width::DoubleWord, 0x0102_0304)).unwrap();
    mem.write(1, Value::from_u64(Width::Word, 0xAABB)).unwrap();
    assert_eq!(&mem.as_bytes()[..4], &[0x01, 0xAA, 0xBB, 0x04]);
}

// ============================================================================
// Stack
// ============================================================================

#[test]
fn test_stack_fills_exactly() {
    let mut stack = Stack::new();
    for _ in 0..STACK_SIZE / 8 {
        stack.push(Value::from_u64(Width::QuadWord, u64::MAX)).unwrap();
    }
    assert_eq!(stack.len(), STACK_SIZE);
    assert_eq!(
        stack.push(Value::Byte(1)),
        Err(RuntimeError::StackOverflow { capacity: STACK_SIZE })
    );
}

#[test]
fn test_stack_drains_byte_by_byte() {
    let mut stack = Stack::new();
    stack.push(Value::from_u64(Width::DoubleWord, 0x0A0B_0C0D)).unwrap();
    let popped: Vec<u8> = (0..4).map(|_| stack.pop().unwrap()).collect();
    assert_eq!(popped, vec![0x0D, 0x0C, 0x0B, 0x0A]);
    assert_eq!(stack.top(), 0);
    assert_eq!(stack.pop(), Err(RuntimeError::StackUnderflow));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_in_bounds_write_reads_back(width in arb_width(), value in any::<u64>(), address in 0usize..MEMORY_SIZE) {
        prop_assume!(address + width.bytes() <= MEMORY_SIZE);
        let mut mem = Memory::new();
        let value = Value::from_u64(width, value);
        mem.write(address as u64, value).unwrap();
        prop_assert_eq!(mem.read(address as u64, width).unwrap(), value);
    }

    #[test]
    fn prop_any_address_is_checked(width in arb_width(), address in any::<u64>()) {
        let mem = Memory::new();
        let in_bounds = address
            .checked_add(width.bytes() as u64)
            .is_some_and(|end| end <= MEMORY_SIZE as u64);
        prop_assert_eq!(mem.read(address, width).is_ok(), in_bounds);
    }
}
