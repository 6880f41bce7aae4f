//! Instruction formatting to assembly text
//!
//! Output uses the assembler's surface syntax, so anything the assembler
//! produced formats back to text that assembles to the same bytes. Wide
//! references (`[WORD 300]`) and bare one-byte references have no
//! assembler syntax and only appear for hand-written bytecode.

use bytevm_isa::{Instruction, Operand, Value};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let operands: Vec<String> = instr.operands.iter().map(format_operand).collect();
    if operands.is_empty() {
        instr.opcode.mnemonic().to_string()
    } else {
        format!("{} {}", instr.opcode.mnemonic(), operands.join(", "))
    }
}

/// Format one operand
pub fn format_operand(operand: &Operand) -> String {
    match operand {
        Operand::Literal(byte) => byte.to_string(),
        Operand::Top => "TOP".to_string(),
        Operand::Reference(Value::Byte(address)) => format!("[{address}]"),
        Operand::Reference(address) => format!("[{}]", format_sized(address)),
        Operand::ShortReference(address) => format!("[{address}]"),
        Operand::Immediate(value) => format_sized(value),
    }
}

fn format_sized(value: &Value) -> String {
    format!("{} {}", value.width(), value.to_u64())
}
