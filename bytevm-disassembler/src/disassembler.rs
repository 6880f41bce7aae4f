//! Main disassembler logic

use crate::decoder::decode_listing;
use crate::error::Result;
use crate::formatter::format;
use bytevm_isa::Executable;
use std::fmt::Write;

/// Disassemble an executable into assembly text
///
/// Each line carries its offset and raw bytes in a trailing comment, so the
/// output can be fed straight back to the assembler.
pub fn disassemble(exe: &Executable) -> Result<String> {
    let bytes = exe.as_bytes();
    let listing = decode_listing(bytes)?;

    let mut output = String::new();
    output.push_str("; ByteVM Disassembly\n");
    let _ = writeln!(
        output,
        "; Code size: {} bytes ({} instructions)",
        bytes.len(),
        listing.len()
    );
    output.push('\n');

    for (offset, instr) in &listing {
        let raw = bytes.get(*offset..*offset + instr.encoded_len()).unwrap_or_default();
        let hex: Vec<String> = raw.iter().map(|b| format!("{b:02X}")).collect();
        let _ = writeln!(
            output,
            "{:<32}; 0x{:04X}: {}",
            format(instr),
            offset,
            hex.join(" ")
        );
    }

    Ok(output)
}
