//! The finished bytecode artifact.

use std::fmt::Write;

use glacier_core::DecodeError;

use super::decode::{self, Program};
use crate::options::CompileOptions;

/// Magic bytes opening an artifact with a preamble.
pub const MAGIC: [u8; 4] = *b"GLCB";

/// Format version written into the preamble.
pub const FORMAT_VERSION: u8 = 1;

/// Magic, version, width byte and a 4-byte header length.
pub const PREAMBLE_LEN: usize = 10;

/// Compiled bytecode: header records followed by the instruction stream.
///
/// Only produced by a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeArtifact {
    header: Vec<u8>,
    body: Vec<u8>,
    options: CompileOptions,
}

impl BytecodeArtifact {
    /// `header` must end with `HEADER_END` and its length must fit in a u32.
    pub(crate) fn new(header: Vec<u8>, body: Vec<u8>, options: CompileOptions) -> Self {
        Self {
            header,
            body,
            options,
        }
    }

    /// Header records, terminator included.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Instruction stream. Jump operands and function-table offsets index
    /// into this slice.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// The on-disk bytes: optional preamble, header, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let preamble = if self.options.emit_preamble {
            PREAMBLE_LEN
        } else {
            0
        };
        let mut out = Vec::with_capacity(preamble + self.header.len() + self.body.len());
        if self.options.emit_preamble {
            out.extend_from_slice(&MAGIC);
            out.push(FORMAT_VERSION);
            out.push(self.options.operand_width.bytes() as u8);
            out.extend_from_slice(&(self.header.len() as u32).to_le_bytes());
        }
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.body);
        out
    }

    /// Re-walk the artifact into instructions.
    pub fn decode(&self) -> Result<Program, DecodeError> {
        decode::decode(&self.to_bytes(), &self.options)
    }

    /// Human-readable listing of header and body.
    ///
    /// ```text
    /// header:
    ///   FUNCTION_JMP 0 @0
    /// body:
    ///   0000  FUNCTION_DEF 0 0
    ///   0009  RETURN
    /// ```
    pub fn disassemble(&self) -> Result<String, DecodeError> {
        let program = self.decode()?;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "header:");
        for instr in &program.header {
            let _ = writeln!(out, "  {instr}");
        }
        let _ = writeln!(out, "body:");
        for (offset, instr) in &program.body {
            let _ = writeln!(out, "  {offset:04}  {instr}");
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Instruction, OpCode};
    use crate::options::OperandWidth;

    fn artifact(options: CompileOptions) -> BytecodeArtifact {
        let header = vec![OpCode::FunctionJmp.into(), 0, 0, OpCode::HeaderEnd.into()];
        let body = vec![OpCode::FunctionDef.into(), 0, 0, OpCode::Return.into()];
        BytecodeArtifact::new(header, body, options)
    }

    #[test]
    fn compatible_bytes_have_no_preamble() {
        let artifact = artifact(CompileOptions::compatible());
        assert_eq!(
            artifact.to_bytes(),
            vec![0x0D, 0, 0, 0x0E, 0x01, 0, 0, 0x05]
        );
    }

    #[test]
    fn preamble_layout() {
        let options = CompileOptions::compatible().with_preamble(true);
        let bytes = artifact(options).to_bytes();

        assert_eq!(&bytes[..4], b"GLCB");
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(bytes[5], 1);
        assert_eq!(&bytes[6..10], &4u32.to_le_bytes());
        assert_eq!(bytes.len(), PREAMBLE_LEN + 8);
    }

    #[test]
    fn decode_uses_preamble() {
        let options = CompileOptions::compatible().with_preamble(true);
        let program = artifact(options).decode().unwrap();
        assert_eq!(
            program.header,
            vec![Instruction::FunctionJmp { id: 0, offset: 0 }]
        );
        assert_eq!(
            program.body,
            vec![
                (0, Instruction::FunctionDef { id: 0, params: 0 }),
                (3, Instruction::Return)
            ]
        );
    }

    #[test]
    fn disassemble_listing() {
        let listing = artifact(CompileOptions::compatible())
            .disassemble()
            .unwrap();
        assert_eq!(
            listing,
            "header:\n  FUNCTION_JMP 0 @0\nbody:\n  0000  FUNCTION_DEF 0 0\n  0003  RETURN\n"
        );
    }

    #[test]
    fn options_are_kept() {
        let options = CompileOptions::default().with_operand_width(OperandWidth::Byte);
        assert_eq!(artifact(options.clone()).options(), &options);
    }
}
