//! Growable byte buffer for one region of a bytecode artifact.
//!
//! The header and the body are each a `BytecodeChunk`. Operands are written
//! at the chunk's configured [`OperandWidth`] in little-endian order, and
//! every write checks that the value fits.

use glacier_core::EncodeError;

use super::OpCode;
use crate::options::OperandWidth;

/// Placeholder byte written into reserved instructions.
pub(crate) const PLACEHOLDER: u8 = 0xFF;

/// A region of encoded instructions.
#[derive(Debug, Clone)]
pub struct BytecodeChunk {
    code: Vec<u8>,
    width: OperandWidth,
}

impl BytecodeChunk {
    /// Create a new empty chunk.
    pub fn new(width: OperandWidth) -> Self {
        Self {
            code: Vec::new(),
            width,
        }
    }

    pub fn width(&self) -> OperandWidth {
        self.width
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode) {
        self.code.push(op.into());
    }

    /// Write a raw byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.code.push(byte);
    }

    /// Write one operand at the configured width.
    ///
    /// `what` names the operand in the overflow error.
    pub fn write_operand(&mut self, what: &'static str, value: u64) -> Result<(), EncodeError> {
        let max = self.width.max();
        if value > max {
            return Err(EncodeError::OperandOverflow { what, value, max });
        }
        match self.width {
            OperandWidth::Byte => self.code.push(value as u8),
            OperandWidth::Wide => self.code.extend_from_slice(&(value as u32).to_le_bytes()),
        }
        Ok(())
    }

    /// Write the payload of an `INT` instruction.
    pub fn write_int(&mut self, value: i64) -> Result<(), EncodeError> {
        match self.width {
            OperandWidth::Byte => {
                let byte = u8::try_from(value).map_err(|_| EncodeError::OperandOverflow {
                    what: "integer literal",
                    value: value as u64,
                    max: u8::MAX as u64,
                })?;
                self.code.push(byte);
            }
            OperandWidth::Wide => self.code.extend_from_slice(&value.to_le_bytes()),
        }
        Ok(())
    }

    /// Write the payload of a `STRING` instruction: length, then bytes.
    pub fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
        let len = value.len();
        let max = self.width.max();
        if len as u64 > max {
            return Err(EncodeError::StringTooLong { len, max });
        }
        self.write_operand("string length", len as u64)?;
        self.code.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Append `n` placeholder bytes.
    pub(crate) fn write_placeholder(&mut self, n: usize) {
        self.code.extend(std::iter::repeat_n(PLACEHOLDER, n));
    }

    /// Overwrite the instruction at `offset` with `op` and a single operand.
    ///
    /// The bytes must already exist; the buffer never grows or shifts.
    pub fn patch(&mut self, offset: usize, op: OpCode, operand: u64) -> Result<(), EncodeError> {
        let w = self.width.bytes();
        let len = self.code.len();
        if offset + 1 + w > len {
            return Err(EncodeError::PatchOutOfBounds { offset, len });
        }
        let max = self.width.max();
        if operand > max {
            return Err(EncodeError::OperandOverflow {
                what: "jump target",
                value: operand,
                max,
            });
        }

        self.code[offset] = op.into();
        let slot = &mut self.code[offset + 1..offset + 1 + w];
        match self.width {
            OperandWidth::Byte => slot[0] = operand as u8,
            OperandWidth::Wide => slot.copy_from_slice(&(operand as u32).to_le_bytes()),
        }
        Ok(())
    }

    /// Current length, used as the offset of the next instruction.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Get the bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn into_code(self) -> Vec<u8> {
        self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Read a byte at the given offset.
    pub fn read_byte(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Read an operand at the configured width.
    pub fn read_operand(&self, offset: usize) -> Option<u32> {
        match self.width {
            OperandWidth::Byte => self.read_byte(offset).map(u32::from),
            OperandWidth::Wide => {
                let bytes = self.code.get(offset..offset + 4)?;
                Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        }
    }

    /// Read an opcode at the given offset.
    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.read_byte(offset).and_then(OpCode::from_u8)
    }
}
