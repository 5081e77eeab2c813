//! Bytecode operation codes.
//!
//! This module defines the instruction set of the glacier VM. Each opcode is
//! a single byte and its operands follow inline. Operand width `w` is 1 or 4
//! bytes depending on [`OperandWidth`]; the instruction length listed on each
//! variant is in those terms.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::options::OperandWidth;

/// Bytecode operation codes.
///
/// The VM is a stack machine. Operations pop their inputs and push their
/// result. The numbering is part of the wire format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Header Records
    // =========================================================================
    /// Struct layout record.
    /// Operands: type id, member count, one type id per member.
    /// Length: 1 + 2w + n·w
    StructDef = 0x00,

    // =========================================================================
    // Functions and Variables
    // =========================================================================
    /// Function entry marker in the body.
    /// Operands: function id, parameter count. Length: 1 + 2w
    FunctionDef = 0x01,
    /// Pop into a local slot.
    /// Operand: slot. Length: 1 + w
    SetVar = 0x02,
    /// Push a local slot.
    /// Operand: slot. Length: 1 + w
    GetVar = 0x03,
    /// Call a function by id. Arguments are on the stack, leftmost deepest.
    /// Operand: function id. Length: 1 + w
    CallFunc = 0x04,
    /// Return without a value. Length: 1
    Return = 0x05,
    /// Pop and return a value. Length: 1
    ReturnVal = 0x06,

    // =========================================================================
    // Arithmetic and Literals
    // =========================================================================
    /// Length: 1
    Add = 0x07,
    /// Push an integer literal.
    /// Operand: one unsigned byte at width 1, eight little-endian bytes at
    /// width 4. Length: 1 + 1 or 1 + 8
    Int = 0x08,
    /// Push a string literal.
    /// Operands: byte length, then the UTF-8 bytes. Length: 1 + w + len
    String = 0x09,
    /// Length: 1
    Subtract = 0x0A,
    /// Length: 1
    Multiply = 0x0B,
    /// Length: 1
    Divide = 0x0C,

    // =========================================================================
    // Function Table
    // =========================================================================
    /// Function table record.
    /// Operands: function id, body offset of its `FunctionDef`. Length: 1 + 2w
    FunctionJmp = 0x0D,
    /// Terminates the header. Length: 1
    HeaderEnd = 0x0E,

    // =========================================================================
    // I/O and Comparison
    // =========================================================================
    /// Pop and print. Length: 1
    Print = 0x0F,
    /// Pop two values, push 1 if equal else 0. Length: 1
    Eq = 0x10,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// Pop; jump if non-zero.
    /// Operand: absolute body offset. Length: 1 + w
    JumpIfTrue = 0x11,
    /// Pop; jump if zero.
    /// Operand: absolute body offset. Length: 1 + w
    JumpIfFalse = 0x12,
    /// Operand: absolute body offset. Length: 1 + w
    Jump = 0x13,

    // =========================================================================
    // Structs
    // =========================================================================
    /// Pop one value per member (last member on top) and push a struct.
    /// Operand: type id. Length: 1 + w
    Struct = 0x14,
    /// Pop a struct, push one of its members.
    /// Operand: member index. Length: 1 + w
    GetStructMember = 0x15,
    /// Pop a struct, then a value, and store the value in the member.
    /// Operand: member index. Length: 1 + w
    SetStructMember = 0x16,

    /// Pop `b` then `a`, push 1 if `a < b` else 0. Length: 1
    Lt = 0x17,

    // =========================================================================
    // Collections
    // =========================================================================
    /// Pop `n` elements and push a vector.
    /// Operand: element count. Length: 1 + w
    Vec = 0x18,
    /// Pop index and vector, push the element. Length: 1
    VecAccess = 0x19,
    /// Pop `n` key/value pairs and push a map.
    /// Operand: pair count. Length: 1 + w
    Map = 0x1A,
    /// Pop key and map, push the value. Length: 1
    MapAccess = 0x1B,
    /// Pop value and vector, append. Length: 1
    VecPush = 0x1C,
    /// Pop vector, push its length. Length: 1
    VecLen = 0x1D,
    /// Pop vector, remove its last element. Length: 1
    VecPop = 0x1E,
    /// Pop value, key and map, insert. Length: 1
    MapInsert = 0x1F,

    // =========================================================================
    // Input
    // =========================================================================
    /// Read a line and push it. Length: 1
    ReadStr = 0x20,
    /// Read an integer and push it. Length: 1
    ReadInt = 0x21,
}

impl OpCode {
    /// Decode an opcode byte.
    #[inline]
    pub fn from_u8(byte: u8) -> Option<OpCode> {
        OpCode::try_from(byte).ok()
    }

    /// Total instruction length in bytes, opcode included.
    ///
    /// Returns `None` for `String` and `StructDef`, whose length depends on
    /// their payload.
    pub fn fixed_len(self, width: OperandWidth) -> Option<usize> {
        let w = width.bytes();
        let len = match self {
            OpCode::String | OpCode::StructDef => return None,

            OpCode::FunctionDef | OpCode::FunctionJmp => 1 + 2 * w,

            OpCode::Int => 1 + width.int_bytes(),

            OpCode::SetVar
            | OpCode::GetVar
            | OpCode::CallFunc
            | OpCode::JumpIfTrue
            | OpCode::JumpIfFalse
            | OpCode::Jump
            | OpCode::Struct
            | OpCode::GetStructMember
            | OpCode::SetStructMember
            | OpCode::Vec
            | OpCode::Map => 1 + w,

            OpCode::Return
            | OpCode::ReturnVal
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::HeaderEnd
            | OpCode::Print
            | OpCode::Eq
            | OpCode::Lt
            | OpCode::VecAccess
            | OpCode::MapAccess
            | OpCode::VecPush
            | OpCode::VecLen
            | OpCode::VecPop
            | OpCode::MapInsert
            | OpCode::ReadStr
            | OpCode::ReadInt => 1,
        };
        Some(len)
    }

    /// Whether this opcode belongs in the header rather than the body.
    pub fn is_header_record(self) -> bool {
        matches!(
            self,
            OpCode::StructDef | OpCode::FunctionJmp | OpCode::HeaderEnd
        )
    }

    /// Get the opcode name for disassembly.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::StructDef => "STRUCT_DEF",
            OpCode::FunctionDef => "FUNCTION_DEF",
            OpCode::SetVar => "SET_VAR",
            OpCode::GetVar => "GET_VAR",
            OpCode::CallFunc => "CALL_FUNC",
            OpCode::Return => "RETURN",
            OpCode::ReturnVal => "RETURN_VAL",
            OpCode::Add => "ADD",
            OpCode::Int => "INT",
            OpCode::String => "STRING",
            OpCode::Subtract => "SUBTRACT",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::FunctionJmp => "FUNCTION_JMP",
            OpCode::HeaderEnd => "HEADER_END",
            OpCode::Print => "PRINT",
            OpCode::Eq => "EQ",
            OpCode::JumpIfTrue => "JUMP_IF_TRUE",
            OpCode::JumpIfFalse => "JUMP_IF_FALSE",
            OpCode::Jump => "JUMP",
            OpCode::Struct => "STRUCT",
            OpCode::GetStructMember => "GET_STRUCT_MEMBER",
            OpCode::SetStructMember => "SET_STRUCT_MEMBER",
            OpCode::Lt => "LT",
            OpCode::Vec => "VEC",
            OpCode::VecAccess => "VEC_ACCESS",
            OpCode::Map => "MAP",
            OpCode::MapAccess => "MAP_ACCESS",
            OpCode::VecPush => "VEC_PUSH",
            OpCode::VecLen => "VEC_LEN",
            OpCode::VecPop => "VEC_POP",
            OpCode::MapInsert => "MAP_INSERT",
            OpCode::ReadStr => "READ_STR",
            OpCode::ReadInt => "READ_INT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_from_u8() {
        assert_eq!(OpCode::from_u8(0x00), Some(OpCode::StructDef));
        assert_eq!(OpCode::from_u8(0x0E), Some(OpCode::HeaderEnd));
        assert_eq!(OpCode::from_u8(0x21), Some(OpCode::ReadInt));
        assert_eq!(OpCode::from_u8(0x22), None);
        assert_eq!(OpCode::from_u8(255), None);
    }

    #[test]
    fn opcode_numbering_is_dense() {
        for byte in 0x00..=0x21u8 {
            let op = OpCode::from_u8(byte).unwrap();
            assert_eq!(u8::from(op), byte);
        }
    }

    #[test]
    fn opcode_name() {
        assert_eq!(OpCode::FunctionDef.name(), "FUNCTION_DEF");
        assert_eq!(OpCode::JumpIfFalse.name(), "JUMP_IF_FALSE");
        assert_eq!(OpCode::MapInsert.name(), "MAP_INSERT");
    }

    #[test]
    fn instruction_lengths_byte_width() {
        let w = OperandWidth::Byte;
        assert_eq!(OpCode::FunctionDef.fixed_len(w), Some(3));
        assert_eq!(OpCode::FunctionJmp.fixed_len(w), Some(3));
        assert_eq!(OpCode::SetVar.fixed_len(w), Some(2));
        assert_eq!(OpCode::Jump.fixed_len(w), Some(2));
        assert_eq!(OpCode::Int.fixed_len(w), Some(2));
        assert_eq!(OpCode::Add.fixed_len(w), Some(1));
        assert_eq!(OpCode::String.fixed_len(w), None);
        assert_eq!(OpCode::StructDef.fixed_len(w), None);
    }

    #[test]
    fn instruction_lengths_wide_width() {
        let w = OperandWidth::Wide;
        assert_eq!(OpCode::FunctionDef.fixed_len(w), Some(9));
        assert_eq!(OpCode::CallFunc.fixed_len(w), Some(5));
        assert_eq!(OpCode::Int.fixed_len(w), Some(9));
        assert_eq!(OpCode::ReadStr.fixed_len(w), Some(1));
    }

    #[test]
    fn header_records() {
        assert!(OpCode::StructDef.is_header_record());
        assert!(OpCode::FunctionJmp.is_header_record());
        assert!(OpCode::HeaderEnd.is_header_record());
        assert!(!OpCode::FunctionDef.is_header_record());
    }
}
