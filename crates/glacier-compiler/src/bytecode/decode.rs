//! Walking encoded bytecode back into instructions.
//!
//! The decoder uses the same per-opcode lengths the emitter writes with, so
//! it doubles as the check that every instruction is self-delimiting.

use std::fmt;

use glacier_core::DecodeError;

use super::OpCode;
use super::artifact::{FORMAT_VERSION, MAGIC, PREAMBLE_LEN};
use crate::options::{CompileOptions, OperandWidth};

/// One decoded instruction with its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    StructDef { type_id: u32, member_types: Vec<u32> },
    FunctionDef { id: u32, params: u32 },
    SetVar(u32),
    GetVar(u32),
    CallFunc(u32),
    Return,
    ReturnVal,
    Add,
    Int(i64),
    String(String),
    Subtract,
    Multiply,
    Divide,
    FunctionJmp { id: u32, offset: u32 },
    HeaderEnd,
    Print,
    Eq,
    JumpIfTrue(u32),
    JumpIfFalse(u32),
    Jump(u32),
    Struct(u32),
    GetStructMember(u32),
    SetStructMember(u32),
    Lt,
    Vec(u32),
    VecAccess,
    Map(u32),
    MapAccess,
    VecPush,
    VecLen,
    VecPop,
    MapInsert,
    ReadStr,
    ReadInt,
}

impl Instruction {
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::StructDef { .. } => OpCode::StructDef,
            Instruction::FunctionDef { .. } => OpCode::FunctionDef,
            Instruction::SetVar(_) => OpCode::SetVar,
            Instruction::GetVar(_) => OpCode::GetVar,
            Instruction::CallFunc(_) => OpCode::CallFunc,
            Instruction::Return => OpCode::Return,
            Instruction::ReturnVal => OpCode::ReturnVal,
            Instruction::Add => OpCode::Add,
            Instruction::Int(_) => OpCode::Int,
            Instruction::String(_) => OpCode::String,
            Instruction::Subtract => OpCode::Subtract,
            Instruction::Multiply => OpCode::Multiply,
            Instruction::Divide => OpCode::Divide,
            Instruction::FunctionJmp { .. } => OpCode::FunctionJmp,
            Instruction::HeaderEnd => OpCode::HeaderEnd,
            Instruction::Print => OpCode::Print,
            Instruction::Eq => OpCode::Eq,
            Instruction::JumpIfTrue(_) => OpCode::JumpIfTrue,
            Instruction::JumpIfFalse(_) => OpCode::JumpIfFalse,
            Instruction::Jump(_) => OpCode::Jump,
            Instruction::Struct(_) => OpCode::Struct,
            Instruction::GetStructMember(_) => OpCode::GetStructMember,
            Instruction::SetStructMember(_) => OpCode::SetStructMember,
            Instruction::Lt => OpCode::Lt,
            Instruction::Vec(_) => OpCode::Vec,
            Instruction::VecAccess => OpCode::VecAccess,
            Instruction::Map(_) => OpCode::Map,
            Instruction::MapAccess => OpCode::MapAccess,
            Instruction::VecPush => OpCode::VecPush,
            Instruction::VecLen => OpCode::VecLen,
            Instruction::VecPop => OpCode::VecPop,
            Instruction::MapInsert => OpCode::MapInsert,
            Instruction::ReadStr => OpCode::ReadStr,
            Instruction::ReadInt => OpCode::ReadInt,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().name();
        match self {
            Instruction::StructDef {
                type_id,
                member_types,
            } => write!(f, "{name} {type_id} {member_types:?}"),
            Instruction::FunctionDef { id, params } => write!(f, "{name} {id} {params}"),
            Instruction::FunctionJmp { id, offset } => write!(f, "{name} {id} @{offset}"),
            Instruction::Int(value) => write!(f, "{name} {value}"),
            Instruction::String(value) => write!(f, "{name} {value:?}"),
            Instruction::JumpIfTrue(target)
            | Instruction::JumpIfFalse(target)
            | Instruction::Jump(target) => write!(f, "{name} @{target}"),
            Instruction::SetVar(n)
            | Instruction::GetVar(n)
            | Instruction::CallFunc(n)
            | Instruction::Struct(n)
            | Instruction::GetStructMember(n)
            | Instruction::SetStructMember(n)
            | Instruction::Vec(n)
            | Instruction::Map(n) => write!(f, "{name} {n}"),
            _ => f.write_str(name),
        }
    }
}

/// A decoded artifact.
///
/// `header` holds the struct and function-table records without the
/// terminator. `body` pairs each instruction with its body offset, the same
/// offsets jump operands and function-table entries refer to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub header: Vec<Instruction>,
    pub body: Vec<(usize, Instruction)>,
}

impl Program {
    /// Body instructions without their offsets.
    pub fn body_instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.body.iter().map(|(_, instr)| instr)
    }

    /// Body offset of the first instruction after `offset`.
    pub fn next_offset(&self, offset: usize) -> Option<usize> {
        let index = self.body.iter().position(|(at, _)| *at == offset)?;
        self.body.get(index + 1).map(|(at, _)| *at)
    }
}

/// Decode raw artifact bytes.
///
/// When `options.emit_preamble` is set the preamble is required and its
/// width byte takes precedence over `options.operand_width`.
pub fn decode(bytes: &[u8], options: &CompileOptions) -> Result<Program, DecodeError> {
    let (width, declared_header, start) = if options.emit_preamble {
        let (width, header_len) = read_preamble(bytes)?;
        (width, Some(header_len), PREAMBLE_LEN)
    } else {
        (options.operand_width, None, 0)
    };

    let mut reader = InstructionReader::new(&bytes[start..], start, width);
    let mut program = Program::default();

    loop {
        let at = reader.position();
        let Some(instr) = reader.next_instruction()? else {
            return Err(DecodeError::MissingHeaderEnd);
        };
        let op = instr.opcode();
        if !op.is_header_record() {
            return Err(DecodeError::Misplaced {
                op: op.name(),
                section: "header",
                offset: start + at,
            });
        }
        if op == OpCode::HeaderEnd {
            break;
        }
        program.header.push(instr);
    }

    let header_len = reader.position();
    if let Some(declared) = declared_header
        && declared != header_len
    {
        return Err(DecodeError::HeaderLengthMismatch {
            declared,
            actual: header_len,
        });
    }

    let body_start = start + header_len;
    let mut reader = InstructionReader::new(&bytes[body_start..], body_start, width);
    while !reader.is_at_end() {
        let at = reader.position();
        let Some(instr) = reader.next_instruction()? else {
            break;
        };
        if instr.opcode().is_header_record() {
            return Err(DecodeError::Misplaced {
                op: instr.opcode().name(),
                section: "body",
                offset: body_start + at,
            });
        }
        program.body.push((at, instr));
    }

    Ok(program)
}

/// Decode a single region with no header split, such as an emitter's body.
pub fn decode_instructions(
    bytes: &[u8],
    width: OperandWidth,
) -> Result<Vec<(usize, Instruction)>, DecodeError> {
    let mut reader = InstructionReader::new(bytes, 0, width);
    let mut out = Vec::new();
    loop {
        let at = reader.position();
        match reader.next_instruction()? {
            Some(instr) => out.push((at, instr)),
            None => return Ok(out),
        }
    }
}

fn read_preamble(bytes: &[u8]) -> Result<(OperandWidth, usize), DecodeError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(DecodeError::BadMagic);
    }
    if bytes.len() < PREAMBLE_LEN {
        return Err(DecodeError::UnexpectedEnd {
            offset: bytes.len(),
        });
    }
    let version = bytes[4];
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion { version });
    }
    let width = OperandWidth::from_byte(bytes[5])
        .ok_or(DecodeError::InvalidWidth { width: bytes[5] })?;
    let header_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    Ok((width, header_len))
}

// ============================================================================
// Instruction Reader
// ============================================================================

/// Cursor over one region of encoded instructions.
///
/// Positions are relative to the region; `origin` converts them to absolute
/// offsets for error reporting.
struct InstructionReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    origin: usize,
    width: OperandWidth,
}

impl<'a> InstructionReader<'a> {
    fn new(bytes: &'a [u8], origin: usize, width: OperandWidth) -> Self {
        Self {
            bytes,
            pos: 0,
            origin,
            width,
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEnd {
                offset: self.origin + self.bytes.len(),
            })?;
        self.pos = end;
        Ok(slice)
    }

    fn operand(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(self.width.bytes())?;
        Ok(match self.width {
            OperandWidth::Byte => u32::from(bytes[0]),
            OperandWidth::Wide => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    fn int(&mut self) -> Result<i64, DecodeError> {
        let bytes = self.take(self.width.int_bytes())?;
        Ok(match self.width {
            OperandWidth::Byte => i64::from(bytes[0]),
            OperandWidth::Wide => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                i64::from_le_bytes(buf)
            }
        })
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.operand()? as usize;
        let offset = self.origin + self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    fn next_instruction(&mut self) -> Result<Option<Instruction>, DecodeError> {
        if self.is_at_end() {
            return Ok(None);
        }
        let offset = self.origin + self.pos;
        let byte = self.take(1)?[0];
        let op = OpCode::from_u8(byte).ok_or(DecodeError::InvalidOpcode { byte, offset })?;

        let instr = match op {
            OpCode::StructDef => {
                let type_id = self.operand()?;
                let count = self.operand()?;
                let member_types = (0..count)
                    .map(|_| self.operand())
                    .collect::<Result<Vec<_>, _>>()?;
                Instruction::StructDef {
                    type_id,
                    member_types,
                }
            }
            OpCode::FunctionDef => Instruction::FunctionDef {
                id: self.operand()?,
                params: self.operand()?,
            },
            OpCode::FunctionJmp => Instruction::FunctionJmp {
                id: self.operand()?,
                offset: self.operand()?,
            },
            OpCode::SetVar => Instruction::SetVar(self.operand()?),
            OpCode::GetVar => Instruction::GetVar(self.operand()?),
            OpCode::CallFunc => Instruction::CallFunc(self.operand()?),
            OpCode::Int => Instruction::Int(self.int()?),
            OpCode::String => Instruction::String(self.string()?),
            OpCode::JumpIfTrue => Instruction::JumpIfTrue(self.operand()?),
            OpCode::JumpIfFalse => Instruction::JumpIfFalse(self.operand()?),
            OpCode::Jump => Instruction::Jump(self.operand()?),
            OpCode::Struct => Instruction::Struct(self.operand()?),
            OpCode::GetStructMember => Instruction::GetStructMember(self.operand()?),
            OpCode::SetStructMember => Instruction::SetStructMember(self.operand()?),
            OpCode::Vec => Instruction::Vec(self.operand()?),
            OpCode::Map => Instruction::Map(self.operand()?),
            OpCode::Return => Instruction::Return,
            OpCode::ReturnVal => Instruction::ReturnVal,
            OpCode::Add => Instruction::Add,
            OpCode::Subtract => Instruction::Subtract,
            OpCode::Multiply => Instruction::Multiply,
            OpCode::Divide => Instruction::Divide,
            OpCode::HeaderEnd => Instruction::HeaderEnd,
            OpCode::Print => Instruction::Print,
            OpCode::Eq => Instruction::Eq,
            OpCode::Lt => Instruction::Lt,
            OpCode::VecAccess => Instruction::VecAccess,
            OpCode::MapAccess => Instruction::MapAccess,
            OpCode::VecPush => Instruction::VecPush,
            OpCode::VecLen => Instruction::VecLen,
            OpCode::VecPop => Instruction::VecPop,
            OpCode::MapInsert => Instruction::MapInsert,
            OpCode::ReadStr => Instruction::ReadStr,
            OpCode::ReadInt => Instruction::ReadInt,
        };
        Ok(Some(instr))
    }
}
