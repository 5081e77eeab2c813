//! Bytecode emitter for the glacier compiler.
//!
//! The [`BytecodeEmitter`] owns the header and body buffers for one
//! compilation and provides a typed API over them. Every operand write goes
//! through the configured [`OperandWidth`](crate::OperandWidth) and fails with
//! an [`EncodeError`] instead of truncating.
//!
//! # Example
//!
//! ```
//! use glacier_compiler::emit::BytecodeEmitter;
//! use glacier_compiler::bytecode::{Instruction, OpCode};
//! use glacier_compiler::CompileOptions;
//! use glacier_core::FunctionId;
//!
//! let mut emitter = BytecodeEmitter::new(CompileOptions::default());
//! emitter.emit_function_def(FunctionId::MAIN, 0).unwrap();
//! emitter.emit_int(42).unwrap();
//! emitter.emit(OpCode::Print);
//! emitter.emit(OpCode::Return);
//! emitter.emit_function_entry(FunctionId::MAIN, 0).unwrap();
//!
//! let program = emitter.finish().unwrap().decode().unwrap();
//! assert_eq!(program.body[1].1, Instruction::Int(42));
//! ```

mod jumps;

use glacier_core::{EncodeError, FunctionId, TypeId};

use crate::bytecode::{BytecodeArtifact, BytecodeChunk, OpCode};
use crate::options::CompileOptions;

pub use jumps::{JumpKind, JumpLabel};

/// Emits header records and body instructions.
pub struct BytecodeEmitter {
    header: BytecodeChunk,
    body: BytecodeChunk,
    options: CompileOptions,
}

impl BytecodeEmitter {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            header: BytecodeChunk::new(options.operand_width),
            body: BytecodeChunk::new(options.operand_width),
            options,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Offset the next body instruction will be written at.
    pub fn current_offset(&self) -> usize {
        self.body.current_offset()
    }

    pub fn header_code(&self) -> &[u8] {
        self.header.code()
    }

    pub fn body_code(&self) -> &[u8] {
        self.body.code()
    }

    // ==========================================================================
    // Header Records
    // ==========================================================================

    /// Emit a struct layout record.
    pub fn emit_struct_def(
        &mut self,
        type_id: TypeId,
        member_types: &[TypeId],
    ) -> Result<(), EncodeError> {
        tracing::trace!(%type_id, members = member_types.len(), "STRUCT_DEF");
        self.header.write_op(OpCode::StructDef);
        self.header.write_operand("type id", type_id.index().into())?;
        self.header
            .write_operand("member count", member_types.len() as u64)?;
        for ty in member_types {
            self.header.write_operand("type id", ty.index().into())?;
        }
        Ok(())
    }

    /// Emit a function table record.
    pub fn emit_function_entry(&mut self, id: FunctionId, offset: usize) -> Result<(), EncodeError> {
        tracing::trace!(%id, offset, "FUNCTION_JMP");
        self.header.write_op(OpCode::FunctionJmp);
        self.header.write_operand("function id", id.index().into())?;
        self.header.write_operand("function offset", offset as u64)
    }

    // ==========================================================================
    // Body Instructions
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        tracing::trace!(offset = self.body.current_offset(), "{}", op.name());
        self.body.write_op(op);
    }

    fn emit_with_operand(
        &mut self,
        op: OpCode,
        what: &'static str,
        operand: u64,
    ) -> Result<(), EncodeError> {
        tracing::trace!(offset = self.body.current_offset(), operand, "{}", op.name());
        self.body.write_op(op);
        self.body.write_operand(what, operand)
    }

    /// Emit a function entry marker and return its body offset.
    pub fn emit_function_def(
        &mut self,
        id: FunctionId,
        param_count: usize,
    ) -> Result<usize, EncodeError> {
        let offset = self.body.current_offset();
        tracing::trace!(offset, %id, param_count, "FUNCTION_DEF");
        self.body.write_op(OpCode::FunctionDef);
        self.body.write_operand("function id", id.index().into())?;
        self.body
            .write_operand("parameter count", param_count as u64)?;
        Ok(offset)
    }

    pub fn emit_int(&mut self, value: i64) -> Result<(), EncodeError> {
        tracing::trace!(offset = self.body.current_offset(), value, "INT");
        self.body.write_op(OpCode::Int);
        self.body.write_int(value)
    }

    pub fn emit_string(&mut self, value: &str) -> Result<(), EncodeError> {
        tracing::trace!(offset = self.body.current_offset(), value, "STRING");
        self.body.write_op(OpCode::String);
        self.body.write_string(value)
    }

    pub fn emit_get_var(&mut self, slot: u32) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::GetVar, "variable slot", slot.into())
    }

    pub fn emit_set_var(&mut self, slot: u32) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::SetVar, "variable slot", slot.into())
    }

    pub fn emit_call(&mut self, id: FunctionId) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::CallFunc, "function id", id.index().into())
    }

    pub fn emit_construct(&mut self, type_id: TypeId) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::Struct, "type id", type_id.index().into())
    }

    pub fn emit_get_member(&mut self, index: u32) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::GetStructMember, "member index", index.into())
    }

    pub fn emit_set_member(&mut self, index: u32) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::SetStructMember, "member index", index.into())
    }

    pub fn emit_vector(&mut self, len: usize) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::Vec, "vector length", len as u64)
    }

    pub fn emit_map(&mut self, len: usize) -> Result<(), EncodeError> {
        self.emit_with_operand(OpCode::Map, "map length", len as u64)
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Terminate the header and produce the artifact.
    pub fn finish(mut self) -> Result<BytecodeArtifact, EncodeError> {
        self.header.write_op(OpCode::HeaderEnd);
        let header_len = self.header.len() as u64;
        if header_len > u32::MAX as u64 {
            return Err(EncodeError::OperandOverflow {
                what: "header length",
                value: header_len,
                max: u32::MAX as u64,
            });
        }
        tracing::debug!(
            header_bytes = self.header.len(),
            body_bytes = self.body.len(),
            "bytecode finished"
        );
        Ok(BytecodeArtifact::new(
            self.header.into_code(),
            self.body.into_code(),
            self.options,
        ))
    }
}
