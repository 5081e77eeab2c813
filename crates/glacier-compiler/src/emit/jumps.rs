//! Reserve/assign backpatching for jumps.
//!
//! A forward jump is emitted before its target is known. [`BytecodeEmitter::reserve_jump`]
//! writes a full-size placeholder instruction and hands back a [`JumpLabel`];
//! [`BytecodeEmitter::assign_jump`] later overwrites exactly those bytes with
//! the real opcode and target. Because every jump has the same fixed length
//! the body is never shifted.

use glacier_core::EncodeError;

use super::BytecodeEmitter;
use crate::bytecode::OpCode;

/// The three jump instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Always,
    IfTrue,
    IfFalse,
}

impl JumpKind {
    pub fn opcode(self) -> OpCode {
        match self {
            JumpKind::Always => OpCode::Jump,
            JumpKind::IfTrue => OpCode::JumpIfTrue,
            JumpKind::IfFalse => OpCode::JumpIfFalse,
        }
    }
}

/// A reserved jump waiting for its target.
///
/// Deliberately not `Copy`: assigning consumes the label.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reserved jump must be assigned"]
pub struct JumpLabel(pub(crate) usize);

impl JumpLabel {
    /// Body offset of the reserved instruction.
    pub fn offset(&self) -> usize {
        self.0
    }
}

impl BytecodeEmitter {
    /// Reserve space for a jump whose target is not yet known.
    pub fn reserve_jump(&mut self) -> JumpLabel {
        let offset = self.body.current_offset();
        self.body.write_placeholder(1 + self.options.operand_width.bytes());
        tracing::trace!(offset, "reserve jump");
        JumpLabel(offset)
    }

    /// Fill a reserved jump in place.
    pub fn assign_jump(
        &mut self,
        label: JumpLabel,
        kind: JumpKind,
        target: usize,
    ) -> Result<(), EncodeError> {
        tracing::trace!(offset = label.0, target, op = kind.opcode().name(), "assign jump");
        self.body.patch(label.0, kind.opcode(), target as u64)
    }

    /// Emit a jump to an already-known target, such as a loop head.
    pub fn emit_jump_to(&mut self, kind: JumpKind, target: usize) -> Result<(), EncodeError> {
        let label = self.reserve_jump();
        self.assign_jump(label, kind, target)
    }
}
