//! Back end of the glacier compiler.
//!
//! ## Pipeline
//!
//! ```text
//! Program ──► StructLayout ──► TypeChecker ──► CodeGenerator ──► FunctionTable ──► BytecodeArtifact
//!              STRUCT_DEF       types, slots    body, ids,        FUNCTION_JMP
//!                                               offsets
//! ```
//!
//! Each pass runs to completion before the next starts. Passes communicate
//! through the [`StructRegistry`] and through annotations on the AST.
//!
//! ## Modules
//!
//! - [`bytecode`]: opcodes, chunks, the artifact and its decoder
//! - [`emit`]: the bytecode emitter with reserve/assign jump backpatching
//! - [`intrinsics`]: built-in operations and their type and lowering rules
//! - [`passes`]: the four compiler passes
//! - [`registry`]: struct and function symbol tables
//! - [`scope`]: per-function variable slots

pub mod bytecode;
pub mod emit;
pub mod intrinsics;
mod options;
pub mod passes;
pub mod registry;
pub mod scope;

pub use bytecode::{BytecodeArtifact, Instruction, OpCode};
pub use emit::BytecodeEmitter;
pub use intrinsics::Intrinsic;
pub use options::{CompileOptions, OperandWidth};
pub use passes::{CodeGenerator, FunctionTable, StructLayout, TypeChecker};
pub use registry::{FunctionRegistry, StructInfo, StructRegistry};
pub use scope::{LocalScope, LocalVar};

use glacier_core::CompileError;
use glacier_parser::Program;

/// Run every pass over a parsed program.
pub fn compile_program(
    program: &Program<'_>,
    options: &CompileOptions,
) -> Result<BytecodeArtifact, CompileError> {
    let mut emitter = BytecodeEmitter::new(options.clone());

    let structs = StructLayout::run(program, &mut emitter)?;
    TypeChecker::new(&structs).check(program)?;
    CodeGenerator::new(&structs, &mut emitter).run(program)?;
    FunctionTable::run(program, &mut emitter)?;

    Ok(emitter.finish()?)
}
