//! Function Table Pass - write one header record per function.

use glacier_core::{CompileError, InternalError};
use glacier_parser::Program;

use crate::emit::BytecodeEmitter;

/// Pass that runs once code generation has placed every function.
pub struct FunctionTable;

impl FunctionTable {
    /// Emit `FUNCTION_JMP id offset` for every function in declaration order.
    ///
    /// Returns the number of records written.
    pub fn run(program: &Program<'_>, emitter: &mut BytecodeEmitter) -> Result<usize, CompileError> {
        let mut count = 0;
        for decl in program.functions() {
            let name = decl.name.name;
            let id = decl.id().ok_or_else(|| InternalError::MissingFunctionId {
                name: name.to_string(),
            })?;
            let offset = decl
                .offset()
                .ok_or_else(|| InternalError::MissingFunctionOffset {
                    name: name.to_string(),
                })?;
            emitter.emit_function_entry(id, offset)?;
            count += 1;
        }
        tracing::debug!(entries = count, "function table written");
        Ok(count)
    }
}
