//! Code Generator - lower the checked AST into body instructions.
//!
//! Runs after the type checker, so every expression carries a type and every
//! member access a resolved slot. Anything missing here is an
//! [`InternalError`], never a user error.
//!
//! ## Function ids
//!
//! `main` is always id 0. Every other function and method is numbered from 1
//! in declaration order. All ids are assigned before any body is lowered so
//! calls to later functions resolve.

mod expr;
mod stmt;

use glacier_core::{CompileError, FunctionId, InternalError};
use glacier_parser::Program;
use glacier_parser::ast::{Expr, FunctionDecl, Type};
use rustc_hash::FxHashMap;

use crate::bytecode::OpCode;
use crate::emit::BytecodeEmitter;
use crate::registry::StructRegistry;
use crate::scope::LocalScope;

type Result<T> = std::result::Result<T, CompileError>;

/// Emits the body of every function into a [`BytecodeEmitter`].
pub struct CodeGenerator<'a, 'ast> {
    structs: &'a StructRegistry<'ast>,
    emitter: &'a mut BytecodeEmitter,
    function_ids: FxHashMap<&'ast str, FunctionId>,
    scope: LocalScope<'ast>,
}

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    pub fn new(structs: &'a StructRegistry<'ast>, emitter: &'a mut BytecodeEmitter) -> Self {
        Self {
            structs,
            emitter,
            function_ids: FxHashMap::default(),
            scope: LocalScope::new(),
        }
    }

    /// Lower every function. Each declaration gets its id and body offset.
    pub fn run(mut self, program: &Program<'ast>) -> Result<()> {
        #[cfg(feature = "profiling")]
        profiling::scope!("CodeGenerator::run");

        self.assign_ids(program)?;
        for decl in program.functions() {
            self.gen_function(decl)?;
        }

        tracing::debug!(
            functions = self.function_ids.len(),
            body_bytes = self.emitter.current_offset(),
            "code generation complete"
        );
        Ok(())
    }

    fn assign_ids(&mut self, program: &Program<'ast>) -> Result<()> {
        let mut next = 1;
        for decl in program.functions() {
            let name = decl.name.name;
            let id = if name == "main" {
                FunctionId::MAIN
            } else {
                let id = FunctionId::new(next);
                next += 1;
                id
            };
            if self.function_ids.insert(name, id).is_some() {
                return Err(InternalError::DuplicateFunction {
                    name: name.to_string(),
                }
                .into());
            }
            decl.set_id(id);
            tracing::trace!(function = name, %id, "assigned function id");
        }
        Ok(())
    }

    fn gen_function(&mut self, decl: &'ast FunctionDecl<'ast>) -> Result<()> {
        let id = self.function_id(decl.name.name)?;
        self.scope.clear();

        let offset = self.emitter.emit_function_def(id, decl.params.len())?;
        decl.set_offset(offset);
        tracing::trace!(function = decl.name.name, offset, "function body");

        for param in decl.params {
            self.declare(param.name.name, param.ty)?;
        }
        self.gen_block(decl.body)?;

        if decl.return_type.is_void() {
            self.emitter.emit(OpCode::Return);
        }
        Ok(())
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    pub(crate) fn emitter(&mut self) -> &mut BytecodeEmitter {
        self.emitter
    }

    fn function_id(&self, name: &str) -> Result<FunctionId> {
        self.function_ids.get(name).copied().ok_or_else(|| {
            InternalError::UnknownFunction {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn declare(&mut self, name: &'ast str, ty: Type<'ast>) -> Result<u32> {
        match self.scope.declare(name, ty) {
            Some(var) => Ok(var.slot),
            None => Err(InternalError::DuplicateVariable {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Type recorded by the checker.
    fn type_of(expr: &Expr<'ast>) -> Result<Type<'ast>> {
        expr.ty()
            .ok_or_else(|| InternalError::UntypedExpression { span: expr.span }.into())
    }
}
