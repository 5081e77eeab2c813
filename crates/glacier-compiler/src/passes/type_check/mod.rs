//! Type Checker - deduce a type for every expression and reject ill-typed
//! programs.
//!
//! ## Phases
//!
//! 1. Collect every function and method signature, so bodies may call
//!    functions declared after them.
//! 2. Walk items in declaration order. Struct member defaults are checked
//!    against their member types; function bodies are checked against their
//!    signatures.
//!
//! The checker annotates the AST in place: every expression gets its type and
//! every member access gets its [`MemberSlot`](glacier_core::MemberSlot).
//! Code generation relies on both.

mod expr;
mod stmt;

use glacier_core::{Span, TypeError};
use glacier_parser::Program;
use glacier_parser::ast::{Expr, FunctionDecl, Item, StructDecl, Type};

use crate::intrinsics::Intrinsic;
use crate::registry::{FunctionRegistry, StructRegistry};
use crate::scope::LocalScope;

type Result<T> = std::result::Result<T, TypeError>;

/// Walks a parsed program and checks it against the struct registry.
pub struct TypeChecker<'a, 'ast> {
    structs: &'a StructRegistry<'ast>,
    functions: FunctionRegistry<'ast>,
    scope: LocalScope<'ast>,
    /// Declared return type of the function being checked.
    return_type: Type<'ast>,
    /// Structs whose member defaults are being expanded, innermost last.
    expanding: Vec<&'ast str>,
}

impl<'a, 'ast> TypeChecker<'a, 'ast> {
    pub fn new(structs: &'a StructRegistry<'ast>) -> Self {
        Self {
            structs,
            functions: FunctionRegistry::new(),
            scope: LocalScope::new(),
            return_type: Type::Void,
            expanding: Vec::new(),
        }
    }

    /// Check the whole program, returning the function registry on success.
    pub fn check(mut self, program: &Program<'ast>) -> Result<FunctionRegistry<'ast>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("TypeChecker::check");

        self.collect_signatures(program)?;

        for item in program.items() {
            match item {
                Item::Struct(decl) => self.check_struct(decl)?,
                Item::Function(decl) => self.check_function(decl)?,
            }
        }

        tracing::debug!(functions = self.functions.len(), "type check complete");
        Ok(self.functions)
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn collect_signatures(&mut self, program: &Program<'ast>) -> Result<()> {
        for decl in program.functions() {
            let name = decl.name.name;
            if Intrinsic::lookup(name).is_some() || self.functions.register(decl).is_err() {
                return Err(TypeError::DuplicateFunction {
                    name: name.to_string(),
                    span: decl.name.span,
                });
            }
            for param in decl.params {
                self.check_type(&param.ty, param.name.span)?;
            }
            self.check_return_type(&decl.return_type, decl.name.span)?;
        }
        Ok(())
    }

    fn check_struct(&mut self, decl: &'ast StructDecl<'ast>) -> Result<()> {
        self.expanding.push(decl.name.name);
        for member in decl.members {
            if let Some(default) = member.default {
                let context = format!("default value of member '{}'", member.name.name);
                self.with_empty_scope(|this| this.expect_type(default, member.ty, &context))?;
            }
        }
        self.expanding.pop();

        for method in decl.methods {
            self.check_function(method)?;
        }
        Ok(())
    }

    fn check_function(&mut self, decl: &'ast FunctionDecl<'ast>) -> Result<()> {
        tracing::trace!(function = decl.name.name, "checking function");
        self.scope.clear();
        self.return_type = decl.return_type;

        for param in decl.params {
            if self.scope.declare(param.name.name, param.ty).is_none() {
                return Err(TypeError::DuplicateVariable {
                    name: param.name.name.to_string(),
                    span: param.name.span,
                });
            }
        }

        self.check_block(decl.body)
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    /// Reject a type the runtime cannot represent, at any nesting depth:
    /// a `User` type naming no struct, a `void` anywhere, or a map keyed by
    /// something other than `int` or `string`.
    fn check_type(&self, ty: &Type<'ast>, span: Span) -> Result<()> {
        match ty {
            Type::Int | Type::String => Ok(()),
            Type::Void => Err(TypeError::VoidType { span }),
            Type::Vector(elem) => self.check_type(elem, span),
            Type::Map(key, value) => {
                if !matches!(key, Type::Int | Type::String) {
                    return Err(TypeError::InvalidMapKey {
                        found: key.to_string(),
                        span,
                    });
                }
                self.check_type(value, span)
            }
            Type::User(name) => {
                if self.structs.contains(name) {
                    Ok(())
                } else {
                    Err(TypeError::UnknownStruct {
                        name: name.to_string(),
                        span,
                    })
                }
            }
        }
    }

    /// Return types may also be a bare `void`.
    fn check_return_type(&self, ty: &Type<'ast>, span: Span) -> Result<()> {
        match ty {
            Type::Void => Ok(()),
            _ => self.check_type(ty, span),
        }
    }

    /// Check an expression whose value is used. Void is an error.
    pub(crate) fn check_value(&mut self, expr: &'ast Expr<'ast>) -> Result<Type<'ast>> {
        let ty = self.check_expr(expr)?;
        if ty.is_void() {
            return Err(TypeError::VoidValue { span: expr.span });
        }
        Ok(ty)
    }

    /// Check an expression against a known type.
    fn expect_type(
        &mut self,
        expr: &'ast Expr<'ast>,
        expected: Type<'ast>,
        context: &str,
    ) -> Result<()> {
        let found = self.check_value(expr)?;
        if found != expected {
            return Err(TypeError::TypeMismatch {
                context: context.to_string(),
                expected: expected.to_string(),
                found: found.to_string(),
                span: expr.span,
            });
        }
        Ok(())
    }

    /// Run `f` with no variables in scope. Member defaults see only globals.
    fn with_empty_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = std::mem::take(&mut self.scope);
        let result = f(self);
        self.scope = saved;
        result
    }
}
