//! Statement checking.

use glacier_core::TypeError;
use glacier_parser::ast::{ReturnStmt, Stmt, Type};

use super::{Result, TypeChecker};

impl<'a, 'ast> TypeChecker<'a, 'ast> {
    pub(super) fn check_block(&mut self, stmts: &'ast [Stmt<'ast>]) -> Result<()> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Let(let_stmt) => {
                let ty = self.check_value(let_stmt.init)?;
                if self.scope.declare(let_stmt.name.name, ty).is_none() {
                    return Err(TypeError::DuplicateVariable {
                        name: let_stmt.name.name.to_string(),
                        span: let_stmt.name.span,
                    });
                }
                Ok(())
            }
            Stmt::If(if_stmt) => {
                self.expect_type(if_stmt.condition, Type::Int, "if condition")?;
                self.check_block(if_stmt.then_branch)?;
                self.check_block(if_stmt.else_branch)
            }
            Stmt::While(while_stmt) => {
                self.expect_type(while_stmt.condition, Type::Int, "while condition")?;
                self.check_block(while_stmt.body)
            }
            Stmt::Return(ret) => self.check_return(ret),
            Stmt::Expr(expr_stmt) => {
                // The value, if any, is left on the VM stack.
                self.check_expr(expr_stmt.expr)?;
                Ok(())
            }
        }
    }

    fn check_return(&mut self, ret: &'ast ReturnStmt<'ast>) -> Result<()> {
        match (ret.value, self.return_type) {
            (None, Type::Void) => Ok(()),
            (None, expected) => Err(TypeError::MissingReturnValue {
                expected: expected.to_string(),
                span: ret.span,
            }),
            (Some(value), Type::Void) => Err(TypeError::UnexpectedReturnValue { span: value.span }),
            (Some(value), expected) => self.expect_type(value, expected, "return value"),
        }
    }
}
