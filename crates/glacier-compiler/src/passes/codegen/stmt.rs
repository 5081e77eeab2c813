//! Statement lowering and control flow.

use glacier_parser::ast::{IfStmt, Stmt, WhileStmt};

use super::{CodeGenerator, Result};
use crate::bytecode::OpCode;
use crate::emit::JumpKind;

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    pub(super) fn gen_block(&mut self, stmts: &'ast [Stmt<'ast>]) -> Result<()> {
        for stmt in stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Let(let_stmt) => {
                self.gen_expr(let_stmt.init)?;
                let ty = Self::type_of(let_stmt.init)?;
                let slot = self.declare(let_stmt.name.name, ty)?;
                self.emitter.emit_set_var(slot)?;
            }
            Stmt::If(if_stmt) => self.gen_if(if_stmt)?,
            Stmt::While(while_stmt) => self.gen_while(while_stmt)?,
            Stmt::Return(ret) => match ret.value {
                Some(value) => {
                    self.gen_expr(value)?;
                    self.emitter.emit(OpCode::ReturnVal);
                }
                None => self.emitter.emit(OpCode::Return),
            },
            Stmt::Expr(expr_stmt) => self.gen_expr(expr_stmt.expr)?,
        }
        Ok(())
    }

    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// JUMP_IF_FALSE else
    /// [then branch]
    /// JUMP end
    /// else:
    /// [else branch]
    /// end:
    /// ```
    ///
    /// Without an else branch both jumps land on the same offset.
    fn gen_if(&mut self, if_stmt: &'ast IfStmt<'ast>) -> Result<()> {
        self.gen_expr(if_stmt.condition)?;
        let to_else = self.emitter.reserve_jump();

        self.gen_block(if_stmt.then_branch)?;
        let to_end = self.emitter.reserve_jump();

        let else_start = self.emitter.current_offset();
        self.emitter
            .assign_jump(to_else, JumpKind::IfFalse, else_start)?;

        self.gen_block(if_stmt.else_branch)?;
        let end = self.emitter.current_offset();
        self.emitter.assign_jump(to_end, JumpKind::Always, end)?;
        Ok(())
    }

    /// Bytecode layout:
    /// ```text
    /// head:
    /// [condition]
    /// JUMP_IF_FALSE end
    /// [body]
    /// JUMP head
    /// end:
    /// ```
    fn gen_while(&mut self, while_stmt: &'ast WhileStmt<'ast>) -> Result<()> {
        let head = self.emitter.current_offset();
        self.gen_expr(while_stmt.condition)?;
        let to_end = self.emitter.reserve_jump();

        self.gen_block(while_stmt.body)?;
        self.emitter.emit_jump_to(JumpKind::Always, head)?;

        let end = self.emitter.current_offset();
        self.emitter.assign_jump(to_end, JumpKind::IfFalse, end)?;
        Ok(())
    }
}
