//! Statement parsing.

use bumpalo::collections::Vec as BVec;

use super::parser::Parser;
use super::stmt::*;
use super::ParseError;
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a statement, dispatching on its first token.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse a brace-delimited statement list.
    ///
    /// Grammar: `'{' STATEMENT* '}'`
    pub fn parse_block(&mut self) -> Result<&'ast [Stmt<'ast>], ParseError> {
        self.expect(TokenKind::LeftBrace)?;

        let mut stmts = BVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RightBrace)?;

        Ok(self.arena.alloc_slice_copy(&stmts))
    }

    /// Grammar: `'let' IDENTIFIER '=' EXPR ';'`
    fn parse_let(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Let)?.span;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Equal)?;
        let init = self.parse_expr(0)?;
        let end = self.expect(TokenKind::Semicolon)?.span;

        Ok(Stmt::Let(LetStmt {
            name,
            init,
            span: start.merge(end),
        }))
    }

    /// Grammar: `'if' '(' EXPR ')' BLOCK ('else' BLOCK)?`
    fn parse_if(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::If)?.span;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;

        let then_branch = self.parse_block()?;
        let else_branch: &'ast [Stmt<'ast>] = if self.eat(TokenKind::Else).is_some() {
            self.parse_block()?
        } else {
            &[]
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: start.merge(condition.span),
        }))
    }

    /// Grammar: `'while' '(' EXPR ')' BLOCK`
    fn parse_while(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::While)?.span;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            span: start.merge(condition.span),
        }))
    }

    /// Grammar: `'return' EXPR? ';'`
    fn parse_return(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Return)?.span;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        let end = self.expect(TokenKind::Semicolon)?.span;

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: start.merge(end),
        }))
    }

    /// Grammar: `EXPR ';'`
    fn parse_expr_stmt(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let expr = self.parse_expr(0)?;
        let end = self.expect(TokenKind::Semicolon)?.span;

        Ok(Stmt::Expr(ExprStmt {
            expr,
            span: expr.span.merge(end),
        }))
    }
}
