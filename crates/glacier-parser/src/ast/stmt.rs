//! Statement nodes.

use glacier_core::Span;

use super::{Expr, Ident};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    Let(LetStmt<'ast>),
    If(IfStmt<'ast>),
    While(WhileStmt<'ast>),
    Return(ReturnStmt<'ast>),
    Expr(ExprStmt<'ast>),
}

impl Stmt<'_> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// `let name = init;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetStmt<'ast> {
    pub name: Ident<'ast>,
    pub init: &'ast Expr<'ast>,
    pub span: Span,
}

/// `if (condition) { ... } else { ... }`
///
/// A missing `else` is an empty `else_branch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_branch: &'ast [Stmt<'ast>],
    pub else_branch: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}
