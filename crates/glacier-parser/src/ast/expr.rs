//! Expression nodes.
//!
//! Expressions are allocated in the arena and annotated in place by later
//! passes: the type checker records each node's deduced [`Type`], and member
//! accesses get their resolved [`MemberSlot`].

use std::cell::Cell;

use glacier_core::{MemberSlot, Span};

use super::{BinaryOp, Ident, Type};

/// An expression with its source span and, once checked, its type.
#[derive(Debug, PartialEq)]
pub struct Expr<'ast> {
    pub kind: ExprKind<'ast>,
    pub span: Span,
    ty: Cell<Option<Type<'ast>>>,
}

impl<'ast> Expr<'ast> {
    pub fn new(kind: ExprKind<'ast>, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: Cell::new(None),
        }
    }

    /// The deduced type, available after type checking.
    #[inline]
    pub fn ty(&self) -> Option<Type<'ast>> {
        self.ty.get()
    }

    #[inline]
    pub fn set_ty(&self, ty: Type<'ast>) {
        self.ty.set(Some(ty));
    }
}

/// The closed set of expression forms.
#[derive(Debug, PartialEq)]
pub enum ExprKind<'ast> {
    /// `42`
    Int(i64),
    /// `"text"`, stored without its quotes.
    String(&'ast str),
    /// `[a, b] <T>`
    Vector(VectorExpr<'ast>),
    /// `{k: v} <K, V>`
    Map(MapExpr<'ast>),
    /// `name`
    Variable(Ident<'ast>),
    /// `a + b`, `a = b`, ...
    Binary(BinaryExpr<'ast>),
    /// `base[index]`
    Index(IndexExpr<'ast>),
    /// `base.member`
    Member(MemberExpr<'ast>),
    /// `new Name(args)`
    Constructor(ConstructorExpr<'ast>),
    /// `name(args)`
    Call(CallExpr<'ast>),
    /// `receiver.method(args)`
    MethodCall(MethodCallExpr<'ast>),
}

#[derive(Debug, PartialEq)]
pub struct VectorExpr<'ast> {
    pub elements: &'ast [&'ast Expr<'ast>],
    pub elem_type: &'ast Type<'ast>,
}

impl<'ast> VectorExpr<'ast> {
    /// The type of the literal itself.
    pub fn ty(&self) -> Type<'ast> {
        Type::Vector(self.elem_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEntry<'ast> {
    pub key: &'ast Expr<'ast>,
    pub value: &'ast Expr<'ast>,
}

#[derive(Debug, PartialEq)]
pub struct MapExpr<'ast> {
    pub entries: &'ast [MapEntry<'ast>],
    pub key_type: &'ast Type<'ast>,
    pub value_type: &'ast Type<'ast>,
}

impl<'ast> MapExpr<'ast> {
    pub fn ty(&self) -> Type<'ast> {
        Type::Map(self.key_type, self.value_type)
    }
}

#[derive(Debug, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
}

#[derive(Debug, PartialEq)]
pub struct IndexExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
}

#[derive(Debug, PartialEq)]
pub struct MemberExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub member: Ident<'ast>,
    slot: Cell<Option<MemberSlot>>,
}

impl<'ast> MemberExpr<'ast> {
    pub fn new(base: &'ast Expr<'ast>, member: Ident<'ast>) -> Self {
        Self {
            base,
            member,
            slot: Cell::new(None),
        }
    }

    /// The resolved struct and member index, available after type checking.
    #[inline]
    pub fn slot(&self) -> Option<MemberSlot> {
        self.slot.get()
    }

    #[inline]
    pub fn resolve(&self, slot: MemberSlot) {
        self.slot.set(Some(slot));
    }
}

#[derive(Debug, PartialEq)]
pub struct ConstructorExpr<'ast> {
    pub name: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
}

#[derive(Debug, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
}

#[derive(Debug, PartialEq)]
pub struct MethodCallExpr<'ast> {
    pub receiver: &'ast Expr<'ast>,
    pub method: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
}
