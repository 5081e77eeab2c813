//! Top-level declarations: functions and structs.

use std::cell::Cell;

use glacier_core::{FunctionId, Span};

use super::{Expr, Ident, Stmt, Type};

/// A top-level item.
#[derive(Debug, PartialEq)]
pub enum Item<'ast> {
    Function(FunctionDecl<'ast>),
    Struct(StructDecl<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub ty: Type<'ast>,
}

/// A free function or a struct method.
///
/// Methods carry their struct in `owner` and an explicit leading `this`
/// parameter. Code generation fills in `id` and `offset`.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl<'ast> {
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub return_type: Type<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub owner: Option<&'ast str>,
    pub span: Span,
    id: Cell<Option<FunctionId>>,
    offset: Cell<Option<usize>>,
}

impl<'ast> FunctionDecl<'ast> {
    pub fn new(
        name: Ident<'ast>,
        params: &'ast [Param<'ast>],
        return_type: Type<'ast>,
        body: &'ast [Stmt<'ast>],
        owner: Option<&'ast str>,
        span: Span,
    ) -> Self {
        Self {
            name,
            params,
            return_type,
            body,
            owner,
            span,
            id: Cell::new(None),
            offset: Cell::new(None),
        }
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.owner.is_some()
    }

    #[inline]
    pub fn id(&self) -> Option<FunctionId> {
        self.id.get()
    }

    #[inline]
    pub fn set_id(&self, id: FunctionId) {
        self.id.set(Some(id));
    }

    /// Body offset of this function's definition marker.
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        self.offset.get()
    }

    #[inline]
    pub fn set_offset(&self, offset: usize) {
        self.offset.set(Some(offset));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Member<'ast> {
    pub name: Ident<'ast>,
    pub ty: Type<'ast>,
    pub default: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct StructDecl<'ast> {
    pub name: Ident<'ast>,
    pub members: &'ast [Member<'ast>],
    pub methods: &'ast [FunctionDecl<'ast>],
    pub span: Span,
}

impl<'ast> StructDecl<'ast> {
    /// Position and declaration of the member called `name`.
    pub fn member(&self, name: &str) -> Option<(usize, &'ast Member<'ast>)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, m)| m.name.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&'ast FunctionDecl<'ast>> {
        self.methods.iter().find(|m| m.name.name == name)
    }
}
