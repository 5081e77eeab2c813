//! Abstract syntax tree for glacier programs, and the parser that builds it.
//!
//! All nodes live in a [`bumpalo::Bump`] arena and borrow from it for `'ast`.
//! Later compiler passes annotate nodes in place (types, member slots,
//! function ids and offsets); nothing is restructured after parsing.
//!
//! # Example
//!
//! ```
//! use glacier_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("fn main() -> void { print(1); }", &arena).unwrap();
//! assert_eq!(program.items().len(), 1);
//! ```

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;
pub mod types;

mod decl_parser;
mod dump;
mod expr_parser;
mod parser;
mod stmt_parser;
mod type_parser;

use glacier_core::Span;

pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;
pub use types::*;

pub use glacier_core::{ParseError, ParseErrorKind};

/// A name as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    #[inline]
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A parsed program: the top-level items in declaration order.
#[derive(Debug, PartialEq)]
pub struct Program<'ast> {
    items: &'ast [Item<'ast>],
}

impl<'ast> Program<'ast> {
    pub(crate) fn new(items: &'ast [Item<'ast>]) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    pub fn structs(&self) -> impl Iterator<Item = &'ast StructDecl<'ast>> + use<'ast> {
        let items = self.items;
        items.iter().filter_map(|item| match item {
            Item::Struct(decl) => Some(decl),
            Item::Function(_) => None,
        })
    }

    /// Every function in declaration order, with struct methods in place of
    /// their struct.
    pub fn functions(&self) -> impl Iterator<Item = &'ast FunctionDecl<'ast>> + use<'ast> {
        let items = self.items;
        items.iter().flat_map(|item| match item {
            Item::Function(decl) => std::slice::from_ref(decl),
            Item::Struct(decl) => decl.methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_function() {
        let arena = bumpalo::Bump::new();
        let program = Parser::parse("fn foo() -> void { }", &arena).unwrap();
        assert_eq!(program.items().len(), 1);
    }

    #[test]
    fn functions_include_methods_in_order() {
        let arena = bumpalo::Bump::new();
        let source = r#"
            fn first() -> void { }
            struct Foo {
                int x;
                fn second() -> int { return this.x; }
                fn third() -> void { }
            };
            fn fourth() -> void { }
        "#;
        let program = Parser::parse(source, &arena).unwrap();
        let names: Vec<_> = program.functions().map(|f| f.name.name).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
        assert_eq!(program.structs().count(), 1);
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = r#"
            struct Point { int x = 0; int y = 0; };
            fn main() -> void {
                let p = new Point(1);
                let v = [p.x, p.y * 2] <int>;
                if (v[0] < 3) { print("small"); } else { print(len(v)); }
            }
        "#;
        let arena_a = bumpalo::Bump::new();
        let arena_b = bumpalo::Bump::new();
        let a = Parser::parse(source, &arena_a).unwrap();
        let b = Parser::parse(source, &arena_b).unwrap();
        assert_eq!(a, b);
    }
}
