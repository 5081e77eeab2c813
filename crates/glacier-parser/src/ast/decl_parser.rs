//! Declaration parsing: functions, structs, members and methods.

use bumpalo::collections::Vec as BVec;

use super::decl::*;
use super::parser::Parser;
use super::{Ident, ParseError, Type};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a function declaration.
    ///
    /// Grammar: `'fn' IDENTIFIER '(' (TYPE IDENTIFIER (',' TYPE IDENTIFIER)*)? ')' '->' TYPE BLOCK`
    ///
    /// When `owner` names a struct, the function is a method and gets an
    /// implicit leading `this` parameter of that struct's type.
    pub fn parse_function(
        &mut self,
        owner: Option<&'ast str>,
    ) -> Result<FunctionDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Fn)?.span;
        let name = self.expect_ident()?;

        let mut params = BVec::new_in(self.arena);
        if let Some(owner) = owner {
            params.push(Param {
                name: Ident::new("this", name.span),
                ty: Type::User(owner),
            });
        }

        self.expect(TokenKind::LeftParen)?;
        if !self.check(TokenKind::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let param_name = self.expect_ident()?;
                params.push(Param {
                    name: param_name,
                    ty,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(FunctionDecl::new(
            name,
            self.arena.alloc_slice_copy(&params),
            return_type,
            body,
            owner,
            start.merge(name.span),
        ))
    }

    /// Parse a struct declaration.
    ///
    /// Grammar: `'struct' IDENTIFIER '{' MEMBER* FUNCTION* '}' ';'`
    ///
    /// Members come first; the first `fn` switches to methods.
    pub fn parse_struct(&mut self) -> Result<StructDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Struct)?.span;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftBrace)?;

        let mut members = BVec::new_in(self.arena);
        while !self.check(TokenKind::Fn) && !self.check(TokenKind::RightBrace) {
            members.push(self.parse_member()?);
        }

        let mut methods = BVec::new_in(self.arena);
        while self.check(TokenKind::Fn) {
            methods.push(self.parse_function(Some(name.name))?);
        }

        self.expect(TokenKind::RightBrace)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(StructDecl {
            name,
            members: self.arena.alloc_slice_copy(&members),
            methods: methods.into_bump_slice(),
            span: start.merge(name.span),
        })
    }

    /// Grammar: `TYPE IDENTIFIER ('=' EXPR)? ';'`
    fn parse_member(&mut self) -> Result<Member<'ast>, ParseError> {
        let start = self.peek().span;
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        let default = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let end = self.expect(TokenKind::Semicolon)?.span;

        Ok(Member {
            name,
            ty,
            default,
            span: start.merge(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Item, Stmt};
    use glacier_core::{CompileError, ParseErrorKind};

    fn parse_one<'ast>(source: &str, arena: &'ast bumpalo::Bump) -> Item<'ast> {
        let mut parser = Parser::new(source, arena).unwrap();
        let item = parser.parse_next_item().unwrap().unwrap();
        assert!(parser.parse_next_item().unwrap().is_none());
        item
    }

    #[test]
    fn function_with_params() {
        let arena = bumpalo::Bump::new();
        let source = "fn add(int a, string b) -> int { return a; }";
        let Item::Function(func) = parse_one(source, &arena) else {
            panic!("expected function");
        };
        assert_eq!(func.name.name, "add");
        let params: Vec<_> = func.params.iter().map(|p| (p.name.name, p.ty)).collect();
        assert_eq!(params, vec![("a", Type::Int), ("b", Type::String)]);
        assert_eq!(func.return_type, Type::Int);
        assert_eq!(func.body.len(), 1);
        assert!(!func.is_method());
        assert_eq!(func.id(), None);
        assert_eq!(func.offset(), None);
    }

    #[test]
    fn function_returning_container() {
        let arena = bumpalo::Bump::new();
        let Item::Function(func) = parse_one("fn f() -> map<string, int> { }", &arena) else {
            panic!("expected function");
        };
        assert_eq!(func.return_type.to_string(), "map<string, int>");
    }

    #[test]
    fn struct_with_defaults_and_methods() {
        let arena = bumpalo::Bump::new();
        let source = r#"
            struct Foo {
                string name;
                int age = 20;
                fn greet(int times) -> void { print(this.name); }
            };
        "#;
        let Item::Struct(decl) = parse_one(source, &arena) else {
            panic!("expected struct");
        };
        assert_eq!(decl.name.name, "Foo");
        assert_eq!(decl.members.len(), 2);
        assert!(decl.members[0].default.is_none());
        assert!(matches!(
            decl.members[1].default.map(|e| &e.kind),
            Some(ExprKind::Int(20))
        ));

        let method = &decl.methods[0];
        assert_eq!(method.owner, Some("Foo"));
        let params: Vec<_> = method.params.iter().map(|p| (p.name.name, p.ty)).collect();
        assert_eq!(params, vec![("this", Type::User("Foo")), ("times", Type::Int)]);
        assert!(matches!(method.body[0], Stmt::Expr(_)));

        assert_eq!(decl.member("age").map(|(i, _)| i), Some(1));
        assert!(decl.method("greet").is_some());
        assert!(decl.member("greet").is_none());
    }

    #[test]
    fn empty_struct() {
        let arena = bumpalo::Bump::new();
        let Item::Struct(decl) = parse_one("struct Empty { };", &arena) else {
            panic!("expected struct");
        };
        assert!(decl.members.is_empty());
        assert!(decl.methods.is_empty());
    }

    #[test]
    fn struct_requires_trailing_semicolon() {
        let arena = bumpalo::Bump::new();
        let err = Parser::parse("struct Foo { int x; }", &arena).unwrap_err();
        match err {
            CompileError::Parse(err) => assert_eq!(err.kind, ParseErrorKind::UnexpectedEof),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn members_after_methods_are_rejected() {
        let arena = bumpalo::Bump::new();
        let source = "struct Foo { fn f() -> void { } int x; };";
        let err = Parser::parse(source, &arena).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn function_requires_return_type() {
        let arena = bumpalo::Bump::new();
        let err = Parser::parse("fn main() { }", &arena).unwrap_err();
        match err {
            CompileError::Parse(err) => assert!(err.message.contains("'->'")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
