//! Expression parsing using Pratt parsing (precedence climbing).

use bumpalo::collections::Vec as BVec;
use glacier_core::Span;

use super::expr::*;
use super::parser::Parser;
use super::{BinaryOp, Ident, ParseError};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// Only operators whose left binding power is at least `min_bp` are
    /// consumed; call with `0` to parse a full expression.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_primary()?;

        loop {
            let kind = self.peek().kind;

            if matches!(kind, TokenKind::Dot | TokenKind::LeftBracket) {
                if BinaryOp::POSTFIX_BP < min_bp {
                    break;
                }
                lhs = if kind == TokenKind::Dot {
                    self.parse_member_access(lhs)?
                } else {
                    self.parse_index(lhs)?
                };
                continue;
            }

            if let Some(op) = BinaryOp::from_token(kind) {
                let (l_bp, r_bp) = op.binding_power();
                if l_bp < min_bp {
                    break;
                }

                self.advance();
                let rhs = self.parse_expr(r_bp)?;
                let span = lhs.span.merge(rhs.span);
                lhs = self.alloc_expr(
                    ExprKind::Binary(BinaryExpr {
                        left: lhs,
                        op,
                        right: rhs,
                    }),
                    span,
                );
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::invalid_literal(token.span, token.lexeme))?;
                Ok(self.alloc_expr(ExprKind::Int(value), token.span))
            }

            TokenKind::StringLiteral => {
                self.advance();
                let text = &token.lexeme[1..token.lexeme.len() - 1];
                Ok(self.alloc_expr(ExprKind::String(text), token.span))
            }

            TokenKind::LeftBracket => self.parse_vector_literal(),
            TokenKind::LeftBrace => self.parse_map_literal(),
            TokenKind::New => self.parse_constructor(),

            TokenKind::Identifier => {
                self.advance();
                let name = Ident::new(token.lexeme, token.span);
                if self.check(TokenKind::LeftParen) {
                    let (args, end) = self.parse_arguments()?;
                    Ok(self.alloc_expr(
                        ExprKind::Call(CallExpr { callee: name, args }),
                        token.span.merge(end),
                    ))
                } else {
                    Ok(self.alloc_expr(ExprKind::Variable(name), token.span))
                }
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }

            TokenKind::Eof | TokenKind::Unknown => Err(self.unexpected("expression")),
            _ => Err(ParseError::expected_expression(
                token.span,
                &token.describe(),
            )),
        }
    }

    /// Parse a vector literal.
    ///
    /// Grammar: `'[' (EXPR (',' EXPR)*)? ']' '<' TYPE '>'`
    fn parse_vector_literal(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let start = self.expect(TokenKind::LeftBracket)?.span;

        let mut elements = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBracket)?;

        self.expect(TokenKind::Less)?;
        let elem_type = self.parse_type_ref()?;
        let end = self.expect(TokenKind::Greater)?.span;

        Ok(self.alloc_expr(
            ExprKind::Vector(VectorExpr {
                elements: elements.into_bump_slice(),
                elem_type,
            }),
            start.merge(end),
        ))
    }

    /// Parse a map literal.
    ///
    /// Grammar: `'{' (EXPR ':' EXPR (',' EXPR ':' EXPR)*)? '}' '<' TYPE ',' TYPE '>'`
    fn parse_map_literal(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let start = self.expect(TokenKind::LeftBrace)?.span;

        let mut entries = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightBrace) {
            loop {
                let key = self.parse_expr(0)?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr(0)?;
                entries.push(MapEntry { key, value });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightBrace)?;

        self.expect(TokenKind::Less)?;
        let (key_type, value_type) = self.parse_key_value_types()?;
        let end = self.expect(TokenKind::Greater)?.span;

        Ok(self.alloc_expr(
            ExprKind::Map(MapExpr {
                entries: entries.into_bump_slice(),
                key_type,
                value_type,
            }),
            start.merge(end),
        ))
    }

    /// Grammar: `'new' IDENTIFIER ARGS`
    fn parse_constructor(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let start = self.expect(TokenKind::New)?.span;
        let name = self.expect_ident()?;
        let (args, end) = self.parse_arguments()?;
        Ok(self.alloc_expr(
            ExprKind::Constructor(ConstructorExpr { name, args }),
            start.merge(end),
        ))
    }

    /// Parse `.member` or `.method(args)` after `base`.
    fn parse_member_access(
        &mut self,
        base: &'ast Expr<'ast>,
    ) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::Dot)?;
        let member = self.expect_ident()?;

        if self.check(TokenKind::LeftParen) {
            let (args, end) = self.parse_arguments()?;
            return Ok(self.alloc_expr(
                ExprKind::MethodCall(MethodCallExpr {
                    receiver: base,
                    method: member,
                    args,
                }),
                base.span.merge(end),
            ));
        }

        Ok(self.alloc_expr(
            ExprKind::Member(MemberExpr::new(base, member)),
            base.span.merge(member.span),
        ))
    }

    /// Parse `[index]` after `base`.
    fn parse_index(&mut self, base: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let index = self.parse_expr(0)?;
        let end = self.expect(TokenKind::RightBracket)?.span;
        Ok(self.alloc_expr(
            ExprKind::Index(IndexExpr { base, index }),
            base.span.merge(end),
        ))
    }

    /// Parse a parenthesized argument list, returning the arguments and the
    /// span of the closing parenthesis.
    ///
    /// Grammar: `'(' (EXPR (',' EXPR)*)? ')'`
    fn parse_arguments(&mut self) -> Result<(&'ast [&'ast Expr<'ast>], Span), ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut args = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let end = self.expect(TokenKind::RightParen)?.span;
        Ok((args.into_bump_slice(), end))
    }

    #[inline]
    fn alloc_expr(&self, kind: ExprKind<'ast>, span: Span) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::new(kind, span))
    }
}
