//! Parser state and token-level helpers.

use bumpalo::Bump;
use bumpalo::collections::Vec as BVec;
use glacier_core::{CompileError, LexError};

use super::{Ident, Item, ParseError, Program};
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser over a fully lexed token buffer.
///
/// The buffer always ends with an `Eof` token, and the parser never looks
/// more than one token ahead.
pub struct Parser<'ast> {
    tokens: Vec<Token<'ast>>,
    position: usize,
    pub(crate) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Lex `source` and prepare to parse it.
    pub fn new(source: &str, arena: &'ast Bump) -> Result<Self, LexError> {
        let tokens = Lexer::new(source, arena).tokenize()?;
        Ok(Self::from_tokens(tokens, arena))
    }

    /// Parse from an existing token sequence. A trailing `Eof` is added if missing.
    pub fn from_tokens(mut tokens: Vec<Token<'ast>>, arena: &'ast Bump) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            position: 0,
            arena,
        }
    }

    /// Parse a whole program.
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<Program<'ast>, CompileError> {
        #[cfg(feature = "profiling")]
        profiling::scope!("Parser::parse");

        let mut parser = Parser::new(source, arena)?;
        let mut items = BVec::new_in(arena);
        while let Some(item) = parser.parse_next_item()? {
            items.push(item);
        }
        Ok(Program::new(items.into_bump_slice()))
    }

    /// Parse the next top-level declaration, or `None` at end of input.
    ///
    /// Only `fn` and `struct` may appear at the top level.
    pub fn parse_next_item(&mut self) -> Result<Option<Item<'ast>>, ParseError> {
        match self.peek().kind {
            TokenKind::Eof => Ok(None),
            TokenKind::Fn => Ok(Some(Item::Function(self.parse_function(None)?))),
            TokenKind::Struct => Ok(Some(Item::Struct(self.parse_struct()?))),
            TokenKind::Unknown => Err(self.unexpected("declaration")),
            _ => {
                let token = self.peek();
                Err(ParseError::expected_declaration(token.span, &token.describe()))
            }
        }
    }

    // =========================================
    // Token helpers
    // =========================================

    #[inline]
    pub(crate) fn peek(&self) -> &Token<'ast> {
        &self.tokens[self.position]
    }

    /// Consume the current token. Stays put on `Eof`.
    pub(crate) fn advance(&mut self) -> Token<'ast> {
        let token = self.tokens[self.position];
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.description()))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = *self.peek();
        if token.kind == TokenKind::Identifier {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else if matches!(token.kind, TokenKind::Eof | TokenKind::Unknown) {
            Err(self.unexpected("identifier"))
        } else {
            Err(ParseError::expected_identifier(token.span, &token.describe()))
        }
    }

    /// Error for the current token when `expected` was wanted.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => ParseError::unexpected_eof(token.span, expected),
            TokenKind::Unknown => ParseError::unrecognized_character(token.span, token.lexeme),
            _ => ParseError::expected_token(token.span, expected, &token.describe()),
        }
    }
}
