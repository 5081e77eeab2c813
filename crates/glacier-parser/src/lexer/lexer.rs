//! The [`Lexer`] turns source text into a stream of [`Token`]s.
//!
//! Scanning dispatches on the first character of each token. Lexemes are
//! copied into the arena so the source string can be freed after lexing.

use bumpalo::Bump;
use glacier_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for glacier source code.
///
/// The `'src` lifetime is the source string being lexed.
/// The `'ast` lifetime is the arena where token lexemes are allocated.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    /// Set once the end-of-input token has been handed out.
    finished: bool,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            finished: false,
        }
    }

    /// Consume and return the next token.
    ///
    /// Once input is exhausted every further call returns an `Eof` token.
    /// An unrecognized character comes back as a `TokenKind::Unknown` token;
    /// only an unterminated string fails here.
    pub fn next_token(&mut self) -> Result<Token<'ast>, LexError> {
        self.skip_whitespace();

        if self.cursor.is_eof() {
            self.finished = true;
            return Ok(self.make_eof());
        }

        let start = Start {
            line: self.cursor.line(),
            col: self.cursor.column(),
            offset: self.cursor.offset(),
        };

        match self.cursor.peek() {
            Some('"') => self.scan_string(start),
            Some(c) if c.is_ascii_digit() => Ok(self.scan_number(start)),
            Some(c) if is_ident_start(c) => Ok(self.scan_identifier(start)),
            _ => Ok(self.scan_symbol(start)),
        }
    }

    /// Lex the whole input, including the trailing `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token<'ast>>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    /// Like [`tokenize`](Self::tokenize), but an unrecognized character is a
    /// [`LexError`] instead of an `Unknown` token.
    pub fn tokenize_strict(self) -> Result<Vec<Token<'ast>>, LexError> {
        let tokens = self.tokenize()?;
        if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::Unknown) {
            return Err(LexError::UnrecognizedCharacter {
                ch: bad.lexeme.chars().next().unwrap_or('\0'),
                span: bad.span,
            });
        }
        Ok(tokens)
    }

    // =========================================
    // Internal: helpers
    // =========================================

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    fn make_eof(&self) -> Token<'ast> {
        let span = Span::point(self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    /// Create a token spanning from `start` to the current position.
    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'ast> {
        let len = self.cursor.offset() - start.offset;
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start.offset));
        Token::new(kind, lexeme, Span::new(start.line, start.col, len))
    }

    // =========================================
    // Scanning
    // =========================================

    /// Scan a `"`-delimited string. There are no escape sequences, and a
    /// string may run across lines.
    fn scan_string(&mut self, start: Start) -> Result<Token<'ast>, LexError> {
        self.cursor.advance();
        self.cursor.eat_while(|c| c != '"');

        if !self.cursor.eat('"') {
            let len = self.cursor.offset() - start.offset;
            return Err(LexError::UnterminatedString {
                span: Span::new(start.line, start.col, len),
            });
        }

        Ok(self.make_token(TokenKind::StringLiteral, start))
    }

    /// Scan a maximal run of digits. Signs are separate tokens.
    fn scan_number(&mut self, start: Start) -> Token<'ast> {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        self.make_token(TokenKind::IntLiteral, start)
    }

    fn scan_identifier(&mut self, start: Start) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    /// Scan punctuation or an operator.
    ///
    /// Two-character symbols win over their one-character prefixes.
    fn scan_symbol(&mut self, start: Start) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('-', Some('>')) => self.take_second(TokenKind::Arrow),
            ('=', Some('=')) => self.take_second(TokenKind::EqualEqual),
            ('!', Some('=')) => self.take_second(TokenKind::BangEqual),
            ('<', Some('=')) => self.take_second(TokenKind::LessEqual),
            ('>', Some('=')) => self.take_second(TokenKind::GreaterEqual),

            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            (';', _) => TokenKind::Semicolon,
            (':', _) => TokenKind::Colon,
            (',', _) => TokenKind::Comma,
            ('.', _) => TokenKind::Dot,
            ('=', _) => TokenKind::Equal,
            ('<', _) => TokenKind::Less,
            ('>', _) => TokenKind::Greater,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,

            _ => TokenKind::Unknown,
        };

        self.make_token(kind, start)
    }

    #[inline]
    fn take_second(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }
}

/// Position of the first character of the token being scanned.
#[derive(Clone, Copy)]
struct Start {
    line: u32,
    col: u32,
    offset: u32,
}

impl<'ast> Iterator for Lexer<'_, 'ast> {
    type Item = Result<Token<'ast>, LexError>;

    /// Yields tokens up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
