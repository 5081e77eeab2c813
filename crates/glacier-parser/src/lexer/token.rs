//! Token types and definitions for the glacier lexer.

use glacier_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is allocated,
/// so the source string can be dropped once lexing is done.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    /// The exact source text of this token. String literals keep their quotes.
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// How this token reads in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Identifier | TokenKind::IntLiteral | TokenKind::StringLiteral => {
                format!("{} '{}'", self.kind.description(), self.lexeme)
            }
            TokenKind::Unknown => format!("'{}'", self.lexeme),
            _ => self.kind.description().to_string(),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token kinds in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals and names
    // =========================================
    /// Integer literal: `42`
    IntLiteral,
    /// String literal: `"hello"`
    StringLiteral,
    /// `[A-Za-z][A-Za-z0-9]*` that is not a keyword
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    Struct,
    Fn,
    Let,
    If,
    Else,
    Int,
    String,
    Return,
    New,
    While,
    Vector,
    Map,
    Void,

    // =========================================
    // Operators
    // =========================================
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `->`
    Arrow,
    /// `.`
    Dot,

    // =========================================
    // Delimiters
    // =========================================
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,
    Colon,
    Comma,

    // =========================================
    // Special
    // =========================================
    /// A character that starts no token. The parser reports it.
    Unknown,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Struct | Fn | Let | If | Else | Int | String | Return | New | While | Vector | Map | Void
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::IntLiteral | TokenKind::StringLiteral)
    }

    /// The string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            Struct => "'struct'",
            Fn => "'fn'",
            Let => "'let'",
            If => "'if'",
            Else => "'else'",
            Int => "'int'",
            String => "'string'",
            Return => "'return'",
            New => "'new'",
            While => "'while'",
            Vector => "'vector'",
            Map => "'map'",
            Void => "'void'",
            Equal => "'='",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Arrow => "'->'",
            Dot => "'.'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Colon => "':'",
            Comma => "','",
            Unknown => "unknown character",
            Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Map a keyword string to its [`TokenKind`], or `None` if not a keyword.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "struct" => Struct,
        "fn" => Fn,
        "let" => Let,
        "if" => If,
        "else" => Else,
        "int" => Int,
        "string" => String,
        "return" => Return,
        "new" => New,
        "while" => While,
        "vector" => Vector,
        "map" => Map,
        "void" => Void,
        _ => return None,
    })
}
