//! Error types for every stage of compilation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! CompileError (top-level wrapper)
//! ├── LexError       - tokenization errors
//! ├── ParseError     - syntax errors (with ParseErrorKind)
//! ├── TypeError      - rejected programs: unresolved names, mismatched types
//! ├── EncodeError    - values that do not fit the configured operand width
//! └── InternalError  - invariant violations that an earlier pass should have caught
//! ```
//!
//! `DecodeError` stands apart: it is only produced when reading bytecode back.
//!
//! Compilation stops at the first error. Nothing here supports recovery.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during tokenization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A string literal reached end of input before its closing quote.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A character that starts no token.
    #[error("unrecognized character '{ch}' at {span}")]
    UnrecognizedCharacter { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span } => *span,
            LexError::UnrecognizedCharacter { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// A token that cannot appear here.
    UnexpectedToken,
    /// Input ended in the middle of a construct.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// A type was expected.
    ExpectedType,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// Only `fn` and `struct` may appear at the top level.
    ExpectedDeclaration,
    /// A literal could not be converted to its value.
    InvalidLiteral,
    /// The lexer produced an unknown token.
    UnrecognizedCharacter,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::InvalidLiteral => "invalid literal",
            ParseErrorKind::UnrecognizedCharacter => "unrecognized character",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    pub fn unexpected_eof(span: Span, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            format!("expected {expected}, found end of file"),
        )
    }

    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedType,
            span,
            format!("expected type, found {found}"),
        )
    }

    pub fn expected_declaration(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedDeclaration,
            span,
            format!("expected 'fn' or 'struct', found {found}"),
        )
    }

    pub fn invalid_literal(span: Span, literal: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidLiteral,
            span,
            format!("integer literal {literal} is out of range"),
        )
    }

    pub fn unrecognized_character(span: Span, lexeme: &str) -> Self {
        Self::new(
            ParseErrorKind::UnrecognizedCharacter,
            span,
            format!("'{lexeme}' does not start any token"),
        )
    }
}

// ============================================================================
// Type Errors
// ============================================================================

/// A program that parsed but is not well typed.
///
/// Types are carried pre-rendered so the error outlives the AST arena.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("at {span}: unknown variable '{name}'")]
    UnknownVariable { name: String, span: Span },

    #[error("at {span}: variable '{name}' is already declared in this function")]
    DuplicateVariable { name: String, span: Span },

    #[error("at {span}: unknown function '{name}'")]
    UnknownFunction { name: String, span: Span },

    #[error("at {span}: function '{name}' is already defined")]
    DuplicateFunction { name: String, span: Span },

    #[error("at {span}: unknown struct '{name}'")]
    UnknownStruct { name: String, span: Span },

    #[error("at {span}: struct '{name}' is already defined")]
    DuplicateStruct { name: String, span: Span },

    #[error("at {span}: struct '{type_name}' has no member '{member}'")]
    UnknownMember {
        type_name: String,
        member: String,
        span: Span,
    },

    #[error("at {span}: struct '{type_name}' has no method '{method}'")]
    UnknownMethod {
        type_name: String,
        method: String,
        span: Span,
    },

    #[error("at {span}: type '{found}' is not a struct")]
    NotAStruct { found: String, span: Span },

    #[error("at {span}: '{callee}' expects {expected} argument(s), got {got}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("at {span}: argument {position} of '{callee}' must be '{expected}', found '{found}'")]
    ArgumentType {
        callee: String,
        position: usize,
        expected: String,
        found: String,
        span: Span,
    },

    #[error("at {span}: {context} must be '{expected}', found '{found}'")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
        span: Span,
    },

    #[error("at {span}: no operator '{op}' for types '{left}' and '{right}'")]
    OperandMismatch {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    #[error("at {span}: void expression used as a value")]
    VoidValue { span: Span },

    #[error("at {span}: 'void' is only allowed as a return type")]
    VoidType { span: Span },

    #[error("at {span}: map keys must be 'int' or 'string', found '{found}'")]
    InvalidMapKey { found: String, span: Span },

    #[error("at {span}: expression is not assignable")]
    NotAssignable { span: Span },

    #[error("at {span}: type '{found}' cannot be indexed")]
    NotIndexable { found: String, span: Span },

    #[error("at {span}: function returning '{expected}' needs a return value")]
    MissingReturnValue { expected: String, span: Span },

    #[error("at {span}: void function cannot return a value")]
    UnexpectedReturnValue { span: Span },

    #[error("at {span}: 'new {struct_name}' takes at most {members} argument(s), got {got}")]
    TooManyConstructorArgs {
        struct_name: String,
        members: usize,
        got: usize,
        span: Span,
    },

    #[error("at {span}: 'new {struct_name}' leaves member '{member}' without a value")]
    MissingMemberValue {
        struct_name: String,
        member: String,
        span: Span,
    },

    #[error("at {span}: member '{member}' of struct '{struct_name}' cannot have type '{found}'")]
    UnsupportedMemberType {
        struct_name: String,
        member: String,
        found: String,
        span: Span,
    },

    #[error("at {span}: default values of struct '{struct_name}' construct '{struct_name}' again")]
    RecursiveDefault { struct_name: String, span: Span },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnknownVariable { span, .. }
            | TypeError::DuplicateVariable { span, .. }
            | TypeError::UnknownFunction { span, .. }
            | TypeError::DuplicateFunction { span, .. }
            | TypeError::UnknownStruct { span, .. }
            | TypeError::DuplicateStruct { span, .. }
            | TypeError::UnknownMember { span, .. }
            | TypeError::UnknownMethod { span, .. }
            | TypeError::NotAStruct { span, .. }
            | TypeError::ArgumentCount { span, .. }
            | TypeError::ArgumentType { span, .. }
            | TypeError::TypeMismatch { span, .. }
            | TypeError::OperandMismatch { span, .. }
            | TypeError::VoidValue { span }
            | TypeError::VoidType { span }
            | TypeError::InvalidMapKey { span, .. }
            | TypeError::NotAssignable { span }
            | TypeError::NotIndexable { span, .. }
            | TypeError::MissingReturnValue { span, .. }
            | TypeError::UnexpectedReturnValue { span }
            | TypeError::TooManyConstructorArgs { span, .. }
            | TypeError::MissingMemberValue { span, .. }
            | TypeError::UnsupportedMemberType { span, .. }
            | TypeError::RecursiveDefault { span, .. } => *span,
        }
    }
}

// ============================================================================
// Encode Errors
// ============================================================================

/// A value that cannot be written with the configured operand encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{what} {value} does not fit in an operand (max {max})")]
    OperandOverflow {
        what: &'static str,
        value: u64,
        max: u64,
    },

    #[error("string literal of {len} bytes exceeds the maximum of {max}")]
    StringTooLong { len: usize, max: u64 },

    #[error("backpatch at offset {offset} runs past the end of a {len}-byte buffer")]
    PatchOutOfBounds { offset: usize, len: usize },
}

// ============================================================================
// Internal Errors
// ============================================================================

/// Invariants that hold for every program the type checker accepts.
///
/// Seeing one of these means an earlier pass let an invalid program through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    #[error("internal error: member '{member}' of '{struct_name}' has no value and no default")]
    MissingDefault { struct_name: String, member: String },

    #[error("internal error: function '{name}' registered twice")]
    DuplicateFunction { name: String },

    #[error("internal error: expression at {span} is not an assignment target")]
    InvalidAssignTarget { span: Span },

    #[error("internal error: member access '{member}' was never resolved")]
    UnresolvedMember { member: String },

    #[error("internal error: expression at {span} has no type")]
    UntypedExpression { span: Span },

    #[error("internal error: variable '{name}' has no slot")]
    UnknownVariable { name: String },

    #[error("internal error: variable '{name}' bound to two slots")]
    DuplicateVariable { name: String },

    #[error("internal error: function '{name}' has no id")]
    UnknownFunction { name: String },

    #[error("internal error: struct '{name}' is not registered")]
    UnknownStruct { name: String },

    #[error("internal error: function '{name}' was never assigned an id")]
    MissingFunctionId { name: String },

    #[error("internal error: function '{name}' was never assigned an offset")]
    MissingFunctionOffset { name: String },
}

// ============================================================================
// Decode Errors
// ============================================================================

/// Errors from walking an emitted artifact back into instructions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("bytecode ends unexpectedly at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("invalid opcode 0x{byte:02x} at offset {offset}")]
    InvalidOpcode { byte: u8, offset: usize },

    #[error("missing bytecode magic")]
    BadMagic,

    #[error("unsupported bytecode version {version}")]
    UnsupportedVersion { version: u8 },

    #[error("unsupported operand width {width}")]
    InvalidWidth { width: u8 },

    #[error("header length {declared} does not match the header terminator at {actual}")]
    HeaderLengthMismatch { declared: usize, actual: usize },

    #[error("header has no terminator")]
    MissingHeaderEnd,

    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("'{op}' cannot appear in the {section} at offset {offset}")]
    Misplaced {
        op: &'static str,
        section: &'static str,
        offset: usize,
    },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error that stops a compilation.
///
/// ```ignore
/// fn compile(source: &str) -> Result<BytecodeArtifact, CompileError> {
///     let program = Parser::parse(source, &arena)?;   // LexError / ParseError
///     let structs = StructLayout::run(&program, &mut emitter)?;
///     TypeChecker::new(&structs).check(&program)?;   // TypeError
///     ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CompileError {
    pub fn is_lex(&self) -> bool {
        matches!(self, CompileError::Lex(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CompileError::Parse(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, CompileError::Type(_))
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, CompileError::Encode(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }

    /// Where in the source the error points, when it points anywhere.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lex(err) => Some(err.span()),
            CompileError::Parse(err) => Some(err.span),
            CompileError::Type(err) => Some(err.span()),
            CompileError::Encode(_) | CompileError::Internal(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
