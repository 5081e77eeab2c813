//! Core types shared by every stage of the glacier compiler.
//!
//! This crate holds the pieces that the lexer, parser and compiler all need
//! to agree on: source spans, the built-in type ids baked into the bytecode
//! header, and the error hierarchy.

mod error;
mod ids;
mod span;

pub use error::{
    CompileError, DecodeError, EncodeError, InternalError, LexError, ParseError, ParseErrorKind,
    TypeError,
};
pub use ids::{FunctionId, MemberSlot, TypeId};
pub use span::Span;
