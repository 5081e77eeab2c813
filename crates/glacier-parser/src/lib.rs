//! Front end of the glacier compiler.
//!
//! This crate provides:
//! - Lexical analysis ([`Lexer`])
//! - The arena-allocated AST ([`ast`])
//! - A recursive-descent parser with precedence climbing for expressions ([`Parser`])
//!
//! # Example
//!
//! ```
//! use glacier_parser::{ast::Item, Parser};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     struct Counter {
//!         int count = 0;
//!         fn bump() -> void { this.count = this.count + 1; }
//!     };
//!
//!     fn main() -> void {
//!         let c = new Counter();
//!         c.bump();
//!     }
//! "#;
//!
//! let program = Parser::parse(source, &arena).unwrap();
//! assert!(matches!(program.items()[0], Item::Struct(_)));
//! assert_eq!(program.functions().count(), 2);
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Parser, Program};
pub use lexer::{Lexer, Token, TokenKind};
