//! Glacier: a compiler for a small statically-typed language with structs,
//! vectors and maps, targeting a compact stack-machine bytecode.
//!
//! This crate is the public entry point. It wires the front end
//! ([`glacier_parser`]) to the bytecode backend ([`glacier_compiler`]) and
//! re-exports the types a driver needs.
//!
//! # Example
//!
//! ```
//! use glacier::{Instruction, compile};
//!
//! let artifact = compile("fn main() -> void { print(\"hello\"); }").unwrap();
//! let program = artifact.decode().unwrap();
//!
//! assert_eq!(program.header, vec![Instruction::FunctionJmp { id: 0, offset: 0 }]);
//! assert!(program.body_instructions().any(|i| *i == Instruction::Print));
//! ```
//!
//! Options control the operand width and the self-describing preamble:
//!
//! ```
//! use glacier::{CompileOptions, compile_with};
//!
//! let artifact = compile_with("fn main() -> void { }", &CompileOptions::compatible()).unwrap();
//! // Byte-wide operands, no preamble: HEADER: FUNCTION_JMP 0 0, HEADER_END.
//! assert_eq!(artifact.header(), &[0x0D, 0, 0, 0x0E]);
//! assert_eq!(artifact.body(), &[0x01, 0, 0, 0x05]);
//! ```

use bumpalo::Bump;
use glacier_parser::{Lexer, Parser, TokenKind};

pub use glacier_compiler::bytecode;
pub use glacier_compiler::{BytecodeArtifact, CompileOptions, Instruction, OpCode, OperandWidth};
pub use glacier_core::{
    CompileError, DecodeError, EncodeError, InternalError, LexError, ParseError, ParseErrorKind,
    Span, TypeError,
};

/// Compile source text with the default [`CompileOptions`].
pub fn compile(source: &str) -> Result<BytecodeArtifact, CompileError> {
    compile_with(source, &CompileOptions::default())
}

/// Compile source text into a bytecode artifact.
///
/// Runs the whole pipeline and stops at the first error.
pub fn compile_with(
    source: &str,
    options: &CompileOptions,
) -> Result<BytecodeArtifact, CompileError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("glacier::compile");

    let _span = tracing::debug_span!("compile", bytes = source.len()).entered();

    let arena = Bump::new();
    let program = Parser::parse(source, &arena)?;
    let artifact = glacier_compiler::compile_program(&program, options)?;

    tracing::debug!(
        header = artifact.header().len(),
        body = artifact.body().len(),
        "compiled"
    );
    Ok(artifact)
}

/// Render the token stream, one token per line as `line:col KIND lexeme`.
///
/// Unrecognized characters are reported the way the parser reports them,
/// as a [`LexError::UnrecognizedCharacter`].
pub fn dump_tokens(source: &str) -> Result<String, CompileError> {
    let arena = Bump::new();
    let tokens = Lexer::new(source, &arena).tokenize_strict()?;

    let mut out = String::new();
    for token in tokens {
        if token.kind == TokenKind::Eof {
            break;
        }
        out.push_str(&format!(
            "{}:{}\t{:?}\t{}\n",
            token.span.line, token.span.col, token.kind, token.lexeme
        ));
    }
    Ok(out)
}

/// Parse the source and render its AST as an indented outline.
pub fn dump_ast(source: &str) -> Result<String, CompileError> {
    let arena = Bump::new();
    let program = Parser::parse(source, &arena)?;
    Ok(program.dump())
}
