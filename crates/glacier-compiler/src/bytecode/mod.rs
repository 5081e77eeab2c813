//! Bytecode format: opcodes, encoded chunks, the finished artifact and the
//! decoder that reads it back.
//!
//! ## Layout
//!
//! ```text
//! [preamble]  "GLCB" version width header_len   (optional)
//! [header]    STRUCT_DEF* FUNCTION_JMP* HEADER_END
//! [body]      instructions; offsets count from the first body byte
//! ```

mod artifact;
mod chunk;
mod decode;
mod opcode;

pub use artifact::{BytecodeArtifact, FORMAT_VERSION, MAGIC, PREAMBLE_LEN};
pub use chunk::BytecodeChunk;
pub use decode::{Instruction, Program, decode, decode_instructions};
pub use opcode::OpCode;
