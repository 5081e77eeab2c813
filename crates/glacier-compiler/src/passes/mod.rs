//! Compiler passes, in the order they run.
//!
//! - [`struct_layout`]: assign struct type ids, emit `STRUCT_DEF` records
//! - [`type_check`]: deduce expression types, resolve members, reject bad programs
//! - [`codegen`]: assign function ids, lower bodies, backpatch jumps
//! - [`function_table`]: emit `FUNCTION_JMP` records from the recorded offsets

pub mod codegen;
pub mod function_table;
pub mod struct_layout;
pub mod type_check;

pub use codegen::CodeGenerator;
pub use function_table::FunctionTable;
pub use struct_layout::StructLayout;
pub use type_check::TypeChecker;
