//! Built-in operations.
//!
//! Each intrinsic has a type rule, consulted by the type checker, and a
//! lowering, consulted by code generation. Every lowering pushes the
//! arguments left to right and then emits a single opcode, so the table
//! below is all the code generator needs.
//!
//! | Name      | Signature                          | Opcode       |
//! |-----------|------------------------------------|--------------|
//! | `print`   | `(int \| string) -> void`          | `PRINT`      |
//! | `push`    | `(vector<T>, T) -> void`           | `VEC_PUSH`   |
//! | `len`     | `(vector<T>) -> int`               | `VEC_LEN`    |
//! | `pop`     | `(vector<T>) -> void`              | `VEC_POP`    |
//! | `insert`  | `(map<K, V>, K, V) -> void`        | `MAP_INSERT` |
//! | `readStr` | `() -> string`                     | `READ_STR`   |
//! | `readInt` | `() -> int`                        | `READ_INT`   |

use glacier_core::{CompileError, Span, TypeError};
use glacier_parser::ast::{CallExpr, Type};

use crate::bytecode::OpCode;
use crate::passes::{CodeGenerator, TypeChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Print,
    Push,
    Len,
    Pop,
    Insert,
    ReadStr,
    ReadInt,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 7] = [
        Intrinsic::Print,
        Intrinsic::Push,
        Intrinsic::Len,
        Intrinsic::Pop,
        Intrinsic::Insert,
        Intrinsic::ReadStr,
        Intrinsic::ReadInt,
    ];

    pub fn lookup(name: &str) -> Option<Intrinsic> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Print => "print",
            Intrinsic::Push => "push",
            Intrinsic::Len => "len",
            Intrinsic::Pop => "pop",
            Intrinsic::Insert => "insert",
            Intrinsic::ReadStr => "readStr",
            Intrinsic::ReadInt => "readInt",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Intrinsic::ReadStr | Intrinsic::ReadInt => 0,
            Intrinsic::Print | Intrinsic::Len | Intrinsic::Pop => 1,
            Intrinsic::Push => 2,
            Intrinsic::Insert => 3,
        }
    }

    pub fn opcode(self) -> OpCode {
        match self {
            Intrinsic::Print => OpCode::Print,
            Intrinsic::Push => OpCode::VecPush,
            Intrinsic::Len => OpCode::VecLen,
            Intrinsic::Pop => OpCode::VecPop,
            Intrinsic::Insert => OpCode::MapInsert,
            Intrinsic::ReadStr => OpCode::ReadStr,
            Intrinsic::ReadInt => OpCode::ReadInt,
        }
    }

    /// Validate a call and return its result type.
    pub fn type_check<'ast>(
        self,
        checker: &mut TypeChecker<'_, 'ast>,
        call: &'ast CallExpr<'ast>,
        span: Span,
    ) -> Result<Type<'ast>, TypeError> {
        if call.args.len() != self.arity() {
            return Err(TypeError::ArgumentCount {
                callee: self.name().to_string(),
                expected: self.arity(),
                got: call.args.len(),
                span,
            });
        }

        let mut arg_types = Vec::with_capacity(call.args.len());
        for arg in call.args {
            arg_types.push(checker.check_value(arg)?);
        }
        let mismatch = |position: usize, expected: String| TypeError::ArgumentType {
            callee: self.name().to_string(),
            position: position + 1,
            expected,
            found: arg_types[position].to_string(),
            span: call.args[position].span,
        };

        match self {
            Intrinsic::Print => match arg_types[0] {
                Type::Int | Type::String => Ok(Type::Void),
                _ => Err(mismatch(0, "int or string".to_string())),
            },
            Intrinsic::Push => {
                let Type::Vector(elem) = arg_types[0] else {
                    return Err(mismatch(0, "vector".to_string()));
                };
                if arg_types[1] != *elem {
                    return Err(mismatch(1, elem.to_string()));
                }
                Ok(Type::Void)
            }
            Intrinsic::Len | Intrinsic::Pop => {
                if !matches!(arg_types[0], Type::Vector(_)) {
                    return Err(mismatch(0, "vector".to_string()));
                }
                Ok(if self == Intrinsic::Len {
                    Type::Int
                } else {
                    Type::Void
                })
            }
            Intrinsic::Insert => {
                let Type::Map(key, value) = arg_types[0] else {
                    return Err(mismatch(0, "map".to_string()));
                };
                if arg_types[1] != *key {
                    return Err(mismatch(1, key.to_string()));
                }
                if arg_types[2] != *value {
                    return Err(mismatch(2, value.to_string()));
                }
                Ok(Type::Void)
            }
            Intrinsic::ReadStr => Ok(Type::String),
            Intrinsic::ReadInt => Ok(Type::Int),
        }
    }

    /// Emit a call that has already passed [`Intrinsic::type_check`].
    pub fn codegen<'ast>(
        self,
        generator: &mut CodeGenerator<'_, 'ast>,
        call: &'ast CallExpr<'ast>,
    ) -> Result<(), CompileError> {
        for arg in call.args {
            generator.gen_expr(arg)?;
        }
        generator.emitter().emit(self.opcode());
        Ok(())
    }
}
