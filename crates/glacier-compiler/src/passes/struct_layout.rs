//! Struct Layout Pass - assign type ids and emit struct header records.
//!
//! Structs are numbered from 2 in declaration order. A member may have type
//! `int`, `string`, the struct itself, or a struct declared earlier; anything
//! else is rejected here because the header record cannot describe it.

use glacier_core::{CompileError, TypeError, TypeId};
use glacier_parser::Program;
use glacier_parser::ast::{StructDecl, Type};

use crate::emit::BytecodeEmitter;
use crate::registry::{StructInfo, StructRegistry};

/// Pass that lays out every struct before any function is looked at.
pub struct StructLayout;

impl StructLayout {
    /// Register every struct and write its `STRUCT_DEF` record.
    pub fn run<'ast>(
        program: &Program<'ast>,
        emitter: &mut BytecodeEmitter,
    ) -> Result<StructRegistry<'ast>, CompileError> {
        #[cfg(feature = "profiling")]
        profiling::scope!("StructLayout::run");

        let mut registry = StructRegistry::new();
        let mut next_id = TypeId::FIRST_STRUCT;

        for decl in program.structs() {
            if registry.contains(decl.name.name) {
                return Err(TypeError::DuplicateStruct {
                    name: decl.name.name.to_string(),
                    span: decl.name.span,
                }
                .into());
            }

            let type_id = next_id;
            next_id = next_id.next();

            let member_types = Self::member_types(decl, type_id, &registry)?;
            emitter.emit_struct_def(type_id, &member_types)?;
            registry.register(StructInfo {
                type_id,
                decl,
                member_types,
            });
        }

        tracing::debug!(
            structs = registry.len(),
            ids = ?registry.iter().map(|s| (s.name(), s.type_id.index())).collect::<Vec<_>>(),
            "struct layout complete"
        );
        Ok(registry)
    }

    fn member_types<'ast>(
        decl: &'ast StructDecl<'ast>,
        own_id: TypeId,
        registry: &StructRegistry<'ast>,
    ) -> Result<Vec<TypeId>, TypeError> {
        decl.members
            .iter()
            .map(|member| match member.ty {
                Type::Int => Ok(TypeId::INT),
                Type::String => Ok(TypeId::STRING),
                Type::User(name) if name == decl.name.name => Ok(own_id),
                Type::User(name) => {
                    registry
                        .type_id(name)
                        .ok_or_else(|| TypeError::UnknownStruct {
                            name: name.to_string(),
                            span: member.span,
                        })
                }
                Type::Vector(_) | Type::Map(_, _) | Type::Void => {
                    Err(TypeError::UnsupportedMemberType {
                        struct_name: decl.name.name.to_string(),
                        member: member.name.name.to_string(),
                        found: member.ty.to_string(),
                        span: member.span,
                    })
                }
            })
            .collect()
    }
}
