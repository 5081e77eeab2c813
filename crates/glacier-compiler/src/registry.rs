//! Program-wide symbol tables.
//!
//! [`StructRegistry`] is filled by the struct layout pass and read by every
//! later pass. [`FunctionRegistry`] maps function names, methods included, to
//! their declarations; the type checker builds it before checking any body
//! so calls may refer to functions declared further down.

use glacier_core::{MemberSlot, TypeId};
use glacier_parser::ast::{FunctionDecl, Member, StructDecl};
use rustc_hash::FxHashMap;

// ============================================================================
// Structs
// ============================================================================

/// Layout of one declared struct.
#[derive(Debug, Clone)]
pub struct StructInfo<'ast> {
    pub type_id: TypeId,
    pub decl: &'ast StructDecl<'ast>,
    /// Runtime type id of each member, in declaration order.
    pub member_types: Vec<TypeId>,
}

impl<'ast> StructInfo<'ast> {
    pub fn name(&self) -> &'ast str {
        self.decl.name.name
    }

    /// Resolve a member name to its slot.
    pub fn member(&self, name: &str) -> Option<(MemberSlot, &'ast Member<'ast>)> {
        let (index, member) = self.decl.member(name)?;
        Some((MemberSlot::new(self.type_id, index as u32), member))
    }

    pub fn members(&self) -> &'ast [Member<'ast>] {
        self.decl.members
    }
}

/// Declared structs by name, remembering declaration order.
#[derive(Debug, Default)]
pub struct StructRegistry<'ast> {
    by_name: FxHashMap<&'ast str, usize>,
    structs: Vec<StructInfo<'ast>>,
}

impl<'ast> StructRegistry<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct. Returns `false` if the name is already taken.
    pub fn register(&mut self, info: StructInfo<'ast>) -> bool {
        let name = info.name();
        if self.by_name.contains_key(name) {
            return false;
        }
        self.by_name.insert(name, self.structs.len());
        self.structs.push(info);
        true
    }

    pub fn get(&self, name: &str) -> Option<&StructInfo<'ast>> {
        self.by_name.get(name).map(|&i| &self.structs[i])
    }

    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.get(name).map(|info| info.type_id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Structs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &StructInfo<'ast>> {
        self.structs.iter()
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Declared functions and methods by name.
#[derive(Debug, Default)]
pub struct FunctionRegistry<'ast> {
    by_name: FxHashMap<&'ast str, &'ast FunctionDecl<'ast>>,
}

impl<'ast> FunctionRegistry<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function. Returns the existing declaration on a clash.
    pub fn register(
        &mut self,
        decl: &'ast FunctionDecl<'ast>,
    ) -> Result<(), &'ast FunctionDecl<'ast>> {
        match self.by_name.get(decl.name.name) {
            Some(existing) => Err(existing),
            None => {
                self.by_name.insert(decl.name.name, decl);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&'ast FunctionDecl<'ast>> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use glacier_parser::ast::Type;
    use glacier_parser::Parser;

    #[test]
    fn struct_registry_keeps_order() {
        let arena = Bump::new();
        let program = Parser::parse(
            "struct B { int x = 0; }; struct A { B b = new B(); string s = \"\"; };",
            &arena,
        )
        .unwrap();

        let mut registry = StructRegistry::new();
        let mut id = TypeId::FIRST_STRUCT;
        for decl in program.structs() {
            assert!(registry.register(StructInfo {
                type_id: id,
                decl,
                member_types: Vec::new(),
            }));
            id = id.next();
        }

        let names: Vec<_> = registry.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(registry.type_id("A"), Some(TypeId::new(3)));

        let (slot, member) = registry.get("A").unwrap().member("s").unwrap();
        assert_eq!(slot, MemberSlot::new(TypeId::new(3), 1));
        assert_eq!(member.ty, Type::String);
        assert!(registry.get("A").unwrap().member("nope").is_none());
    }

    #[test]
    fn struct_registry_rejects_duplicates() {
        let arena = Bump::new();
        let program = Parser::parse("struct A { }; struct A { };", &arena).unwrap();
        let mut registry = StructRegistry::new();
        let mut results = program.structs().map(|decl| {
            registry.register(StructInfo {
                type_id: TypeId::FIRST_STRUCT,
                decl,
                member_types: Vec::new(),
            })
        });
        assert_eq!(results.next(), Some(true));
        assert_eq!(results.next(), Some(false));
    }

    #[test]
    fn function_registry_rejects_duplicates() {
        let arena = Bump::new();
        let program = Parser::parse(
            "fn f() -> void { } fn f() -> int { return 1; }",
            &arena,
        )
        .unwrap();
        let mut registry = FunctionRegistry::new();
        let mut functions = program.functions();

        assert!(registry.register(functions.next().unwrap()).is_ok());
        let existing = registry.register(functions.next().unwrap()).unwrap_err();
        assert_eq!(existing.return_type, Type::Void);
        assert_eq!(registry.len(), 1);
    }
}
