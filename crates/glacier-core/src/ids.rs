//! Numeric identifiers written into the bytecode.
//!
//! Type ids and function ids are assigned by the compiler passes and are the
//! only way the VM refers to structs and functions at runtime.

use std::fmt;

/// Identifies a runtime value layout.
///
/// Ids `0` and `1` are reserved for the built-in `int` and `string` types.
/// Declared structs are numbered from [`TypeId::FIRST_STRUCT`] in declaration
/// order.
///
/// # Example
///
/// ```
/// use glacier_core::TypeId;
///
/// assert_eq!(TypeId::FIRST_STRUCT.index(), 2);
/// assert_eq!(TypeId::FIRST_STRUCT.next(), TypeId::new(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const STRING: TypeId = TypeId(1);
    pub const FIRST_STRUCT: TypeId = TypeId(2);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// The id handed to the struct declared after this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Whether this id names a declared struct rather than a built-in.
    #[inline]
    pub const fn is_struct(self) -> bool {
        self.0 >= Self::FIRST_STRUCT.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type_{}", self.0)
    }
}

impl From<TypeId> for u32 {
    fn from(id: TypeId) -> Self {
        id.0
    }
}

/// Identifies a compiled function in the header's function table.
///
/// `main` is always [`FunctionId::MAIN`]; the VM starts execution there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(u32);

impl FunctionId {
    pub const MAIN: FunctionId = FunctionId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn_{}", self.0)
    }
}

impl From<FunctionId> for u32 {
    fn from(id: FunctionId) -> Self {
        id.0
    }
}

/// A member access resolved to a concrete struct and position.
///
/// The type checker attaches one of these to every member access so code
/// generation can emit get/set-by-index without searching for the name again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberSlot {
    pub struct_id: TypeId,
    pub index: u32,
}

impl MemberSlot {
    #[inline]
    pub const fn new(struct_id: TypeId, index: u32) -> Self {
        Self { struct_id, index }
    }
}
