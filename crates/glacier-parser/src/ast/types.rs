//! The type model shared by declarations and expression annotations.

use std::fmt;

/// A glacier type.
///
/// Equality is structural: two vectors are equal when their element types
/// are, two user types when their names match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type<'ast> {
    Int,
    String,
    Vector(&'ast Type<'ast>),
    Map(&'ast Type<'ast>, &'ast Type<'ast>),
    Void,
    /// A declared struct, by name.
    User(&'ast str),
}

impl<'ast> Type<'ast> {
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::String => f.write_str("string"),
            Type::Vector(elem) => write!(f, "vector<{elem}>"),
            Type::Map(key, value) => write!(f, "map<{key}, {value}>"),
            Type::Void => f.write_str("void"),
            Type::User(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nests() {
        let int = Type::Int;
        let inner = Type::Vector(&int);
        let string = Type::String;
        let ty = Type::Map(&string, &inner);
        assert_eq!(ty.to_string(), "map<string, vector<int>>");
    }

    #[test]
    fn equality_is_structural() {
        let a_elem = Type::User("Foo");
        let b_elem = Type::User("Foo");
        assert_eq!(Type::Vector(&a_elem), Type::Vector(&b_elem));
        assert_ne!(Type::Vector(&a_elem), Type::Vector(&Type::Int));
        assert_ne!(Type::User("Foo"), Type::User("Bar"));
    }

    #[test]
    fn only_void_is_void() {
        assert!(Type::Void.is_void());
        assert!(!Type::User("Foo").is_void());
        assert!(!Type::Vector(&Type::Void).is_void());
    }
}
