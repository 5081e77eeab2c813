//! Per-function variable tables.
//!
//! A function has one flat scope. A `let` anywhere in the body claims its
//! name for the rest of the function, and blocks do not open new scopes.
//! Slots are handed out from 0 in declaration order, parameters first.

use glacier_parser::ast::Type;
use rustc_hash::FxHashMap;

/// A bound variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVar<'ast> {
    pub slot: u32,
    pub ty: Type<'ast>,
}

/// Variables of the function currently being walked.
#[derive(Debug, Default)]
pub struct LocalScope<'ast> {
    variables: FxHashMap<&'ast str, LocalVar<'ast>>,
    next_slot: u32,
}

impl<'ast> LocalScope<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the next slot.
    ///
    /// Returns `None`, leaving the scope unchanged, if the name is taken.
    pub fn declare(&mut self, name: &'ast str, ty: Type<'ast>) -> Option<LocalVar<'ast>> {
        if self.variables.contains_key(name) {
            return None;
        }
        let var = LocalVar {
            slot: self.next_slot,
            ty,
        };
        self.variables.insert(name, var);
        self.next_slot += 1;
        Some(var)
    }

    pub fn lookup(&self, name: &str) -> Option<LocalVar<'ast>> {
        self.variables.get(name).copied()
    }

    /// Forget every binding at a function boundary.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.next_slot = 0;
    }

    /// Number of slots in use.
    pub fn len(&self) -> usize {
        self.next_slot as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_slot == 0
    }
}
