//! Per-analysis symbol table
//!
//! Maps each declared or assigned identifier to its last-known integer value.
//! A table is created empty at the start of every analysis call; nothing is
//! shared between calls.
//!
//! The table itself never rejects an insert: assigning to an undeclared name
//! is a semantic error reported by the parser, but the value is still stored
//! (the source language is permissive). Looking up an absent name returns
//! `None`, never panics.

use rustc_hash::FxHashMap;

/// Identifier → last-assigned value, with insertion order preserved for
/// display.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    values: FxHashMap<String, i64>,
    insertion_order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Store a value under `name`, overwriting any previous value.
    pub fn insert(&mut self, name: &str, value: i64) {
        if self.values.insert(name.to_string(), value).is_none() {
            self.insertion_order.push(name.to_string());
        }
    }

    /// Last-assigned value of `name`, if any.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Whether `name` has been declared or assigned.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.insertion_order
            .iter()
            .map(|name| (name.as_str(), self.values[name]))
    }
}
