//! Name to value table filled while top-level declarations are lowered.
//!
//! Every declared top-level name is recorded exactly once per declaration, in
//! traversal order, with the value its initializer evaluated to (if any). The
//! table is returned to the caller with the lowering output; later stages use
//! it for constant substitution.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::semantic::const_eval::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: IndexMap<String, Option<Value>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`. A redeclaration replaces the value but keeps the
    /// original insertion position.
    pub fn record(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        debug!("symbol {} = {:?}", name, value);
        self.entries.insert(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry for `name`: `None` if unknown, `Some(None)` if declared without a value.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.entries.get(name)
    }

    /// Evaluated value of `name`, if it is known and has one.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
