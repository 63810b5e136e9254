//! file: core/src/ir/synthesized.rs
//! description: module-scoped container of compiler-generated members.
//!
//! Every helper the compiler synthesizes for a module lives here, keyed by
//! its reserved name. Functions of one module are lowered concurrently, so
//! the container is the one piece of shared mutable state in lowering; all
//! insertion goes through a single entry-level critical section.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;

use super::node::BoundBlock;
use super::well_known::PRIVATE_IMPLEMENTATION_DETAILS;
use crate::symbols::MethodRef;

/// A synthesized method together with its generated body. Both are complete
/// before the method becomes visible in the container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedMethod {
    pub symbol: MethodRef,
    pub body: BoundBlock,
}

impl SynthesizedMethod {
    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

#[derive(Debug)]
pub struct SynthesizedMembers {
    type_name: String,
    methods: DashMap<String, SynthesizedMethod>,
}

impl SynthesizedMembers {
    pub fn new() -> Self {
        SynthesizedMembers {
            type_name: PRIVATE_IMPLEMENTATION_DETAILS.to_string(),
            methods: DashMap::new(),
        }
    }

    /// Name of the compiler-private type the members are emitted into.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get_method(&self, name: &str) -> Option<MethodRef> {
        self.methods.get(name).map(|entry| Arc::clone(&entry.value().symbol))
    }

    pub fn get(&self, name: &str) -> Option<SynthesizedMethod> {
        self.methods.get(name).map(|entry| entry.value().clone())
    }

    /// Register `method` under its own name. Returns `false` and leaves the
    /// container untouched if the name is already taken.
    pub fn try_add_method(&self, method: SynthesizedMethod) -> bool {
        match self.methods.entry(method.symbol.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(method);
                true
            }
        }
    }

    /// Return the method registered under `name`, building and registering
    /// it first if absent. `build` runs at most once per name for the life
    /// of the container, even under contention; the flag reports whether
    /// this call created it.
    ///
    /// `build` runs while the entry is locked and must not call back into
    /// this container.
    pub fn get_or_add_method<F>(&self, name: &str, build: F) -> (MethodRef, bool)
    where
        F: FnOnce() -> SynthesizedMethod,
    {
        if let Some(existing) = self.get_method(name) {
            return (existing, false);
        }

        match self.methods.entry(name.to_string()) {
            Entry::Occupied(entry) => (Arc::clone(&entry.get().symbol), false),
            Entry::Vacant(slot) => {
                let method = build();
                debug_assert_eq!(method.symbol.name, name);
                let symbol = Arc::clone(&method.symbol);
                slot.insert(method);
                (symbol, true)
            }
        }
    }

    /// Snapshot of all members, ordered by name.
    pub fn methods(&self) -> Vec<SynthesizedMethod> {
        let mut all: Vec<SynthesizedMethod> =
            self.methods.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by(|a, b| a.symbol.name.cmp(&b.symbol.name));
        all
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for SynthesizedMembers {
    fn default() -> Self {
        Self::new()
    }
}
