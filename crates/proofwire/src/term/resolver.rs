// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global variable resolution
//!
//! The only external state a decode depends on. Implementations are backed
//! by whatever store owns the statements; [`InMemoryResolver`] covers tests
//! and small embedders.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::GlobalVariable;

/// Resolves a 128-bit identifier to a global variable.
///
/// Called synchronously during decode. `None` aborts the decode with
/// `DecodeError::UnresolvedVariable`; the codec never retries.
pub trait VariableResolver: Send + Sync {
    fn resolve(&self, id: &Uuid) -> Option<Arc<GlobalVariable>>;
}

impl VariableResolver for HashMap<Uuid, Arc<GlobalVariable>> {
    fn resolve(&self, id: &Uuid) -> Option<Arc<GlobalVariable>> {
        self.get(id).cloned()
    }
}

/// Thread-safe in-memory resolver.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    variables: RwLock<HashMap<Uuid, Arc<GlobalVariable>>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `variable`, replacing any previous entry with the same id.
    pub fn insert(&self, variable: Arc<GlobalVariable>) {
        self.variables.write().insert(variable.id(), variable);
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<GlobalVariable>> {
        self.variables.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.variables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.read().is_empty()
    }
}

impl VariableResolver for InMemoryResolver {
    fn resolve(&self, id: &Uuid) -> Option<Arc<GlobalVariable>> {
        self.variables.read().get(id).cloned()
    }
}

impl FromIterator<Arc<GlobalVariable>> for InMemoryResolver {
    fn from_iter<I: IntoIterator<Item = Arc<GlobalVariable>>>(iter: I) -> Self {
        let resolver = Self::new();
        for variable in iter {
            resolver.insert(variable);
        }
        resolver
    }
}
