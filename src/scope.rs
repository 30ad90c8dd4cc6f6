use std::collections::HashMap;
use crate::{
    binding::{Binding, BindingId, BindingKind},
    syntax::SyntaxNode,
};

/// Bindings tracked for one function or closure body
///
/// A scope is built fresh for every analyzed body and never merged with
/// another one.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<BindingId, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the declaration `node`. The `_` placeholder is never tracked.
    pub fn insert(&mut self, node: &SyntaxNode, kind: BindingKind) {
        if let Some(binding) = Binding::new(node, kind) {
            if binding.name != "_" {
                self.bindings.insert(binding.id.clone(), binding);
            }
        }
    }

    /// No-op for bindings declared outside this scope
    pub fn mark_used(&mut self, id: &BindingId) {
        if let Some(binding) = self.bindings.get_mut(id) {
            binding.mark_used();
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    pub fn unused(&self) -> impl Iterator<Item = &Binding> {
        self.bindings()
            .filter(|binding| !binding.is_used())
    }
}
