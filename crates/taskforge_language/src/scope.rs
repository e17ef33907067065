//! Lexical scopes.
//!
//! Scopes live in an arena and point at their parent by index, so the scope
//! structure is always a tree rooted at the global scope. Lookup walks from a
//! scope up through its parents; the first match wins.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::symbol::Symbol;

/// Handle to a scope in a [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The global scope.
    pub const GLOBAL: Self = Self(0);
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<Arc<str>, Symbol>,
    order: Vec<Arc<str>>,
}

/// A saved state of a [`ScopeTree`] that can be restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    scopes: usize,
    globals: usize,
}

/// Arena of scopes with a distinguished global scope.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a tree containing only an empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Creates a child scope of `parent`.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        trace!(scope = id.0, parent = parent.0, "created scope");
        id
    }

    /// Returns the parent of a scope. The global scope has none.
    #[must_use]
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0).and_then(|s| s.parent)
    }

    /// Binds a name in a scope.
    ///
    /// # Errors
    /// Gives the symbol back if the name is already bound in that same scope.
    /// Shadowing a name from an outer scope is allowed.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: impl Into<Arc<str>>,
        symbol: Symbol,
    ) -> Result<(), Symbol> {
        let name = name.into();
        let Some(target) = self.scopes.get_mut(scope.0) else {
            return Err(symbol);
        };
        if target.symbols.contains_key(&name) {
            return Err(symbol);
        }
        target.order.push(name.clone());
        target.symbols.insert(name, symbol);
        Ok(())
    }

    /// Resolves a name from `scope` outwards.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id.0)?;
            if let Some(symbol) = s.symbols.get(name) {
                return Some(symbol);
            }
            current = s.parent;
        }
        None
    }

    /// Resolves a name in `scope` only.
    #[must_use]
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes.get(scope.0)?.symbols.get(name)
    }

    /// Iterates over a scope's bindings in declaration order.
    pub fn symbols(&self, scope: ScopeId) -> impl Iterator<Item = (&Arc<str>, &Symbol)> {
        self.scopes.get(scope.0).into_iter().flat_map(|s| {
            s.order
                .iter()
                .filter_map(move |name| s.symbols.get(name).map(|sym| (name, sym)))
        })
    }

    /// Drops every scope created after the arena held `len` scopes.
    ///
    /// Global bindings are kept. Handles to dropped scopes must not be used
    /// again.
    pub fn truncate(&mut self, len: usize) {
        let len = len.max(1);
        if len < self.scopes.len() {
            trace!(from = self.scopes.len(), to = len, "released scopes");
            self.scopes.truncate(len);
        }
    }

    /// Records the current state.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            scopes: self.scopes.len(),
            globals: self.scopes[0].order.len(),
        }
    }

    /// Discards every scope and global binding created since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.scopes.truncate(checkpoint.scopes.max(1));
        let global = &mut self.scopes[0];
        for name in global.order.drain(checkpoint.globals..) {
            global.symbols.remove(&name);
        }
    }

    /// Number of scopes, including the global scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false; the global scope exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
