//! Scope tree and symbol tables
//!
//! Scopes form a tree, not a stack: a scope that has been exited stays
//! addressable, because symbol updates issued later in the walk (for
//! example finishing a function's parameter list after its body scope
//! closed) must still find entries along the chain. The tree is backed
//! by an arena owned by the [`ScopeManager`]; scopes refer to each
//! other by [`ScopeId`] index, parent links are never used to mutate a
//! parent's own fields.

use super::entity::{DeclaredEntity, EntityKind};
use std::collections::HashMap;
use tracing::debug;

/// A declared name paired with what it denotes
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub entity: DeclaredEntity,
}

impl Symbol {
    pub fn new(name: impl Into<String>, entity: DeclaredEntity) -> Self {
        Self {
            name: name.into(),
            entity,
        }
    }
}

/// Name-to-symbol mapping for exactly one scope
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol; names are unique per table
    pub fn add(&mut self, symbol: Symbol) -> Result<(), String> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(format!(
                "{} '{}' already declared in this scope",
                symbol.entity.kind(),
                symbol.name
            ));
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look up a symbol, optionally requiring a declared-entity kind.
    /// A symbol whose kind fails the filter is invisible.
    pub fn lookup(&self, name: &str, kind: Option<EntityKind>) -> Option<&Symbol> {
        self.symbols
            .get(name)
            .filter(|sym| kind.is_none_or(|k| sym.entity.kind() == k))
    }

    pub fn lookup_mut(&mut self, name: &str, kind: Option<EntityKind>) -> Option<&mut Symbol> {
        self.symbols
            .get_mut(name)
            .filter(|sym| kind.is_none_or(|k| sym.entity.kind() == k))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Replace the entity stored under `name`, keeping the name
    fn replace(&mut self, name: &str, entity: DeclaredEntity) {
        self.symbols.insert(name.to_string(), Symbol::new(name, entity));
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Index of a scope in the manager's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// One lexical scope: a label, its symbol table, and its position in
/// the tree
#[derive(Debug)]
pub struct Scope {
    label: String,
    level: usize,
    table: SymbolTable,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

impl Scope {
    fn new(label: impl Into<String>, level: usize, parent: Option<ScopeId>) -> Self {
        Self {
            label: label.into(),
            level,
            table: SymbolTable::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }
}

/// Cursor over the scope tree.
///
/// Tracks the current scope during a walk and forwards symbol
/// operations to the current chain. The global scope is created at
/// construction and is never exited.
#[derive(Debug)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeManager {
    pub fn new() -> Self {
        let global = Scope::new("global", 0, None);
        Self {
            scopes: vec![global],
            current: ScopeId(0),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn current_label(&self) -> &str {
        self.scope(self.current).label()
    }

    /// Depth of the current scope; the global scope is level 0
    pub fn depth(&self) -> usize {
        self.scope(self.current).level()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Create a child of the current scope and make it current
    pub fn enter_scope(&mut self, label: &str) -> ScopeId {
        let level = self.depth() + 1;
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(label, level, Some(self.current)));
        self.scopes[self.current.0].children.push(id);
        self.current = id;
        debug!(scope = label, level, "entered scope");
        id
    }

    /// Move the cursor back to the parent scope; exiting the global
    /// scope is a no-op
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scope(self.current).parent() {
            debug!(scope = self.current_label(), "exited scope");
            self.current = parent;
        }
    }

    /// Add a symbol to the current scope's table
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<(), String> {
        self.scopes[self.current.0].table.add(symbol)
    }

    /// Search the current scope, then each ancestor up to the root,
    /// for the first symbol passing the kind filter
    pub fn lookup(&self, name: &str, kind: Option<EntityKind>) -> Option<&Symbol> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if let Some(symbol) = scope.table.lookup(name, kind) {
                return Some(symbol);
            }
            cursor = scope.parent();
        }
        None
    }

    /// Like [`lookup`](Self::lookup) but restricted to the current
    /// scope's own table; used for redeclaration checks
    pub fn lookup_local(&self, name: &str, kind: Option<EntityKind>) -> Option<&Symbol> {
        self.scope(self.current).table.lookup(name, kind)
    }

    /// Mutable chain lookup, for in-place type binding
    pub fn lookup_mut(&mut self, name: &str, kind: Option<EntityKind>) -> Option<&mut Symbol> {
        let mut cursor = Some(self.current);
        let mut found = None;
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if scope.table.lookup(name, kind).is_some() {
                found = Some(id);
                break;
            }
            cursor = scope.parent();
        }
        let id = found?;
        self.scopes[id.0].table.lookup_mut(name, kind)
    }

    /// Replace the entity stored for `name` in the first scope along
    /// the chain that holds it with a matching kind. Scopes holding
    /// the name under a different kind are skipped and the walk
    /// continues outward.
    pub fn update_symbol(
        &mut self,
        name: &str,
        entity: DeclaredEntity,
        kind: Option<EntityKind>,
    ) -> Result<(), String> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if scope.table.contains(name) && scope.table.lookup(name, kind).is_some() {
                self.scopes[id.0].table.replace(name, entity);
                return Ok(());
            }
            cursor = scope.parent();
        }
        Err(format!(
            "symbol '{}' not found in any accessible scope for update",
            name
        ))
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}
