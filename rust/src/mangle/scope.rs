use std::ops::{Index, IndexMut};

use ahash::AHashMap;
use ahash::AHashSet;

use crate::source::SourceRange;

pub type Identifier = SourceRange;

#[derive(Clone, Debug, Default)]
pub struct Symbol {
    // Exported bindings keep their names, as other modules refer to them.
    pub exported: bool,
    // Set by name assignment. None if the binding keeps its original name.
    pub minified_name: Option<Identifier>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeType {
    // Function, arrow function, method, or the top level.
    Closure,
    Block,
}

#[derive(Debug)]
pub struct ScopeData {
    id: ScopeId,
    symbols: AHashMap<Identifier, Symbol>,
    // For deterministic outputs.
    symbol_declaration_order: Vec<Identifier>,
    // Variables that are declared by an ancestor (not own) scope (or not declared anywhere and
    // assumed to be global), and used by code in own or any descendant scope.
    pub inherited_vars: AHashSet<Identifier>,
    // Set if code in this scope calls `eval` directly or uses `with`, so any name in scope could be
    // looked up by its original spelling.
    pub uses_dynamic_lookup: bool,
    // Set on scopes whose bindings must keep their names.
    pub fixed: bool,
    // Does not exist for top-level.
    parent: Option<ScopeId>,
    typ: ScopeType,
}

impl ScopeData {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn typ(&self) -> ScopeType {
        self.typ
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn add_symbol(&mut self, identifier: Identifier, exported: bool) -> () {
        match self.symbols.get_mut(&identifier) {
            // Many production codebases redeclare `var`.
            Some(existing) => existing.exported |= exported,
            None => {
                self.symbols.insert(identifier.clone(), Symbol {
                    exported,
                    minified_name: None,
                });
                self.symbol_declaration_order.push(identifier);
            }
        };
    }

    pub fn get_symbol(&self, identifier: &Identifier) -> Option<&Symbol> {
        self.symbols.get(identifier)
    }

    pub fn get_symbol_mut(&mut self, identifier: &Identifier) -> Option<&mut Symbol> {
        self.symbols.get_mut(identifier)
    }

    pub fn symbol_names(&self) -> &[Identifier] {
        &self.symbol_declaration_order
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// All scopes of a program, in the order their nodes are first reached. A parent always precedes
/// its children.
#[derive(Debug, Default)]
pub struct ScopeMap {
    scopes: Vec<ScopeData>,
}

impl ScopeMap {
    pub fn new() -> ScopeMap {
        ScopeMap { scopes: Vec::new() }
    }

    pub fn create_scope(&mut self, parent: Option<ScopeId>, typ: ScopeType) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeData {
            id,
            symbols: AHashMap::new(),
            symbol_declaration_order: Vec::new(),
            inherited_vars: AHashSet::new(),
            uses_dynamic_lookup: false,
            fixed: false,
            parent,
            typ,
        });
        id
    }

    /// The ID the `n`th created scope has, for walks that revisit scopes in creation order.
    pub fn nth(&self, n: usize) -> Option<ScopeId> {
        if n < self.scopes.len() {
            Some(ScopeId(n))
        } else {
            None
        }
    }

    /// The scope declaring `identifier` as seen from `scope`, if any.
    pub fn find_declaring_scope(&self, scope: ScopeId, identifier: &Identifier) -> Option<ScopeId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if self[id].symbols.contains_key(identifier) {
                return Some(id);
            };
            cur = self[id].parent;
        }
        None
    }

    pub fn find_symbol(&self, scope: ScopeId, identifier: &Identifier) -> Option<&Symbol> {
        self.find_declaring_scope(scope, identifier)
            .and_then(|id| self[id].get_symbol(identifier))
    }

    /// Records that `name` is used from `scope`: every scope from `scope` up to (excluding) the
    /// declaring one inherits it.
    pub fn track_variable_usage(&mut self, scope: ScopeId, name: &Identifier) -> () {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if self[id].symbols.contains_key(name) {
                break;
            };
            self[id].inherited_vars.insert(name.clone());
            cur = self[id].parent;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeData> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }
}

impl Index<ScopeId> for ScopeMap {
    type Output = ScopeData;

    fn index(&self, index: ScopeId) -> &Self::Output {
        &self.scopes[index.0]
    }
}

impl IndexMut<ScopeId> for ScopeMap {
    fn index_mut(&mut self, index: ScopeId) -> &mut Self::Output {
        &mut self.scopes[index.0]
    }
}
