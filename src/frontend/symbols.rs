//! Scope tree and symbol table.
//!
//! Scopes live in one arena vector and point at their parent by index,
//! so the whole tree is cheap to clone and serialize. Symbols live in a
//! second vector in declaration order, which fixes the order of the
//! boundary symbol listing.

use crate::frontend::ast::Type;
use crate::utils::location::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a scope in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub usize);

/// The construct a scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// File level
    Global,
    /// A class body
    Class,
    /// A method body, parameters included
    Method,
    /// A brace block or loop body
    Block,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Class => write!(f, "class"),
            ScopeKind::Method => write!(f, "method"),
            ScopeKind::Block => write!(f, "block"),
        }
    }
}

/// Assignment state of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolStatus {
    /// Declared, no value assigned yet
    Declared,
    /// At least one assignment seen
    Assigned,
}

impl fmt::Display for SymbolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolStatus::Declared => write!(f, "Declared"),
            SymbolStatus::Assigned => write!(f, "Assigned"),
        }
    }
}

/// One declared name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Declared name
    pub name: String,
    /// Declared or inferred type
    pub ty: Type,
    /// Owning scope
    pub scope: ScopeId,
    /// Kind of the owning scope
    pub scope_kind: ScopeKind,
    /// Assignment state
    pub status: SymbolStatus,
    /// Declaration site
    pub span: Span,
}

/// One scope in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    /// Kind of construct this scope belongs to
    pub kind: ScopeKind,
    /// Label for the listing, e.g. `global` or `class Persona`
    pub label: String,
    /// Parent scope; `None` for the global scope
    pub parent: Option<ScopeId>,
    /// Name to symbol index within this scope
    names: HashMap<String, usize>,
}

/// The scope tree plus all declared symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTree {
    /// Create a tree holding only the global scope.
    pub fn new() -> Self {
        let global = Scope {
            kind: ScopeKind::Global,
            label: "global".to_string(),
            parent: None,
            names: HashMap::new(),
        };
        Self { scopes: vec![global], symbols: Vec::new() }
    }

    /// The global scope.
    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a child scope under `parent`.
    pub fn push_scope(&mut self, kind: ScopeKind, label: impl Into<String>, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            label: label.into(),
            parent: Some(parent),
            names: HashMap::new(),
        });
        id
    }

    /// Declare `name` in `scope`. Returns the new symbol's index, or
    /// the existing symbol's index as an error when the name is already
    /// declared in that same scope.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: Type,
        status: SymbolStatus,
        span: Span,
    ) -> Result<usize, usize> {
        if let Some(&existing) = self.scopes[scope.0].names.get(name) {
            return Err(existing);
        }
        let index = self.symbols.len();
        self.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            scope,
            scope_kind: self.scopes[scope.0].kind,
            status,
            span,
        });
        self.scopes[scope.0].names.insert(name.to_string(), index);
        Ok(index)
    }

    /// Find `name` starting at `scope` and walking parents outward.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<usize> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&index) = self.scopes[id.0].names.get(name) {
                return Some(index);
            }
            current = self.scopes[id.0].parent;
        }
        None
    }

    /// Find `name` in `scope` alone, ignoring parents.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<usize> {
        self.scopes[scope.0].names.get(name).copied()
    }

    /// Symbol by index.
    pub fn symbol(&self, index: usize) -> &Symbol {
        &self.symbols[index]
    }

    /// Mark a symbol assigned. Idempotent; never reverts to declared.
    pub fn assign(&mut self, index: usize) {
        self.symbols[index].status = SymbolStatus::Assigned;
    }

    /// Set a symbol's type, used when a `var` initializer resolves.
    pub fn set_type(&mut self, index: usize, ty: Type) {
        self.symbols[index].ty = ty;
    }

    /// Scope by id.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// All symbols, in declaration order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All scopes, global first.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Number of declared symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbol has been declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::dummy()
    }

    #[test]
    fn test_declare_and_lookup() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let index = tree
            .declare(global, "cantidad", Type::Int, SymbolStatus::Assigned, span())
            .unwrap();
        assert_eq!(tree.lookup(global, "cantidad"), Some(index));
        assert_eq!(tree.lookup(global, "precio"), None);
    }

    #[test]
    fn test_duplicate_in_same_scope_rejected() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let first = tree
            .declare(global, "edad", Type::Int, SymbolStatus::Declared, span())
            .unwrap();
        let err = tree
            .declare(global, "edad", Type::Double, SymbolStatus::Declared, span())
            .unwrap_err();
        assert_eq!(err, first);
        // the first declaration wins
        assert_eq!(tree.symbol(first).ty, Type::Int);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_shadowing_in_child_scope_allowed() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let outer = tree
            .declare(global, "x", Type::Int, SymbolStatus::Assigned, span())
            .unwrap();
        let block = tree.push_scope(ScopeKind::Block, "block", global);
        let inner = tree
            .declare(block, "x", Type::Double, SymbolStatus::Assigned, span())
            .unwrap();
        assert_ne!(outer, inner);
        assert_eq!(tree.lookup(block, "x"), Some(inner));
        assert_eq!(tree.lookup(global, "x"), Some(outer));
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let index = tree
            .declare(global, "total", Type::Double, SymbolStatus::Assigned, span())
            .unwrap();
        let class = tree.push_scope(ScopeKind::Class, "class Persona", global);
        let method = tree.push_scope(ScopeKind::Method, "method Saludar", class);
        assert_eq!(tree.lookup(method, "total"), Some(index));
        assert_eq!(tree.lookup_local(method, "total"), None);
    }

    #[test]
    fn test_assign_is_forward_only() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        let index = tree
            .declare(global, "resultado", Type::Int, SymbolStatus::Declared, span())
            .unwrap();
        assert_eq!(tree.symbol(index).status, SymbolStatus::Declared);
        tree.assign(index);
        tree.assign(index);
        assert_eq!(tree.symbol(index).status, SymbolStatus::Assigned);
    }

    #[test]
    fn test_symbols_keep_declaration_order() {
        let mut tree = ScopeTree::new();
        let global = tree.global();
        for name in ["a", "b", "c"] {
            tree.declare(global, name, Type::Int, SymbolStatus::Declared, span())
                .unwrap();
        }
        let names: Vec<&str> = tree.symbols().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
