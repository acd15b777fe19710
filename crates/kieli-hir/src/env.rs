//! Lexical environments: a parent-linked chain of scopes mapping names to
//! symbols, addressed by arena handle rather than owned reference so a
//! closure or a deferred method-lookup can hold an `EnvId` without
//! borrowing the arena.

use kieli_common::arena::{Arena, Id};
use kieli_common::interner::StringId;
use rustc_hash::FxHashMap;

use crate::symbol::SymbolId;

pub type EnvId = Id<Environment>;

#[derive(Debug, Default)]
pub struct Environment {
    pub parent: Option<EnvId>,
    pub bindings: FxHashMap<StringId, SymbolId>,
}

/// The arena of every environment created while resolving one document,
/// plus the root (global) environment's id for convenience.
#[derive(Debug)]
pub struct EnvArena {
    arena: Arena<Environment>,
    root: EnvId,
}

impl EnvArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Environment::default());
        Self { arena, root }
    }

    pub fn root(&self) -> EnvId {
        self.root
    }

    /// Create a new child scope of `parent`, e.g. entering a function body
    /// or a block.
    pub fn child(&mut self, parent: EnvId) -> EnvId {
        self.arena.alloc(Environment { parent: Some(parent), bindings: FxHashMap::default() })
    }

    pub fn bind(&mut self, env: EnvId, name: StringId, symbol: SymbolId) {
        self.arena.get_mut(env).bindings.insert(name, symbol);
    }

    /// Walk `env`'s parent chain looking for `name`, innermost scope first.
    pub fn lookup(&self, env: EnvId, name: StringId) -> Option<SymbolId> {
        let mut current = Some(env);
        while let Some(id) = current {
            let scope = self.arena.get(id);
            if let Some(&symbol) = scope.bindings.get(&name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for EnvArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Symbol, SymbolVariant};
    use crate::ty::{Type, TypeArena, TypeVariant, Primitive};
    use kieli_common::interner::StringInterner;
    use kieli_common::span::{Position, Range};

    fn dummy_range() -> Range {
        Range::new(Position { line: 0, column: 0 }, Position { line: 0, column: 1 })
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut interner = StringInterner::new();
        let mut envs = EnvArena::new();
        let root = envs.root();
        let x = interner.intern("x");

        let mut types = TypeArena::new();
        let ty: Type = types.alloc(TypeVariant::Primitive(Primitive::I32));
        let mut symbols: Arena<Symbol> = Arena::new();
        let fake_symbol: SymbolId =
            symbols.alloc(Symbol::new(x, dummy_range(), SymbolVariant::LocalVariable { ty }));
        envs.bind(root, x, fake_symbol);

        let child = envs.child(root);
        assert_eq!(envs.lookup(child, x), Some(fake_symbol));
    }

    #[test]
    fn lookup_misses_return_none() {
        let mut interner = StringInterner::new();
        let envs = EnvArena::new();
        let root = envs.root();
        let y = interner.intern("y");
        assert_eq!(envs.lookup(root, y), None);
    }
}
