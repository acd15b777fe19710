//! Named, addressable entities produced by the resolver: definitions and
//! local bindings alike share the one [`Symbol`] shape so environment
//! lookup never needs to distinguish "a function" from "a local" until a
//! caller inspects `variant`.

use kieli_common::arena::Id;
use kieli_common::interner::StringId;
use kieli_common::span::Range;

use crate::ty::Type;

/// `Copy` handle into a document's `Symbol` arena.
pub type SymbolId = Id<Symbol>;

/// A named entity: a top-level definition or a binding introduced inside a
/// function body. `use_count` is incremented by the resolver every time a
/// reference resolves to this symbol, backing the "unused local variable"
/// warning and the invariant that `use_count` equals the number of
/// resolver-produced references.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: StringId,
    pub range: Range,
    pub variant: SymbolVariant,
    pub use_count: u32,
}

impl Symbol {
    pub fn new(name: StringId, range: Range, variant: SymbolVariant) -> Self {
        Self { name, range, variant, use_count: 0 }
    }
}

#[derive(Debug, Clone)]
pub enum SymbolVariant {
    Function { ty: Type },
    Structure { ty: Type },
    Enumeration { ty: Type },
    /// An enum variant or tuple-struct constructor, callable as a function
    /// from payload types to the owning structure/enumeration's type.
    Constructor { ty: Type, owner: SymbolId },
    Field { ty: Type, owner: SymbolId },
    Concept,
    Alias { aliased: Type },
    Module,
    LocalVariable { ty: Type },
    LocalMutability { ty: Type, is_mut: bool },
    LocalType { aliased: Type },
    /// Substituted in place of a symbol that failed to resolve, so a
    /// reference to it still has something to look up instead of the
    /// resolver substituting `None` and propagating an `Option` everywhere.
    Error,
}
