//! The resolved type representation: a `TypeVariant` arena addressed by
//! `Copy` handles, plus the mutability lattice that rides alongside every
//! reference and pointer type.
//!
//! Unlike `kieli-ast::Type` (one tree per written annotation), a `Type` here
//! is a handle into a single per-document arena, so structurally equal types
//! produced at different call sites can still be compared by id once
//! unification has run, and unification variables can be threaded through
//! the tree without an owning `Box`.

use kieli_common::arena::{Arena, Id};
use kieli_common::interner::StringId;

use crate::symbol::SymbolId;

/// A unification variable over the mutability lattice (`&T` vs `&mut T`).
/// Solved by the resolver's union-find table, kept alongside type variables
/// as its own domain since a mutability mismatch is a different kind of
/// error than a type mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutVar(pub u32);

impl ena::unify::UnifyKey for MutVar {
    type Value = Option<Mutability>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        MutVar(u)
    }

    fn tag() -> &'static str {
        "MutVar"
    }
}

impl ena::unify::EqUnifyValue for Mutability {}

/// Whether a reference or pointer is mutable. First-class rather than a
/// plain `bool` because a template's mutability parameter or an unresolved
/// unification variable both need to flow through the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// A concrete, already-known mutability.
    Concrete(bool),
    /// Bound to a mutability template parameter, identified by its name.
    Parameterized(StringId),
    /// Not yet solved; resolved through the mutability union-find table.
    Variable(MutVar),
}

/// A unification variable over the type lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVar(pub u32);

impl ena::unify::UnifyKey for TypeVar {
    type Value = Option<Type>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TypeVar(u)
    }

    fn tag() -> &'static str {
        "TypeVar"
    }
}

impl ena::unify::EqUnifyValue for Type {}

/// `Copy` handle into a document's `TypeVariant` arena. A newtype rather than
/// a bare alias so `ena`'s unification traits can be implemented on it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type(pub Id<TypeVariant>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Float,
    Char,
    Bool,
    String,
}

/// The integral kinds an unconstrained integer literal can be solved to.
pub const INTEGRAL_PRIMITIVES: &[Primitive] = &[
    Primitive::I8,
    Primitive::I16,
    Primitive::I32,
    Primitive::I64,
    Primitive::U8,
    Primitive::U16,
    Primitive::U32,
    Primitive::U64,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeVariant {
    Primitive(Primitive),
    /// An integer literal's type before it is pinned to a concrete
    /// primitive; solvable to any member of [`INTEGRAL_PRIMITIVES`].
    IntegralUnificationVariable(TypeVar),
    Tuple(Vec<Type>),
    Array { element: Type, length: u64 },
    Slice(Type),
    Function { params: Vec<Type>, ret: Type },
    Reference { mutability: Mutability, referent: Type },
    Pointer { mutability: Mutability, pointee: Type },
    /// `id` names the `struct` definition; `is_template_application` is true
    /// once template arguments have been substituted into an instantiation
    /// rather than left as the template's own bound parameters.
    Structure { id: SymbolId, arguments: Vec<Type>, is_template_application: bool },
    Enumeration { id: SymbolId, arguments: Vec<Type>, is_template_application: bool },
    UnificationVariable(TypeVar),
    /// A reference to a template parameter of the enclosing definition,
    /// identified by the parameter's interned name.
    TemplateParameterReference(StringId),
    /// `Self` inside a `concept`/`impl` body, before the implementing type
    /// is substituted in.
    SelfPlaceholder,
    /// Substituted for a type that failed to resolve, so later inference
    /// still has something to unify against instead of aborting.
    Error,
}

/// The arena backing every `Type` handle produced while resolving one
/// document. One `TypeArena` is created per compilation and discarded with
/// the document's other per-revision state.
#[derive(Debug, Default)]
pub struct TypeArena {
    arena: Arena<TypeVariant>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self { arena: Arena::new() }
    }

    pub fn alloc(&mut self, variant: TypeVariant) -> Type {
        Type(self.arena.alloc(variant))
    }

    pub fn get(&self, ty: Type) -> &TypeVariant {
        self.arena.get(ty.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_get_round_trips() {
        let mut arena = TypeArena::new();
        let i32_ty = arena.alloc(TypeVariant::Primitive(Primitive::I32));
        assert_eq!(*arena.get(i32_ty), TypeVariant::Primitive(Primitive::I32));
    }

    #[test]
    fn distinct_allocations_get_distinct_ids() {
        let mut arena = TypeArena::new();
        let a = arena.alloc(TypeVariant::Primitive(Primitive::I32));
        let b = arena.alloc(TypeVariant::Primitive(Primitive::Bool));
        assert_ne!(a, b);
    }
}
