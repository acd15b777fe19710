//! Resolved, fully typed intermediate representation for Kieli.
//!
//! This is the shape `kieli-resolver` produces: types and mutabilities live
//! in arenas addressed by `Copy` handles (no cyclic owning pointers), every
//! named entity is a [`symbol::Symbol`] regardless of whether it is a
//! top-level definition or a local binding, and [`env::Environment`]s form a
//! parent-linked chain rather than a borrowed scope stack, so a symbol table
//! built while resolving one function can outlive the borrow that built it.

pub mod display;
pub mod env;
pub mod symbol;
pub mod ty;

pub use display::render_type;
pub use env::{EnvArena, EnvId, Environment};
pub use symbol::{Symbol, SymbolId, SymbolVariant};
pub use ty::{Mutability, MutVar, Primitive, Type, TypeArena, TypeVar, TypeVariant, INTEGRAL_PRIMITIVES};
