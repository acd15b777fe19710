//! Method lookup: `e.m(...)` resolves against `e`'s type's associated
//! namespace, the set of methods registered by `impl` blocks targeting that
//! exact type. Tuples, primitives, and references have no associated
//! namespace of their own unless an `impl` block exists for that exact
//! shape.

use kieli_common::interner::StringId;
use kieli_hir::{SymbolId, Type, TypeVariant};

use crate::context::Context;

/// The definition symbol a type's associated namespace is keyed on, or
/// `None` if the type (a tuple, a reference, a primitive with no impl) has
/// no namespace of its own.
pub fn namespace_owner(ctx: &mut Context<'_>, ty: Type) -> Option<SymbolId> {
    let ty = ctx.infer.shallow_resolve(&ctx.types, ty);
    match ctx.types.get(ty) {
        TypeVariant::Structure { id, .. } => Some(*id),
        TypeVariant::Enumeration { id, .. } => Some(*id),
        TypeVariant::Reference { referent, .. } => namespace_owner(ctx, *referent),
        _ => None,
    }
}

/// Register one `impl` block's methods against `owner`'s associated
/// namespace. Later impls for the same owner extend the same table;
/// re-declaring a method name is left for the declare pass to flag as a
/// duplicate-name error the way any other name collision is.
pub fn register_method(ctx: &mut Context<'_>, owner: SymbolId, name: StringId, method: SymbolId) {
    ctx.methods.entry(owner).or_default().insert(name, method);
}

/// Look up `name` in `receiver_ty`'s associated namespace.
pub fn lookup_method(ctx: &mut Context<'_>, receiver_ty: Type, name: StringId) -> Option<SymbolId> {
    let owner = namespace_owner(ctx, receiver_ty)?;
    ctx.methods.get(&owner).and_then(|table| table.get(&name)).copied()
}

/// Synthesize the receiver type a method's `self`/`&self`/`&mut self`
/// parameter expects, given the method's declared self-parameter shape and
/// the owning type. A `&mut self` method called through a shared
/// reference is a mutability-coercion failure the caller reports as a
/// mutability violation, not a missing method.
pub fn self_parameter_type(
    ctx: &mut Context<'_>,
    owner_ty: Type,
    self_param: &kieli_ast::item::SelfParam,
) -> Type {
    if !self_param.is_reference {
        return owner_ty;
    }
    let mutability = kieli_hir::Mutability::Concrete(self_param.is_mut);
    ctx.types.alloc(TypeVariant::Reference { mutability, referent: owner_ty })
}
