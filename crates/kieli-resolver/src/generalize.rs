//! Generalization: once a function's body has been fully resolved, any
//! unification variable its signature still carries did not get pinned to a
//! concrete type by anything in the body, meaning the function is generic
//! over it. Those variables are replaced by fresh implicit template
//! parameters so later call sites instantiate them independently rather
//! than sharing one arena-wide solution.
//!
//! Struct, enum, and alias definitions are never generalized this way: a
//! field or alias target left unsolved after its own signature resolves is
//! a genuine error, not an implicit generic parameter.

use kieli_common::span::Span;
use kieli_hir::{SymbolId, Type, TypeVariant};

use crate::context::Context;
use kieli_diagnostics::codes;

/// Deep-resolve `fn_id`'s signature and replace every still-unsolved
/// unification variable with a fresh `TemplateParameterReference`, writing
/// the generalized type back onto the symbol.
pub fn generalize_function(ctx: &mut Context<'_>, fn_id: SymbolId) {
    let fn_ty = match ctx.symbols.get(fn_id).variant.clone() {
        kieli_hir::SymbolVariant::Function { ty } => ty,
        _ => return,
    };
    let resolved = ctx.infer.deep_resolve(&mut ctx.types, fn_ty);
    let mut next_index: u32 = 0;
    let generalized = generalize_type(ctx, resolved, &mut next_index);
    ctx.symbols.get_mut(fn_id).variant = kieli_hir::SymbolVariant::Function { ty: generalized };
}

fn generalize_type(ctx: &mut Context<'_>, ty: Type, next_index: &mut u32) -> Type {
    let variant = ctx.types.get(ty).clone();
    let rebuilt = match variant {
        TypeVariant::UnificationVariable(_) | TypeVariant::IntegralUnificationVariable(_) => {
            let name = format!("__implicit{next_index}");
            *next_index += 1;
            let name_id = ctx.strings.intern(&name);
            TypeVariant::TemplateParameterReference(name_id)
        }
        TypeVariant::Tuple(elements) => {
            TypeVariant::Tuple(elements.iter().map(|&e| generalize_type(ctx, e, next_index)).collect())
        }
        TypeVariant::Array { element, length } => {
            TypeVariant::Array { element: generalize_type(ctx, element, next_index), length }
        }
        TypeVariant::Slice(element) => TypeVariant::Slice(generalize_type(ctx, element, next_index)),
        TypeVariant::Function { params, ret } => TypeVariant::Function {
            params: params.iter().map(|&p| generalize_type(ctx, p, next_index)).collect(),
            ret: generalize_type(ctx, ret, next_index),
        },
        TypeVariant::Reference { mutability, referent } => {
            TypeVariant::Reference { mutability, referent: generalize_type(ctx, referent, next_index) }
        }
        TypeVariant::Pointer { mutability, pointee } => {
            TypeVariant::Pointer { mutability, pointee: generalize_type(ctx, pointee, next_index) }
        }
        TypeVariant::Structure { id, arguments, is_template_application } => TypeVariant::Structure {
            id,
            arguments: arguments.iter().map(|&a| generalize_type(ctx, a, next_index)).collect(),
            is_template_application,
        },
        TypeVariant::Enumeration { id, arguments, is_template_application } => TypeVariant::Enumeration {
            id,
            arguments: arguments.iter().map(|&a| generalize_type(ctx, a, next_index)).collect(),
            is_template_application,
        },
        other => other,
    };
    ctx.types.alloc(rebuilt)
}

fn has_unsolved(ctx: &mut Context<'_>, ty: Type) -> bool {
    let ty = ctx.infer.shallow_resolve(&ctx.types, ty);
    if ctx.infer.is_unsolved(&ctx.types, ty) {
        return true;
    }
    match ctx.types.get(ty).clone() {
        TypeVariant::Tuple(elements) => elements.iter().any(|&e| has_unsolved(ctx, e)),
        TypeVariant::Array { element, .. } | TypeVariant::Slice(element) => has_unsolved(ctx, element),
        TypeVariant::Function { params, ret } => {
            params.iter().any(|&p| has_unsolved(ctx, p)) || has_unsolved(ctx, ret)
        }
        TypeVariant::Reference { referent, .. } => has_unsolved(ctx, referent),
        TypeVariant::Pointer { pointee, .. } => has_unsolved(ctx, pointee),
        TypeVariant::Structure { arguments, .. } | TypeVariant::Enumeration { arguments, .. } => {
            arguments.iter().any(|&a| has_unsolved(ctx, a))
        }
        _ => false,
    }
}

/// A struct field, enum variant payload, or alias target that still
/// contains an unsolved variable once its own definition has resolved is a
/// hard error: unlike a function signature, there is no body to generalize
/// over and no call site to deduce it from.
pub fn check_no_unsolved(ctx: &mut Context<'_>, ty: Type, span: Span) {
    if has_unsolved(ctx, ty) {
        ctx.error(
            span,
            codes::semantic::UNSOLVED_VARIABLE_IN_TOP_LEVEL_DEFINITION,
            "this definition leaves a type variable unsolved",
        );
    }
}
