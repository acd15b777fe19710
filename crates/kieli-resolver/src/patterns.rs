//! Pattern resolution: type each pattern, bind its names into the current
//! environment, and lower it into the constructor-tree shape the
//! exhaustiveness checker (`crate::exhaustiveness`) consumes.

use kieli_ast::pat::{Pattern, PatternKind, StructCtorField};
use kieli_common::span::Span;
use kieli_hir::{EnvId, Symbol, SymbolVariant, Type, TypeVariant};

use crate::context::Context;
use crate::exhaustiveness::{CtorKey, PatCtor, SimplePat};
use kieli_diagnostics::codes;

/// Resolve one pattern against an (optional) expected type, binding any
/// names it introduces into `env`. Returns the pattern's type and whether
/// it is exhaustive all on its own (a `let`/parameter position requires
/// this to be `true`; a `match` arm does not).
pub fn resolve_pattern(ctx: &mut Context<'_>, pattern: &Pattern, expected: Option<Type>, env: EnvId) -> (Type, bool) {
    match &pattern.kind {
        PatternKind::Wildcard => (expected_or_fresh(ctx, expected), true),
        PatternKind::Error => (ctx.error_type(), true),
        PatternKind::Literal(lit) => {
            let ty = crate::exprs::literal_type(ctx, lit);
            if let Some(expected) = expected {
                let _ = ctx.infer.unify(&ctx.types, ty, expected);
            }
            (ty, false)
        }
        PatternKind::Name { name, is_mut } => {
            let ty = expected_or_fresh(ctx, expected);
            bind_name(ctx, name, *is_mut, ty, pattern.span, env);
            (ty, true)
        }
        PatternKind::Alias { inner, alias } => {
            let (ty, exhaustive) = resolve_pattern(ctx, inner, expected, env);
            bind_name(ctx, alias, false, ty, pattern.span, env);
            (ty, exhaustive)
        }
        PatternKind::Guarded { inner, guard } => {
            let (ty, _) = resolve_pattern(ctx, inner, expected, env);
            crate::exprs::resolve_expr(ctx, guard, env);
            // A guard can always reject a value the inner pattern would
            // otherwise accept, so a guarded pattern is never exhaustive
            // by itself.
            (ty, false)
        }
        PatternKind::Tuple(elements) => {
            let expected_elements = expected.and_then(|ty| match ctx.types.get(ty) {
                TypeVariant::Tuple(elements) => Some(elements.clone()),
                _ => None,
            });
            let mut element_tys = Vec::with_capacity(elements.len());
            let mut all_exhaustive = true;
            for (i, element) in elements.iter().enumerate() {
                let expected_element = expected_elements.as_ref().and_then(|e| e.get(i).copied());
                let (ty, exhaustive) = resolve_pattern(ctx, element, expected_element, env);
                all_exhaustive &= exhaustive;
                element_tys.push(ty);
            }
            let ty = ctx.types.alloc(TypeVariant::Tuple(element_tys));
            if let Some(expected) = expected {
                let _ = ctx.infer.unify(&ctx.types, ty, expected);
            }
            (ty, all_exhaustive)
        }
        PatternKind::Slice(elements) => {
            let element_expected = expected.and_then(|ty| match ctx.types.get(ty) {
                TypeVariant::Slice(element) => Some(*element),
                _ => None,
            });
            let mut unified_element = element_expected;
            for element in elements {
                let (ty, _) = resolve_pattern(ctx, element, unified_element, env);
                unified_element = Some(ty);
            }
            let element_ty = unified_element.unwrap_or_else(|| fresh(ctx));
            let ty = ctx.types.alloc(TypeVariant::Slice(element_ty));
            (ty, false)
        }
        PatternKind::UnitCtor(path) => resolve_constructor_pattern(ctx, path, &[], expected, pattern.span, env),
        PatternKind::TupleCtor { path, payload } => {
            resolve_constructor_pattern(ctx, path, payload, expected, pattern.span, env)
        }
        PatternKind::AbbreviatedCtor { name, payload } => {
            resolve_abbreviated_ctor(ctx, name, payload.as_deref(), expected, pattern.span, env)
        }
        PatternKind::StructCtor { path, fields } => resolve_struct_ctor(ctx, path, fields, expected, pattern.span, env),
    }
}

fn expected_or_fresh(ctx: &mut Context<'_>, expected: Option<Type>) -> Type {
    expected.unwrap_or_else(|| fresh(ctx))
}

fn fresh(ctx: &mut Context<'_>) -> Type {
    let var = ctx.infer.fresh_type_var();
    ctx.types.alloc(TypeVariant::UnificationVariable(var))
}

fn bind_name(ctx: &mut Context<'_>, name: &str, is_mut: bool, ty: Type, span: Span, env: EnvId) {
    let name_id = ctx.strings.intern(name);
    let range = ctx.range_of(span);
    let variant = if is_mut { SymbolVariant::LocalMutability { ty, is_mut: true } } else { SymbolVariant::LocalVariable { ty } };
    let symbol = ctx.symbols.alloc(Symbol::new(name_id, range, variant));
    ctx.envs.bind(env, name_id, symbol);
}

fn resolve_constructor_pattern(
    ctx: &mut Context<'_>,
    path: &kieli_ast::path::Path,
    payload: &[Pattern],
    expected: Option<Type>,
    span: Span,
    env: EnvId,
) -> (Type, bool) {
    let Some(ctor) = crate::namespace::resolve_path_symbol(ctx, path, env) else {
        return (ctx.error_type(), true);
    };
    let (owner_ty, param_tys) = constructor_shape(ctx, ctor);
    if let Some(expected) = expected {
        let _ = ctx.infer.unify(&ctx.types, owner_ty, expected);
    }
    if payload.len() != param_tys.len() {
        ctx.error(
            span,
            codes::ty::ARITY_MISMATCH,
            format!("constructor takes {} argument(s), found {}", param_tys.len(), payload.len()),
        );
    }
    for (i, sub) in payload.iter().enumerate() {
        let expected_sub = param_tys.get(i).copied();
        resolve_pattern(ctx, sub, expected_sub, env);
    }
    (owner_ty, false)
}

fn resolve_abbreviated_ctor(
    ctx: &mut Context<'_>,
    name: &str,
    payload: Option<&Pattern>,
    expected: Option<Type>,
    span: Span,
    env: EnvId,
) -> (Type, bool) {
    let Some(expected) = expected else {
        ctx.error(
            span,
            codes::name::ABBREVIATED_CTOR_WITHOUT_ENUM,
            "abbreviated constructor pattern used with non-enum/unsolved scrutinee type",
        );
        return (ctx.error_type(), true);
    };
    let resolved_scrutinee = ctx.infer.shallow_resolve(&ctx.types, expected);
    let owner_id = match ctx.types.get(resolved_scrutinee) {
        TypeVariant::Enumeration { id, .. } => Some(*id),
        _ => None,
    };
    let Some(owner_id) = owner_id else {
        ctx.error(
            span,
            codes::name::ABBREVIATED_CTOR_WITHOUT_ENUM,
            "abbreviated constructor pattern used with non-enum/unsolved scrutinee type",
        );
        return (ctx.error_type(), true);
    };
    let name_id = ctx.strings.intern(name);
    let Some(ctor) = ctx.enum_variant_ctors.get(&owner_id).and_then(|table| table.get(&name_id)).copied() else {
        ctx.error(span, codes::name::NAMESPACE_MISSING_MEMBER, format!("enum has no variant named '{name}'"));
        return (ctx.error_type(), true);
    };
    let (owner_ty, param_tys) = constructor_shape(ctx, ctor);
    let _ = ctx.infer.unify(&ctx.types, owner_ty, expected);
    match payload {
        Some(sub) => {
            let expected_sub = param_tys.first().copied();
            resolve_pattern(ctx, sub, expected_sub, env);
        }
        None if !param_tys.is_empty() => {
            ctx.error(span, codes::ty::ARITY_MISMATCH, "variant has a payload but none was given");
        }
        None => {}
    }
    (owner_ty, false)
}

fn resolve_struct_ctor(
    ctx: &mut Context<'_>,
    path: &kieli_ast::path::Path,
    fields: &[StructCtorField],
    expected: Option<Type>,
    span: Span,
    env: EnvId,
) -> (Type, bool) {
    let Some(owner) = crate::namespace::resolve_path_symbol(ctx, path, env) else {
        return (ctx.error_type(), true);
    };
    let owner_ty = match ctx.symbols.get(owner).variant.clone() {
        SymbolVariant::Structure { ty } | SymbolVariant::Enumeration { ty } | SymbolVariant::Constructor { ty, .. } => ty,
        _ => ctx.error_type(),
    };
    if let Some(expected) = expected {
        let _ = ctx.infer.unify(&ctx.types, owner_ty, expected);
    }
    let declared = ctx.record_fields.get(&owner).cloned().unwrap_or_default();
    for field in fields {
        let field_name = ctx.strings.intern(&field.name);
        let declared_ty = declared.iter().find(|(name, _)| *name == field_name).map(|(_, ty)| *ty);
        if declared_ty.is_none() {
            ctx.error(field.span, codes::ty::STRUCT_FIELD_UNKNOWN, format!("'{}' is not a field of this type", field.name));
        }
        match &field.pattern {
            Some(sub) => {
                resolve_pattern(ctx, sub, declared_ty, env);
            }
            None => bind_name(ctx, &field.name, false, declared_ty.unwrap_or_else(|| fresh(ctx)), field.span, env),
        }
    }
    (owner_ty, false)
}

/// `(owner type, payload parameter types)` for a constructor symbol,
/// unwrapping the `Function{params, ret}` shape a non-unit constructor's
/// type carries.
fn constructor_shape(ctx: &mut Context<'_>, ctor: kieli_hir::SymbolId) -> (Type, Vec<Type>) {
    let ty = match ctx.symbols.get(ctor).variant.clone() {
        SymbolVariant::Constructor { ty, .. } => ty,
        SymbolVariant::Structure { ty } | SymbolVariant::Enumeration { ty } => ty,
        _ => return (ctx.error_type(), Vec::new()),
    };
    match ctx.types.get(ty).clone() {
        TypeVariant::Function { params, ret } => (ret, params),
        _ => (ty, Vec::new()),
    }
}

/// Lower a resolved pattern into the constructor tree the exhaustiveness
/// checker matches against. Guards and aliases are stripped (a guard's
/// effect on completeness is handled by the caller skipping its row).
pub fn lower_to_simple(ctx: &mut Context<'_>, pattern: &Pattern) -> SimplePat {
    match &pattern.kind {
        PatternKind::Wildcard | PatternKind::Name { .. } | PatternKind::Error => SimplePat::wildcard(),
        PatternKind::Alias { inner, .. } => lower_to_simple(ctx, inner),
        PatternKind::Guarded { inner, .. } => lower_to_simple(ctx, inner),
        PatternKind::Literal(lit) => SimplePat {
            ctor: PatCtor::Concrete(literal_ctor_key(lit)),
            args: Vec::new(),
        },
        PatternKind::Tuple(elements) => SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Tuple),
            args: elements.iter().map(|e| lower_to_simple(ctx, e)).collect(),
        },
        PatternKind::Slice(elements) => SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Tuple),
            args: elements.iter().map(|e| lower_to_simple(ctx, e)).collect(),
        },
        PatternKind::UnitCtor(path) => variant_simple_pat(ctx, path, &[]),
        PatternKind::TupleCtor { path, payload } => variant_simple_pat(ctx, path, payload),
        PatternKind::AbbreviatedCtor { name, payload } => {
            let name_id = ctx.strings.intern(name);
            SimplePat {
                ctor: PatCtor::Concrete(CtorKey::Variant(name_id)),
                args: payload.iter().map(|p| lower_to_simple(ctx, p)).collect(),
            }
        }
        PatternKind::StructCtor { fields, .. } => SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Struct),
            args: fields
                .iter()
                .map(|f| f.pattern.as_ref().map(|p| lower_to_simple(ctx, p)).unwrap_or_else(SimplePat::wildcard))
                .collect(),
        },
    }
}

fn variant_simple_pat(ctx: &mut Context<'_>, path: &kieli_ast::path::Path, payload: &[Pattern]) -> SimplePat {
    let Some(last) = path.segments.last() else {
        return SimplePat::wildcard();
    };
    let name_id = ctx.strings.intern(&last.name);
    SimplePat {
        ctor: PatCtor::Concrete(CtorKey::Variant(name_id)),
        args: payload.iter().map(|p| lower_to_simple(ctx, p)).collect(),
    }
}

fn literal_ctor_key(lit: &kieli_ast::expr::Literal) -> CtorKey {
    use kieli_ast::expr::Literal;
    match lit {
        Literal::Bool(b) => CtorKey::Bool(*b),
        Literal::Int(i) => CtorKey::Lit(format!("int:{i}")),
        Literal::Float(f) => CtorKey::Lit(format!("float:{f}")),
        Literal::Char(c) => CtorKey::Lit(format!("char:{c}")),
        Literal::String(s) => CtorKey::Lit(format!("string:{s}")),
    }
}
