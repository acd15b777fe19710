//! Template (generic) parameter machinery: declaring a definition's type,
//! value, and mutability parameters, instantiating a fresh substitution for
//! each call/use site, and substituting those instantiations through a
//! resolved type tree.
//!
//! The AST's `TemplateParamKind::Type` folds a trailing default into the
//! same `bounds` list a concept bound would occupy (the desugarer has no
//! way to tell them apart without a concept arity table), and
//! `TemplateArg` has no `Mut` variant at all, so explicit mutability
//! arguments can never be written at a call site. Given that, this module
//! treats every `bounds` entry as a concept bound (never as a default) and
//! always gives an omitted type/mutability argument a fresh unification
//! variable rather than a resolved default -- the same substitution a
//! deduced argument would get, just left unconstrained until deduction or
//! a later unification pins it down.

use kieli_common::interner::StringId;
use kieli_common::span::Span;
use kieli_hir::{Mutability, SymbolId, Type, TypeVariant};
use rustc_hash::FxHashMap;

use kieli_ast::item::TemplateParamKind;
use kieli_ast::path::TemplateArg;

use crate::context::Context;

#[derive(Debug, Clone, Copy)]
pub enum ParamSlot {
    Type(StringId),
    Value(StringId),
    Mut(StringId),
}

/// A definition's declared template parameters, in source order, plus the
/// owning definition's symbol for instantiation-cache keys.
#[derive(Debug, Clone, Default)]
pub struct TemplateScope {
    pub slots: Vec<ParamSlot>,
}

impl TemplateScope {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn type_and_mut_names(&self) -> impl Iterator<Item = StringId> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            ParamSlot::Type(name) | ParamSlot::Mut(name) => Some(*name),
            ParamSlot::Value(_) => None,
        })
    }
}

/// Bind every declared template parameter into a fresh child scope: type
/// parameters as a `LocalType` whose type is its own
/// `TemplateParameterReference`, value parameters as a `LocalVariable` of
/// their declared (or inferred) type. Mutability parameters bind no
/// symbol -- they are never referenced as an expression, only inside a
/// type's mutability slot.
pub fn declare_template_params(
    ctx: &mut Context<'_>,
    params: &[kieli_ast::item::TemplateParam],
    env: kieli_hir::EnvId,
) -> (TemplateScope, kieli_hir::EnvId) {
    let mut scope = TemplateScope::default();
    if params.is_empty() {
        return (scope, env);
    }
    let child = ctx.envs.child(env);
    for param in params {
        match &param.kind {
            TemplateParamKind::Type { name, .. } => {
                let name_id = ctx.strings.intern(name);
                let ty_variant = TypeVariant::TemplateParameterReference(name_id);
                let ty = ctx.types.alloc(ty_variant);
                let symbol = ctx.symbols.alloc(kieli_hir::Symbol::new(
                    name_id,
                    range_of(ctx, param.span),
                    kieli_hir::SymbolVariant::LocalType { aliased: ty },
                ));
                ctx.envs.bind(child, name_id, symbol);
                scope.slots.push(ParamSlot::Type(name_id));
            }
            TemplateParamKind::Value { name, ty } => {
                let name_id = ctx.strings.intern(name);
                let resolved_ty = match ty {
                    Some(ty_node) => crate::exprs::resolve_type(ctx, ty_node, child),
                    None => {
                        let var = ctx.infer.fresh_type_var();
                        ctx.types.alloc(TypeVariant::UnificationVariable(var))
                    }
                };
                let symbol = ctx.symbols.alloc(kieli_hir::Symbol::new(
                    name_id,
                    range_of(ctx, param.span),
                    kieli_hir::SymbolVariant::LocalVariable { ty: resolved_ty },
                ));
                ctx.envs.bind(child, name_id, symbol);
                scope.slots.push(ParamSlot::Value(name_id));
            }
            TemplateParamKind::Mut { name } => {
                let name_id = ctx.strings.intern(name);
                scope.slots.push(ParamSlot::Mut(name_id));
            }
        }
    }
    (scope, child)
}

fn range_of(ctx: &Context<'_>, _span: Span) -> kieli_common::span::Range {
    // Placeholder range; callers that need a precise per-parameter range
    // convert through `Context::error`/`warning` instead, which carry the
    // real span. Symbols created here are looked up by id, not displayed
    // directly, so an approximate range is enough.
    let _ = ctx;
    kieli_common::span::Range::new(
        kieli_common::span::Position { line: 0, column: 0 },
        kieli_common::span::Position { line: 0, column: 0 },
    )
}

/// One call/use-site instantiation: a fresh unification variable (type) or
/// fresh mutability variable per declared type/mutability parameter.
#[derive(Debug, Clone, Default)]
pub struct Instantiation {
    pub types: FxHashMap<StringId, Type>,
    pub mutabilities: FxHashMap<StringId, Mutability>,
}

/// Create a fresh instantiation for `scope`, then apply any explicit
/// template arguments supplied at the use site on top of it, left to
/// right. Explicit arguments beyond `scope`'s parameter count are a
/// `template-argument-count` error; running out of explicit arguments
/// simply leaves the remaining parameters as their fresh variables,
/// deducible from call-site argument types or the surrounding expected
/// type.
pub fn instantiate(
    ctx: &mut Context<'_>,
    scope: &TemplateScope,
    explicit: &[TemplateArg],
    env: kieli_hir::EnvId,
    call_span: Span,
) -> Instantiation {
    let mut inst = Instantiation::default();
    let type_and_mut: Vec<StringId> = scope.type_and_mut_names().collect();

    if explicit.len() > type_and_mut.len() {
        ctx.error(
            call_span,
            kieli_diagnostics::codes::ty::TEMPLATE_ARGUMENT_COUNT,
            format!(
                "expected at most {} template argument(s), found {}",
                type_and_mut.len(),
                explicit.len()
            ),
        );
    }

    for (i, name) in type_and_mut.iter().enumerate() {
        let fresh = ctx.infer.fresh_type_var();
        let fresh_ty = ctx.types.alloc(TypeVariant::UnificationVariable(fresh));
        inst.types.insert(*name, fresh_ty);
        inst.mutabilities.insert(*name, Mutability::Variable(ctx.infer.fresh_mut_var()));

        if let Some(TemplateArg::Type(ty_node)) = explicit.get(i) {
            if matches!(ty_node.kind, kieli_ast::ty::TypeKind::Wildcard) {
                // Wildcard explicitly requests a fresh variable; already
                // the default, nothing further to do.
                continue;
            }
            let resolved = crate::exprs::resolve_type(ctx, ty_node, env);
            let _ = ctx.infer.unify(&ctx.types, fresh_ty, resolved);
            inst.types.insert(*name, resolved);
        }
    }

    inst
}

/// Recursively substitute every `TemplateParameterReference` found in `ty`
/// with its bound instantiation, leaving anything not covered by `inst`
/// (e.g. a still-generic outer definition) untouched.
pub fn substitute(ctx: &mut Context<'_>, inst: &Instantiation, ty: Type) -> Type {
    let variant = ctx.types.get(ty).clone();
    let rebuilt = match variant {
        TypeVariant::TemplateParameterReference(name) => {
            if let Some(&replacement) = inst.types.get(&name) {
                return replacement;
            }
            return ty;
        }
        TypeVariant::Tuple(elements) => {
            TypeVariant::Tuple(elements.iter().map(|&e| substitute(ctx, inst, e)).collect())
        }
        TypeVariant::Array { element, length } => TypeVariant::Array { element: substitute(ctx, inst, element), length },
        TypeVariant::Slice(element) => TypeVariant::Slice(substitute(ctx, inst, element)),
        TypeVariant::Function { params, ret } => TypeVariant::Function {
            params: params.iter().map(|&p| substitute(ctx, inst, p)).collect(),
            ret: substitute(ctx, inst, ret),
        },
        TypeVariant::Reference { mutability, referent } => TypeVariant::Reference {
            mutability: substitute_mutability(inst, mutability),
            referent: substitute(ctx, inst, referent),
        },
        TypeVariant::Pointer { mutability, pointee } => TypeVariant::Pointer {
            mutability: substitute_mutability(inst, mutability),
            pointee: substitute(ctx, inst, pointee),
        },
        TypeVariant::Structure { id, arguments, is_template_application } => TypeVariant::Structure {
            id,
            arguments: arguments.iter().map(|&a| substitute(ctx, inst, a)).collect(),
            is_template_application,
        },
        TypeVariant::Enumeration { id, arguments, is_template_application } => TypeVariant::Enumeration {
            id,
            arguments: arguments.iter().map(|&a| substitute(ctx, inst, a)).collect(),
            is_template_application,
        },
        other => other,
    };
    ctx.types.alloc(rebuilt)
}

fn substitute_mutability(inst: &Instantiation, mutability: Mutability) -> Mutability {
    if let Mutability::Parameterized(name) = mutability {
        if let Some(&replacement) = inst.mutabilities.get(&name) {
            return replacement;
        }
    }
    mutability
}

/// Instantiation-cache key: a definition plus the structural shape of its
/// concrete template arguments (resolved, deep-resolved types compare by
/// structural equality via `PartialEq` on `TypeVariant`, not by arena id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstantiationKey {
    pub definition: SymbolId,
    pub arguments: Vec<String>,
}
