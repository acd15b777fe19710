//! Top-level namespace construction: a declare pass that makes every name
//! visible before anything is resolved (so mutual recursion between
//! functions, and forward references to a struct/enum declared later in
//! the file, both just work), followed by a signature-resolution pass and
//! a body-resolution pass.
//!
//! Declarations go through the same `Unresolved -> OnStack -> Resolved`
//! state machine described for aliases: a name requested while its own
//! signature is still being resolved (a path alias cycle, a concept bound
//! referring back to itself) is a circular-dependency error rather than a
//! stack overflow.

use kieli_ast::item::{Item, SourceFile, StructFields};
use kieli_ast::path::Path;
use kieli_common::interner::StringId;
use kieli_hir::{EnvId, Symbol, SymbolId, SymbolVariant, Type, TypeVariant};
use rustc_hash::FxHashMap;

use crate::context::{Context, DefState};
use kieli_diagnostics::codes;

/// Declare every named item in `items` into `env`, assigning each a
/// placeholder symbol so later lookups (including forward references)
/// always find *something* to resolve against.
pub fn declare_items(ctx: &mut Context<'_>, items: &[Item], env: EnvId) {
    for item in items {
        declare_item(ctx, item, env);
    }
}

fn declare_item(ctx: &mut Context<'_>, item: &Item, env: EnvId) {
    match item {
        Item::Import(_) => {}
        Item::Impl(_) => {} // impls attach to a type once signatures resolve; no name of their own
        Item::Fn(def) => declare_named(ctx, &def.name, def.span, SymbolVariant::Error, env),
        Item::Struct(def) => declare_named(ctx, &def.name, def.span, SymbolVariant::Error, env),
        Item::Enum(def) => declare_named(ctx, &def.name, def.span, SymbolVariant::Error, env),
        Item::Alias(def) => declare_named(ctx, &def.name, def.span, SymbolVariant::Error, env),
        Item::Concept(def) => declare_named(ctx, &def.name, def.span, SymbolVariant::Error, env),
        Item::Submodule(def) => {
            let id = declare_named(ctx, &def.name, def.span, SymbolVariant::Module, env);
            ctx.states.insert(id, DefState::Resolved);
            declare_items(ctx, &def.items, env);
        }
    }
}

fn declare_named(
    ctx: &mut Context<'_>,
    name: &str,
    span: kieli_common::span::Span,
    variant: SymbolVariant,
    env: EnvId,
) -> SymbolId {
    let name_id = ctx.strings.intern(name);
    let range = ctx.range_of(span);
    let id = ctx.symbols.alloc(Symbol::new(name_id, range, variant));
    ctx.definitions.insert(name_id, id);
    ctx.envs.bind(env, name_id, id);
    ctx.states.insert(id, DefState::Unresolved);
    id
}

/// Resolve every item's signature (struct fields, enum variants, alias
/// target, concept method signatures, function headers). Function bodies
/// and impl methods are left for `resolve_bodies`.
pub fn resolve_signatures(ctx: &mut Context<'_>, items: &[Item], env: EnvId) {
    for item in items {
        resolve_item_signature(ctx, item, env);
    }
}

fn symbol_for(ctx: &mut Context<'_>, name: &str) -> Option<SymbolId> {
    let name_id = ctx.strings.intern(name);
    ctx.definitions.get(&name_id).copied()
}

fn resolve_item_signature(ctx: &mut Context<'_>, item: &Item, env: EnvId) {
    match item {
        Item::Import(_) | Item::Impl(_) => {}
        Item::Fn(def) => {
            let Some(id) = symbol_for(ctx, &def.name) else { return };
            if !enter(ctx, id) {
                return;
            }
            let (scope, fn_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
            let param_tys: Vec<Type> = def.params.iter().map(|p| crate::exprs::resolve_type(ctx, &p.ty, fn_env)).collect();
            let ret_ty = match &def.return_type {
                Some(ty) => crate::exprs::resolve_type(ctx, ty, fn_env),
                None => ctx.types.alloc(TypeVariant::Tuple(Vec::new())),
            };
            let fn_ty = ctx.types.alloc(TypeVariant::Function { params: param_tys, ret: ret_ty });
            ctx.symbols.get_mut(id).variant = SymbolVariant::Function { ty: fn_ty };
            ctx.template_scopes.insert(id, scope);
            leave(ctx, id);
        }
        Item::Struct(def) => {
            let Some(id) = symbol_for(ctx, &def.name) else { return };
            if !enter(ctx, id) {
                return;
            }
            let (scope, struct_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
            let ty = ctx.types.alloc(TypeVariant::Structure { id, arguments: Vec::new(), is_template_application: false });
            ctx.symbols.get_mut(id).variant = SymbolVariant::Structure { ty };
            ctx.template_scopes.insert(id, scope);
            register_fields(ctx, id, &def.fields, struct_env);
            crate::generalize::check_no_unsolved(ctx, ty, def.span);
            leave(ctx, id);
        }
        Item::Enum(def) => {
            let Some(id) = symbol_for(ctx, &def.name) else { return };
            if !enter(ctx, id) {
                return;
            }
            let (scope, enum_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
            let ty = ctx.types.alloc(TypeVariant::Enumeration { id, arguments: Vec::new(), is_template_application: false });
            ctx.symbols.get_mut(id).variant = SymbolVariant::Enumeration { ty };
            ctx.template_scopes.insert(id, scope);

            let mut variant_names = Vec::with_capacity(def.variants.len());
            let mut ctors = FxHashMap::default();
            for variant in &def.variants {
                let variant_name_id = ctx.strings.intern(&variant.name);
                variant_names.push(variant_name_id);
                let variant_range = ctx.range_of(variant.span);
                let ctor_ty = match &variant.fields {
                    StructFields::Unit => ty,
                    StructFields::Tuple(elements) => {
                        let params: Vec<Type> = elements.iter().map(|t| crate::exprs::resolve_type(ctx, t, enum_env)).collect();
                        ctx.types.alloc(TypeVariant::Function { params, ret: ty })
                    }
                    StructFields::Record(_) => ty,
                };
                let ctor_id = ctx.symbols.alloc(Symbol::new(
                    variant_name_id,
                    variant_range,
                    SymbolVariant::Constructor { ty: ctor_ty, owner: id },
                ));
                if let StructFields::Record(fields) = &variant.fields {
                    register_record_fields(ctx, ctor_id, fields, enum_env);
                }
                ctors.insert(variant_name_id, ctor_id);
            }
            ctx.enum_variants.insert(id, variant_names);
            ctx.enum_variant_ctors.insert(id, ctors);
            crate::generalize::check_no_unsolved(ctx, ty, def.span);
            leave(ctx, id);
        }
        Item::Alias(def) => {
            let Some(id) = symbol_for(ctx, &def.name) else { return };
            if !enter(ctx, id) {
                return;
            }
            let (scope, alias_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
            let aliased = crate::exprs::resolve_type(ctx, &def.ty, alias_env);
            ctx.symbols.get_mut(id).variant = SymbolVariant::Alias { aliased };
            ctx.template_scopes.insert(id, scope);
            crate::generalize::check_no_unsolved(ctx, aliased, def.span);
            leave(ctx, id);
        }
        Item::Concept(def) => {
            let Some(id) = symbol_for(ctx, &def.name) else { return };
            if !enter(ctx, id) {
                return;
            }
            let (scope, concept_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
            ctx.template_scopes.insert(id, scope);
            for sig in &def.method_sigs {
                let params: Vec<Type> = sig.params.iter().map(|p| crate::exprs::resolve_type(ctx, &p.ty, concept_env)).collect();
                let ret = match &sig.return_type {
                    Some(ty) => crate::exprs::resolve_type(ctx, ty, concept_env),
                    None => ctx.types.alloc(TypeVariant::Tuple(Vec::new())),
                };
                let _fn_ty = ctx.types.alloc(TypeVariant::Function { params, ret });
            }
            ctx.symbols.get_mut(id).variant = SymbolVariant::Concept;
            leave(ctx, id);
        }
        Item::Submodule(def) => {
            resolve_signatures(ctx, &def.items, env);
        }
    }
}

fn register_fields(ctx: &mut Context<'_>, owner: SymbolId, fields: &StructFields, env: EnvId) {
    match fields {
        StructFields::Unit => {}
        StructFields::Tuple(elements) => {
            let tys: Vec<Type> = elements.iter().map(|t| crate::exprs::resolve_type(ctx, t, env)).collect();
            let names: Vec<(StringId, Type)> = tys
                .iter()
                .enumerate()
                .map(|(i, &ty)| (ctx.strings.intern(&i.to_string()), ty))
                .collect();
            ctx.record_fields.insert(owner, names);
        }
        StructFields::Record(record_fields) => register_record_fields(ctx, owner, record_fields, env),
    }
}

fn register_record_fields(ctx: &mut Context<'_>, owner: SymbolId, fields: &[kieli_ast::item::FieldDef], env: EnvId) {
    let mut named = Vec::with_capacity(fields.len());
    for field in fields {
        let ty = crate::exprs::resolve_type(ctx, &field.ty, env);
        let name_id = ctx.strings.intern(&field.name);
        named.push((name_id, ty));
    }
    ctx.record_fields.insert(owner, named);
}

/// Mark `id` as currently being resolved; returns `false` (after emitting a
/// circular-dependency diagnostic) if it is already on the stack.
fn enter(ctx: &mut Context<'_>, id: SymbolId) -> bool {
    match ctx.states.get(&id).copied().unwrap_or(DefState::Unresolved) {
        DefState::Resolved => false,
        DefState::OnStack => {
            let range = ctx.symbols.get(id).range;
            ctx.sink.push(kieli_common::diagnostic::Diagnostic::error(
                range,
                codes::semantic::CIRCULAR_DEPENDENCY,
                "this definition depends on itself",
            ));
            false
        }
        DefState::Unresolved => {
            ctx.states.insert(id, DefState::OnStack);
            true
        }
    }
}

fn leave(ctx: &mut Context<'_>, id: SymbolId) {
    ctx.states.insert(id, DefState::Resolved);
}

/// Resolve every function body and every impl block's methods. Run after
/// every signature in the file has been resolved, so a body can call a
/// function declared later in the same file.
pub fn resolve_bodies(ctx: &mut Context<'_>, items: &[Item], env: EnvId) {
    for item in items {
        resolve_item_body(ctx, item, env);
    }
}

fn resolve_item_body(ctx: &mut Context<'_>, item: &Item, env: EnvId) {
    match item {
        Item::Fn(def) => {
            if let Some(id) = symbol_for(ctx, &def.name) {
                crate::exprs::resolve_fn_body(ctx, def, id, env);
            }
        }
        Item::Impl(def) => resolve_impl(ctx, def, env),
        Item::Submodule(def) => resolve_bodies(ctx, &def.items, env),
        Item::Import(_) | Item::Struct(_) | Item::Enum(_) | Item::Alias(_) | Item::Concept(_) => {}
    }
}

fn resolve_impl(ctx: &mut Context<'_>, def: &kieli_ast::item::ImplDef, env: EnvId) {
    let (_, impl_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
    let target_ty = crate::exprs::resolve_type(ctx, &def.ty, impl_env);
    let Some(owner) = crate::methods::namespace_owner(ctx, target_ty) else {
        return;
    };
    // Declare every method's signature against the target type first (so
    // methods can call each other regardless of declaration order), then
    // resolve bodies.
    for method_item in &def.items {
        if let Item::Fn(method) = method_item {
            let name_id = ctx.strings.intern(&method.name);
            let range = ctx.range_of(method.span);
            let (_, method_env) = crate::templates::declare_template_params(ctx, &method.template_params, impl_env);
            let self_ty = method.self_param.as_ref().map(|sp| crate::methods::self_parameter_type(ctx, target_ty, sp));
            let mut param_tys: Vec<Type> = Vec::new();
            if let Some(self_ty) = self_ty {
                param_tys.push(self_ty);
            }
            param_tys.extend(method.params.iter().map(|p| crate::exprs::resolve_type(ctx, &p.ty, method_env)));
            let ret_ty = match &method.return_type {
                Some(ty) => crate::exprs::resolve_type(ctx, ty, method_env),
                None => ctx.types.alloc(TypeVariant::Tuple(Vec::new())),
            };
            let fn_ty = ctx.types.alloc(TypeVariant::Function { params: param_tys, ret: ret_ty });
            let method_id = ctx.symbols.alloc(Symbol::new(name_id, range, SymbolVariant::Function { ty: fn_ty }));
            crate::methods::register_method(ctx, owner, name_id, method_id);
        }
    }
    for method_item in &def.items {
        if let Item::Fn(method) = method_item {
            let name_id = ctx.strings.intern(&method.name);
            if let Some(&method_id) = ctx.methods.get(&owner).and_then(|t| t.get(&name_id)) {
                crate::exprs::resolve_fn_body_as(ctx, method, method_id, impl_env, Some(target_ty));
            }
        }
    }
}

/// Resolve a (possibly multi-segment) path left to right, starting from
/// `env`'s lexical scope for the first segment and then walking each
/// further segment through the symbol it named: a module's own items, an
/// enum's variants, or a type's associated (impl) namespace.
pub fn resolve_path_symbol(ctx: &mut Context<'_>, path: &Path, env: EnvId) -> Option<SymbolId> {
    let mut segments = path.segments.iter();
    let first = segments.next()?;
    let first_name = ctx.strings.intern(&first.name);

    let mut current = if path.is_global {
        ctx.definitions.get(&first_name).copied()
    } else {
        ctx.envs.lookup(env, first_name).or_else(|| ctx.definitions.get(&first_name).copied())
    };

    if current.is_none() {
        ctx.error(first.span, codes::name::UNDEFINED_NAME, format!("no definition for '{}' in scope", first.name));
        return None;
    }

    for segment in segments {
        let seg_name = ctx.strings.intern(&segment.name);
        let root = current.unwrap();
        let next = ctx
            .enum_variant_ctors
            .get(&root)
            .and_then(|table| table.get(&seg_name))
            .or_else(|| ctx.methods.get(&root).and_then(|table| table.get(&seg_name)))
            .copied();
        if next.is_none() {
            ctx.error(
                segment.span,
                codes::name::NAMESPACE_MISSING_MEMBER,
                format!("no member named '{}' in this namespace", segment.name),
            );
            return None;
        }
        current = next;
    }

    if let Some(id) = current {
        ctx.symbols.get_mut(id).use_count += 1;
        let last_span = path.segments.last().map(|segment| segment.span).unwrap_or(first.span);
        let range = ctx.range_of(last_span);
        ctx.occurrences.push(crate::context::Occurrence { range, symbol: id });
    }
    current
}
