//! Type and expression resolution: turns an AST [`Type`](kieli_ast::ty::Type)
//! annotation into a `kieli_hir::Type` handle, and drives inference over
//! every expression shape the desugarer produces.

use kieli_ast::expr::{ConditionalSource, Expr, ExprKind, Literal, LoopSource};
use kieli_ast::item::FnDef;
use kieli_ast::path::{Path, TemplateArg};
use kieli_ast::ty::{Primitive as AstPrimitive, Type as AstType, TypeKind};
use kieli_common::span::Span;
use kieli_hir::{Primitive, Symbol, SymbolId, SymbolVariant, Type, TypeVariant};

use crate::context::{Context, LoopScope};
use kieli_diagnostics::codes;

fn fresh_var(ctx: &mut Context<'_>) -> Type {
    let var = ctx.infer.fresh_type_var();
    ctx.types.alloc(TypeVariant::UnificationVariable(var))
}

fn unit(ctx: &mut Context<'_>) -> Type {
    ctx.types.alloc(TypeVariant::Tuple(Vec::new()))
}

fn map_primitive(p: AstPrimitive) -> Primitive {
    match p {
        AstPrimitive::I8 => Primitive::I8,
        AstPrimitive::I16 => Primitive::I16,
        AstPrimitive::I32 => Primitive::I32,
        AstPrimitive::I64 => Primitive::I64,
        AstPrimitive::U8 => Primitive::U8,
        AstPrimitive::U16 => Primitive::U16,
        AstPrimitive::U32 => Primitive::U32,
        AstPrimitive::U64 => Primitive::U64,
        AstPrimitive::Float => Primitive::Float,
        AstPrimitive::Char => Primitive::Char,
        AstPrimitive::Bool => Primitive::Bool,
        AstPrimitive::String => Primitive::String,
    }
}

/// Resolve one written type annotation into a HIR type handle.
pub fn resolve_type(ctx: &mut Context<'_>, ty: &AstType, env: kieli_hir::EnvId) -> Type {
    match &ty.kind {
        TypeKind::Error => ctx.error_type(),
        TypeKind::Wildcard => fresh_var(ctx),
        TypeKind::SelfType => ctx.types.alloc(TypeVariant::SelfPlaceholder),
        TypeKind::Primitive(p) => ctx.types.alloc(TypeVariant::Primitive(map_primitive(*p))),
        TypeKind::Tuple(elements) => {
            let tys: Vec<Type> = elements.iter().map(|t| resolve_type(ctx, t, env)).collect();
            ctx.types.alloc(TypeVariant::Tuple(tys))
        }
        TypeKind::Array { element, length } => {
            let element_ty = resolve_type(ctx, element, env);
            let length = match &length.kind {
                ExprKind::Literal(Literal::Int(n)) => (*n).max(0) as u64,
                _ => 0,
            };
            ctx.types.alloc(TypeVariant::Array { element: element_ty, length })
        }
        TypeKind::Slice(element) => {
            let element_ty = resolve_type(ctx, element, env);
            ctx.types.alloc(TypeVariant::Slice(element_ty))
        }
        TypeKind::Function { params, ret } => {
            let param_tys = params.iter().map(|p| resolve_type(ctx, p, env)).collect();
            let ret_ty = resolve_type(ctx, ret, env);
            ctx.types.alloc(TypeVariant::Function { params: param_tys, ret: ret_ty })
        }
        TypeKind::Typeof(e) => resolve_expr(ctx, e, env),
        TypeKind::Reference { is_mut, referent } => {
            let referent_ty = resolve_type(ctx, referent, env);
            ctx.types
                .alloc(TypeVariant::Reference { mutability: kieli_hir::Mutability::Concrete(*is_mut), referent: referent_ty })
        }
        TypeKind::Pointer { is_mut, pointee } => {
            let pointee_ty = resolve_type(ctx, pointee, env);
            ctx.types
                .alloc(TypeVariant::Pointer { mutability: kieli_hir::Mutability::Concrete(*is_mut), pointee: pointee_ty })
        }
        // An existential `impl Concept` bound has no concrete shape here;
        // left as an unconstrained variable rather than erased to `Error`.
        TypeKind::Impl(_) => fresh_var(ctx),
        TypeKind::Path(path) => resolve_path_type(ctx, path, env, ty.span),
    }
}

fn resolve_path_type(ctx: &mut Context<'_>, path: &Path, env: kieli_hir::EnvId, span: Span) -> Type {
    if !path.is_global && path.segments.len() == 1 {
        let seg = &path.segments[0];
        let name_id = ctx.strings.intern(&seg.name);
        if let Some(sym) = ctx.envs.lookup(env, name_id) {
            if let SymbolVariant::LocalType { aliased } = ctx.symbols.get(sym).variant.clone() {
                return aliased;
            }
        }
    }

    let Some(sym) = crate::namespace::resolve_path_symbol(ctx, path, env) else {
        return ctx.error_type();
    };
    let last_args = path.segments.last().map(|s| s.template_args.clone()).unwrap_or_default();

    match ctx.symbols.get(sym).variant.clone() {
        SymbolVariant::Structure { ty } => apply_template_args(ctx, sym, ty, &last_args, env, span, true),
        SymbolVariant::Enumeration { ty } => apply_template_args(ctx, sym, ty, &last_args, env, span, true),
        SymbolVariant::Alias { aliased } => apply_template_args(ctx, sym, aliased, &last_args, env, span, false),
        SymbolVariant::LocalType { aliased } => aliased,
        SymbolVariant::Concept => fresh_var(ctx),
        _ => {
            ctx.error(span, codes::name::UNDEFINED_NAME, "this path does not name a type");
            ctx.error_type()
        }
    }
}

/// Apply a use site's explicit template arguments against a struct/enum's
/// own type (rebuilding its `arguments` list) or an alias's target (fully
/// substituting into it). Field types inside a generic struct/enum are not
/// themselves substituted at this use site; only the nominal type node's
/// own argument list is -- consistent with how `methods`/`patterns` look up
/// a structure's fields by its own symbol, not by instantiation.
fn apply_template_args(
    ctx: &mut Context<'_>,
    sym: SymbolId,
    base_ty: Type,
    explicit: &[TemplateArg],
    env: kieli_hir::EnvId,
    span: Span,
    nominal: bool,
) -> Type {
    let Some(scope) = ctx.template_scopes.get(&sym).cloned() else {
        return base_ty;
    };
    if scope.is_empty() {
        return base_ty;
    }
    let inst = crate::templates::instantiate(ctx, &scope, explicit, env, span);
    if !nominal {
        return crate::templates::substitute(ctx, &inst, base_ty);
    }
    let names: Vec<_> = scope.type_and_mut_names().collect();
    let variant = ctx.types.get(base_ty).clone();
    let rebuilt = match variant {
        TypeVariant::Structure { id, .. } => TypeVariant::Structure {
            id,
            arguments: names.iter().filter_map(|n| inst.types.get(n).copied()).collect(),
            is_template_application: true,
        },
        TypeVariant::Enumeration { id, .. } => TypeVariant::Enumeration {
            id,
            arguments: names.iter().filter_map(|n| inst.types.get(n).copied()).collect(),
            is_template_application: true,
        },
        other => other,
    };
    ctx.types.alloc(rebuilt)
}

pub fn literal_type(ctx: &mut Context<'_>, lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => {
            let var = ctx.infer.fresh_type_var();
            ctx.types.alloc(TypeVariant::IntegralUnificationVariable(var))
        }
        Literal::Float(_) => ctx.types.alloc(TypeVariant::Primitive(Primitive::Float)),
        Literal::Char(_) => ctx.types.alloc(TypeVariant::Primitive(Primitive::Char)),
        Literal::String(_) => ctx.types.alloc(TypeVariant::Primitive(Primitive::String)),
        Literal::Bool(_) => ctx.types.alloc(TypeVariant::Primitive(Primitive::Bool)),
    }
}

fn symbol_value_type(ctx: &mut Context<'_>, sym: SymbolId) -> Type {
    match ctx.symbols.get(sym).variant.clone() {
        SymbolVariant::LocalVariable { ty }
        | SymbolVariant::LocalMutability { ty, .. }
        | SymbolVariant::Function { ty }
        | SymbolVariant::Structure { ty }
        | SymbolVariant::Enumeration { ty }
        | SymbolVariant::Constructor { ty, .. }
        | SymbolVariant::Field { ty, .. } => ty,
        SymbolVariant::Alias { aliased } | SymbolVariant::LocalType { aliased } => aliased,
        SymbolVariant::Module | SymbolVariant::Concept | SymbolVariant::Error => ctx.error_type(),
    }
}

/// Whether a desugared `while` loop's condition guard is a literal `true`
/// or `false`, for the corresponding style warnings. `while` lowers to
/// `loop { if cond { body } else { break } }`; the guard sits as the
/// result of the loop body's block.
fn while_condition_literal(body: &Expr) -> Option<bool> {
    let ExprKind::Block { result, .. } = &body.kind else { return None };
    let ExprKind::Conditional { condition, source, .. } = &result.kind else { return None };
    if *source != ConditionalSource::WhileLoopBody {
        return None;
    }
    match &condition.kind {
        ExprKind::Literal(Literal::Bool(b)) => Some(*b),
        _ => None,
    }
}

pub fn resolve_expr(ctx: &mut Context<'_>, expr: &Expr, env: kieli_hir::EnvId) -> Type {
    match &expr.kind {
        ExprKind::Literal(lit) => literal_type(ctx, lit),
        ExprKind::Hole => fresh_var(ctx),
        ExprKind::Error => ctx.error_type(),

        ExprKind::Path(path) => match crate::namespace::resolve_path_symbol(ctx, path, env) {
            Some(sym) => {
                let ty = symbol_value_type(ctx, sym);
                let last_args = path.segments.last().map(|s| s.template_args.clone()).unwrap_or_default();
                if last_args.is_empty() {
                    return ty;
                }
                let Some(scope) = ctx.template_scopes.get(&sym).cloned() else { return ty };
                if scope.is_empty() {
                    return ty;
                }
                let inst = crate::templates::instantiate(ctx, &scope, &last_args, env, expr.span);
                crate::templates::substitute(ctx, &inst, ty)
            }
            None => ctx.error_type(),
        },

        ExprKind::Block { effects, result } => {
            let child = ctx.envs.child(env);
            for effect in effects {
                resolve_expr(ctx, effect, child);
            }
            resolve_expr(ctx, result, child)
        }

        ExprKind::Call { callee, args } => {
            let callee_ty = resolve_expr(ctx, callee, env);
            let resolved_callee = ctx.infer.shallow_resolve(&ctx.types, callee_ty);
            let (param_tys, ret_ty) = match ctx.types.get(resolved_callee).clone() {
                TypeVariant::Function { params, ret } => (params, ret),
                TypeVariant::Error => return ctx.error_type(),
                _ => {
                    ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, "called value is not a function");
                    return ctx.error_type();
                }
            };
            if args.len() != param_tys.len() {
                ctx.error(
                    expr.span,
                    codes::ty::ARITY_MISMATCH,
                    format!("expected {} argument(s), found {}", param_tys.len(), args.len()),
                );
            }
            for (i, arg) in args.iter().enumerate() {
                let arg_ty = resolve_expr(ctx, arg, env);
                if let Some(&expected) = param_tys.get(i) {
                    let _ = ctx.infer.unify(&ctx.types, arg_ty, expected);
                }
            }
            ret_ty
        }

        ExprKind::MethodCall { receiver, method, args, .. } => {
            let receiver_ty = resolve_expr(ctx, receiver, env);
            let name_id = ctx.strings.intern(method);
            let Some(method_id) = crate::methods::lookup_method(ctx, receiver_ty, name_id) else {
                ctx.error(expr.span, codes::name::NAMESPACE_MISSING_MEMBER, format!("no method named '{method}' on this type"));
                return ctx.error_type();
            };
            let method_ty = match ctx.symbols.get(method_id).variant.clone() {
                SymbolVariant::Function { ty } => ty,
                _ => return ctx.error_type(),
            };
            let (param_tys, ret_ty) = match ctx.types.get(method_ty).clone() {
                TypeVariant::Function { params, ret } => (params, ret),
                _ => return ctx.error_type(),
            };
            let mut params_iter = param_tys.iter();
            if let Some(&self_ty) = params_iter.next() {
                if ctx.infer.unify(&ctx.types, receiver_ty, self_ty).is_err() {
                    ctx.error(expr.span, codes::ty::MUTABILITY_VIOLATION, "receiver does not satisfy this method's self parameter");
                }
            }
            let rest: Vec<Type> = params_iter.copied().collect();
            if args.len() != rest.len() {
                ctx.error(expr.span, codes::ty::ARITY_MISMATCH, format!("expected {} argument(s), found {}", rest.len(), args.len()));
            }
            for (i, arg) in args.iter().enumerate() {
                let arg_ty = resolve_expr(ctx, arg, env);
                if let Some(&expected) = rest.get(i) {
                    let _ = ctx.infer.unify(&ctx.types, arg_ty, expected);
                }
            }
            ret_ty
        }

        ExprKind::BinaryOp { op, left, right } => {
            let lt = resolve_expr(ctx, left, env);
            let rt = resolve_expr(ctx, right, env);
            if ctx.infer.unify(&ctx.types, lt, rt).is_err() {
                ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, format!("mismatched operand types for '{op}'"));
            }
            match op.as_str() {
                "==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||" => ctx.types.alloc(TypeVariant::Primitive(Primitive::Bool)),
                _ => lt,
            }
        }

        ExprKind::Conditional { condition, true_branch, false_branch, has_explicit_false_branch, .. } => {
            let cond_ty = resolve_expr(ctx, condition, env);
            let bool_ty = ctx.types.alloc(TypeVariant::Primitive(Primitive::Bool));
            let _ = ctx.infer.unify(&ctx.types, cond_ty, bool_ty);
            let true_ty = resolve_expr(ctx, true_branch, env);
            let false_ty = resolve_expr(ctx, false_branch, env);
            if *has_explicit_false_branch {
                if ctx.infer.unify(&ctx.types, true_ty, false_ty).is_err() {
                    ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, "if/else branches have different types");
                }
                true_ty
            } else {
                let u = unit(ctx);
                let _ = ctx.infer.unify(&ctx.types, true_ty, u);
                u
            }
        }

        ExprKind::Match { scrutinee, arms } => {
            let scrutinee_ty = resolve_expr(ctx, scrutinee, env);
            let mut result_ty: Option<Type> = None;
            let mut rows = Vec::with_capacity(arms.len());
            for arm in arms {
                let arm_env = ctx.envs.child(env);
                crate::patterns::resolve_pattern(ctx, &arm.pattern, Some(scrutinee_ty), arm_env);
                rows.push(vec![crate::patterns::lower_to_simple(ctx, &arm.pattern)]);
                let handler_ty = resolve_expr(ctx, &arm.handler, arm_env);
                result_ty = Some(match result_ty {
                    Some(prev) => {
                        let _ = ctx.infer.unify(&ctx.types, prev, handler_ty);
                        prev
                    }
                    None => handler_ty,
                });
            }
            if !crate::exhaustiveness::is_exhaustive(&rows, &ctx.enum_variants) {
                ctx.error(expr.span, codes::semantic::INEXHAUSTIVE_PATTERN, "match is not exhaustive");
            }
            result_ty.unwrap_or_else(|| ctx.error_type())
        }

        ExprKind::Loop { body, source } => {
            if *source == LoopSource::While {
                if let Some(literal) = while_condition_literal(body) {
                    if literal {
                        ctx.warning(body.span, codes::style::WHILE_TRUE_SUGGEST_LOOP, "condition is always true; use 'loop' instead of 'while'");
                    } else {
                        ctx.warning(body.span, codes::style::WHILE_FALSE_UNREACHABLE, "condition is always false; this loop never runs");
                    }
                }
            }
            ctx.loops.push(LoopScope { result_ty: None, is_while: *source == LoopSource::While });
            resolve_expr(ctx, body, env);
            let scope = ctx.loops.pop().expect("loop scope pushed immediately above");
            scope.result_ty.unwrap_or_else(|| unit(ctx))
        }

        ExprKind::Break(value) => {
            let value_ty = match value {
                Some(e) => resolve_expr(ctx, e, env),
                None => unit(ctx),
            };
            if ctx.loops.is_empty() {
                ctx.error(expr.span, codes::semantic::BREAK_OUTSIDE_LOOP, "'break' outside any loop");
            } else {
                let idx = ctx.loops.len() - 1;
                if ctx.loops[idx].is_while && value.is_some() {
                    ctx.error(expr.span, codes::semantic::WHILE_VALUE_BREAK, "'while' loops cannot break with a value");
                }
                match ctx.loops[idx].result_ty {
                    Some(prev) => {
                        let _ = ctx.infer.unify(&ctx.types, prev, value_ty);
                    }
                    None => ctx.loops[idx].result_ty = Some(value_ty),
                }
            }
            fresh_var(ctx)
        }

        ExprKind::Continue => {
            if ctx.loops.is_empty() {
                ctx.error(expr.span, codes::semantic::CONTINUE_OUTSIDE_LOOP, "'continue' outside any loop");
            }
            unit(ctx)
        }

        ExprKind::Ret(value) => {
            if let Some(e) = value {
                resolve_expr(ctx, e, env);
            }
            fresh_var(ctx)
        }

        ExprKind::Discard(inner) => {
            resolve_expr(ctx, inner, env);
            unit(ctx)
        }

        ExprKind::Let { pattern, ty, initializer } => {
            let init_ty = resolve_expr(ctx, initializer, env);
            let expected = ty.as_ref().map(|t| resolve_type(ctx, t, env));
            if let Some(expected) = expected {
                let _ = ctx.infer.unify(&ctx.types, init_ty, expected);
            }
            if let Some(pat) = pattern {
                crate::patterns::resolve_pattern(ctx, pat, Some(init_ty), env);
            }
            unit(ctx)
        }

        ExprKind::LocalTypeAlias { name, aliased } => {
            let resolved = resolve_type(ctx, aliased, env);
            let name_id = ctx.strings.intern(name);
            let range = ctx.range_of(expr.span);
            let sym = ctx.symbols.alloc(Symbol::new(name_id, range, SymbolVariant::LocalType { aliased: resolved }));
            ctx.envs.bind(env, name_id, sym);
            unit(ctx)
        }

        ExprKind::AddressOf { is_mut, referent } => {
            let inner_ty = if let ExprKind::Path(path) = &referent.kind {
                match crate::namespace::resolve_path_symbol(ctx, path, env) {
                    Some(sym) => {
                        if *is_mut {
                            let mutable = matches!(&ctx.symbols.get(sym).variant, SymbolVariant::LocalMutability { is_mut: true, .. });
                            if !mutable {
                                ctx.error(expr.span, codes::ty::MUTABILITY_VIOLATION, "cannot take a mutable reference to an immutable binding");
                            }
                        }
                        symbol_value_type(ctx, sym)
                    }
                    None => ctx.error_type(),
                }
            } else {
                resolve_expr(ctx, referent, env)
            };
            ctx.types.alloc(TypeVariant::Reference { mutability: kieli_hir::Mutability::Concrete(*is_mut), referent: inner_ty })
        }

        ExprKind::Deref(inner) => {
            let inner_ty = resolve_expr(ctx, inner, env);
            let resolved = ctx.infer.shallow_resolve(&ctx.types, inner_ty);
            match ctx.types.get(resolved).clone() {
                TypeVariant::Reference { referent, .. } => referent,
                TypeVariant::Pointer { pointee, .. } => {
                    if !ctx.in_unsafe() {
                        ctx.error(expr.span, codes::ty::UNSAFE_VIOLATION, "dereferencing a raw pointer requires an unsafe block");
                    }
                    pointee
                }
                TypeVariant::Error => ctx.error_type(),
                _ => {
                    ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, "cannot dereference this type");
                    ctx.error_type()
                }
            }
        }

        ExprKind::Sizeof(ty) => {
            resolve_type(ctx, ty, env);
            ctx.types.alloc(TypeVariant::Primitive(Primitive::U64))
        }

        ExprKind::Mov(inner) => resolve_expr(ctx, inner, env),

        ExprKind::Defer(inner) => {
            resolve_expr(ctx, inner, env);
            unit(ctx)
        }

        ExprKind::Unsafe(inner) => {
            ctx.safety.push(true);
            let ty = resolve_expr(ctx, inner, env);
            ctx.safety.pop();
            ty
        }

        ExprKind::Meta(inner) => {
            resolve_expr(ctx, inner, env);
            unit(ctx)
        }

        ExprKind::FieldAccess { base, field } => {
            let base_ty = resolve_expr(ctx, base, env);
            let resolved = ctx.infer.shallow_resolve(&ctx.types, base_ty);
            let owner = crate::methods::namespace_owner(ctx, resolved);
            let field_id = ctx.strings.intern(field);
            let found = owner
                .and_then(|o| ctx.record_fields.get(&o).cloned())
                .and_then(|fields| fields.iter().find(|(n, _)| *n == field_id).map(|(_, ty)| *ty));
            match found {
                Some(ty) => ty,
                None => {
                    ctx.error(expr.span, codes::ty::STRUCT_FIELD_UNKNOWN, format!("'{field}' is not a field of this type"));
                    ctx.error_type()
                }
            }
        }

        ExprKind::TupleIndex { base, index } => {
            let base_ty = resolve_expr(ctx, base, env);
            let resolved = ctx.infer.shallow_resolve(&ctx.types, base_ty);
            match ctx.types.get(resolved).clone() {
                TypeVariant::Tuple(elements) => elements.get(*index as usize).copied().unwrap_or_else(|| ctx.error_type()),
                TypeVariant::Error => ctx.error_type(),
                _ => {
                    ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, "not a tuple type");
                    ctx.error_type()
                }
            }
        }

        ExprKind::ArrayIndex { base, index } => {
            let base_ty = resolve_expr(ctx, base, env);
            resolve_expr(ctx, index, env);
            let resolved = ctx.infer.shallow_resolve(&ctx.types, base_ty);
            match ctx.types.get(resolved).clone() {
                TypeVariant::Array { element, .. } | TypeVariant::Slice(element) => element,
                TypeVariant::Error => ctx.error_type(),
                _ => {
                    ctx.error(expr.span, codes::ty::UNIFICATION_FAILURE, "this type cannot be indexed");
                    ctx.error_type()
                }
            }
        }

        ExprKind::Tuple(elements) => {
            let tys: Vec<Type> = elements.iter().map(|e| resolve_expr(ctx, e, env)).collect();
            ctx.types.alloc(TypeVariant::Tuple(tys))
        }

        ExprKind::Array(elements) => {
            let mut element_ty = None;
            for e in elements {
                let ty = resolve_expr(ctx, e, env);
                element_ty = Some(match element_ty {
                    Some(prev) => {
                        let _ = ctx.infer.unify(&ctx.types, prev, ty);
                        prev
                    }
                    None => ty,
                });
            }
            let element = element_ty.unwrap_or_else(|| fresh_var(ctx));
            ctx.types.alloc(TypeVariant::Array { element, length: elements.len() as u64 })
        }

        ExprKind::StructInit { ty, fields } => {
            let struct_ty = resolve_type(ctx, ty, env);
            let owner = crate::methods::namespace_owner(ctx, struct_ty);
            let declared = owner.and_then(|o| ctx.record_fields.get(&o).cloned()).unwrap_or_default();
            let mut seen = Vec::with_capacity(fields.len());
            for (name, value_expr) in fields {
                let value_ty = resolve_expr(ctx, value_expr, env);
                let field_id = ctx.strings.intern(name);
                match declared.iter().find(|(n, _)| *n == field_id) {
                    Some((_, declared_ty)) => {
                        let _ = ctx.infer.unify(&ctx.types, value_ty, *declared_ty);
                    }
                    None => ctx.error(value_expr.span, codes::ty::STRUCT_FIELD_UNKNOWN, format!("'{name}' is not a field of this type")),
                }
                seen.push(field_id);
            }
            for (name, _) in &declared {
                if !seen.contains(name) {
                    let field_name = ctx.strings.resolve(*name).to_owned();
                    ctx.error(expr.span, codes::ty::STRUCT_FIELD_UNINIT, format!("field '{field_name}' is not initialized"));
                }
            }
            struct_ty
        }

        ExprKind::TypeCast { value, target } => {
            resolve_expr(ctx, value, env);
            resolve_type(ctx, target, env)
        }

        ExprKind::TypeAscription { value, ascribed } => {
            let value_ty = resolve_expr(ctx, value, env);
            let ascribed_ty = resolve_type(ctx, ascribed, env);
            let _ = ctx.infer.unify(&ctx.types, value_ty, ascribed_ty);
            ascribed_ty
        }
    }
}

/// Resolve a top-level function's body against its already-resolved
/// signature, binding parameters into a fresh scope and unifying the
/// body's result against the declared return type. Ends with
/// generalization and an unused-local-variable sweep over every symbol the
/// body introduced.
pub fn resolve_fn_body(ctx: &mut Context<'_>, def: &FnDef, fn_id: SymbolId, env: kieli_hir::EnvId) {
    resolve_fn_body_as(ctx, def, fn_id, env, None)
}

/// As [`resolve_fn_body`], but for a method: `owner_ty` is the `impl`
/// block's target type, used to bind `self`.
pub fn resolve_fn_body_as(ctx: &mut Context<'_>, def: &FnDef, fn_id: SymbolId, env: kieli_hir::EnvId, owner_ty: Option<Type>) {
    let Some(body) = &def.body else { return };

    let (_, fn_env) = crate::templates::declare_template_params(ctx, &def.template_params, env);
    let body_env = ctx.envs.child(fn_env);

    let fn_ty = match ctx.symbols.get(fn_id).variant.clone() {
        SymbolVariant::Function { ty } => ty,
        _ => return,
    };
    let (param_tys, ret_ty) = match ctx.types.get(fn_ty).clone() {
        TypeVariant::Function { params, ret } => (params, ret),
        _ => return,
    };

    let mut offset = 0;
    if let Some(self_param) = &def.self_param {
        if let (Some(_), Some(&self_ty)) = (owner_ty, param_tys.first()) {
            let name_id = ctx.strings.intern("self");
            let range = ctx.range_of(self_param.span);
            let sym = Symbol::new(name_id, range, SymbolVariant::LocalVariable { ty: self_ty });
            let sym_id = ctx.symbols.alloc(sym);
            ctx.envs.bind(body_env, name_id, sym_id);
        }
        offset = 1;
    }

    for (i, param) in def.params.iter().enumerate() {
        let declared_ty = param_tys.get(offset + i).copied().unwrap_or_else(|| ctx.error_type());
        let name_id = ctx.strings.intern(&param.name);
        let range = ctx.range_of(param.span);
        let sym = ctx.symbols.alloc(Symbol::new(name_id, range, SymbolVariant::LocalVariable { ty: declared_ty }));
        ctx.envs.bind(body_env, name_id, sym);
    }

    let saved_loops = std::mem::take(&mut ctx.loops);
    let saved_safety = std::mem::replace(&mut ctx.safety, vec![false]);
    let locals_start = ctx.symbols.len();

    let actual_ret = resolve_expr(ctx, body, body_env);
    if ctx.infer.unify(&ctx.types, actual_ret, ret_ty).is_err() {
        ctx.error(body.span, codes::ty::UNIFICATION_FAILURE, "function body does not match its declared return type");
    }

    ctx.loops = saved_loops;
    ctx.safety = saved_safety;

    let mut unused = Vec::new();
    for (_, symbol) in ctx.symbols.iter().skip(locals_start) {
        let is_local = matches!(&symbol.variant, SymbolVariant::LocalVariable { .. } | SymbolVariant::LocalMutability { .. });
        if is_local && symbol.use_count == 0 {
            unused.push((symbol.range, symbol.name));
        }
    }
    for (range, name) in unused {
        let text = ctx.strings.resolve(name).to_owned();
        if text != "self" && !text.starts_with('_') {
            ctx.warning_at(range, codes::style::UNUSED_VARIABLE, format!("unused variable '{text}'"));
        }
    }

    crate::generalize::generalize_function(ctx, fn_id);
}
