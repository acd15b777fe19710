//! Unification over the two variable domains the resolver solves: types and
//! mutabilities. Each domain gets its own `ena` union-find table, since a
//! mutability mismatch (`&T` vs `&mut T`) is a different diagnostic than a
//! type mismatch and the two never need to unify against each other.

use ena::unify::{InPlaceUnificationTable, UnifyKey};
use kieli_hir::{Mutability, MutVar, Type, TypeArena, TypeVar, TypeVariant, INTEGRAL_PRIMITIVES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnifyError {
    /// The two types/mutabilities have incompatible shapes.
    Mismatch,
    /// Unifying would create an infinite type (`T = (T,)`).
    Occurs,
    /// Two tuples/functions/arrays of different arity or length.
    Arity,
}

/// Owns both union-find tables and drives structural unification over
/// `kieli_hir::ty::TypeVariant` trees. One `InferCtx` is created per
/// document resolution pass.
#[derive(Default)]
pub struct InferCtx {
    types: InPlaceUnificationTable<TypeVar>,
    muts: InPlaceUnificationTable<MutVar>,
}

impl InferCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_type_var(&mut self) -> TypeVar {
        self.types.new_key(None)
    }

    pub fn fresh_mut_var(&mut self) -> MutVar {
        self.muts.new_key(None)
    }

    /// Follow a type variable's union-find chain to either its bound
    /// solution or its own (now-canonical) root variable.
    fn resolve_var(&mut self, var: TypeVar) -> Result<Type, TypeVar> {
        match self.types.probe_value(var) {
            Some(ty) => Ok(ty),
            None => Err(self.types.find(var)),
        }
    }

    fn resolve_mut_var(&mut self, var: MutVar) -> Result<Mutability, MutVar> {
        match self.muts.probe_value(var) {
            Some(m) => Ok(m),
            None => Err(self.muts.find(var)),
        }
    }

    /// Resolve `ty` one level: if it is a solved unification variable,
    /// follow the chain to its solution; otherwise return it unchanged.
    pub fn shallow_resolve(&mut self, types: &TypeArena, ty: Type) -> Type {
        if let TypeVariant::UnificationVariable(var) | TypeVariant::IntegralUnificationVariable(var) =
            *types.get(ty)
        {
            if let Ok(solved) = self.resolve_var(var) {
                return self.shallow_resolve(types, solved);
            }
        }
        ty
    }

    pub fn resolve_mutability(&mut self, mutability: Mutability) -> Mutability {
        if let Mutability::Variable(var) = mutability {
            if let Ok(solved) = self.resolve_mut_var(var) {
                return self.resolve_mutability(solved);
            }
        }
        mutability
    }

    fn occurs_in(&mut self, types: &TypeArena, var: TypeVar, ty: Type) -> bool {
        let ty = self.shallow_resolve(types, ty);
        match types.get(ty) {
            TypeVariant::UnificationVariable(other) | TypeVariant::IntegralUnificationVariable(other) => {
                self.types.find(var) == self.types.find(*other)
            }
            TypeVariant::Tuple(elements) | TypeVariant::Structure { arguments: elements, .. }
            | TypeVariant::Enumeration { arguments: elements, .. } => {
                elements.iter().any(|&e| self.occurs_in(types, var, e))
            }
            TypeVariant::Array { element, .. } | TypeVariant::Slice(element) => {
                self.occurs_in(types, var, *element)
            }
            TypeVariant::Function { params, ret } => {
                params.iter().any(|&p| self.occurs_in(types, var, p)) || self.occurs_in(types, var, *ret)
            }
            TypeVariant::Reference { referent, .. } => self.occurs_in(types, var, *referent),
            TypeVariant::Pointer { pointee, .. } => self.occurs_in(types, var, *pointee),
            _ => false,
        }
    }

    /// Unify a mutability against an expected mutability, with the
    /// one-way coercion `&mut T` can be used where `&T` is expected.
    pub fn unify_mutability(&mut self, actual: Mutability, expected: Mutability) -> Result<(), UnifyError> {
        let actual = self.resolve_mutability(actual);
        let expected = self.resolve_mutability(expected);
        match (actual, expected) {
            (Mutability::Variable(a), Mutability::Variable(b)) => {
                self.muts.unify_var_var(a, b).map_err(|_| UnifyError::Mismatch)
            }
            (Mutability::Variable(v), other) | (other, Mutability::Variable(v)) => {
                self.muts.unify_var_value(v, Some(other)).map_err(|_| UnifyError::Mismatch)
            }
            (Mutability::Concrete(true), Mutability::Concrete(false)) => Ok(()), // &mut T -> &T coercion
            (Mutability::Concrete(a), Mutability::Concrete(b)) if a == b => Ok(()),
            (Mutability::Parameterized(a), Mutability::Parameterized(b)) if a == b => Ok(()),
            _ => Err(UnifyError::Mismatch),
        }
    }

    /// Structurally unify two types. `types` is mutated only by way of
    /// `TypeArena::alloc` if unification ever needs to synthesize a fresh
    /// node (it currently does not).
    pub fn unify(&mut self, types: &TypeArena, a: Type, b: Type) -> Result<(), UnifyError> {
        let a = self.shallow_resolve(types, a);
        let b = self.shallow_resolve(types, b);

        let a_var = match types.get(a) {
            TypeVariant::UnificationVariable(v) | TypeVariant::IntegralUnificationVariable(v) => Some(*v),
            _ => None,
        };
        let b_var = match types.get(b) {
            TypeVariant::UnificationVariable(v) | TypeVariant::IntegralUnificationVariable(v) => Some(*v),
            _ => None,
        };

        match (a_var, b_var) {
            (Some(va), Some(vb)) => {
                return self.types.unify_var_var(va, vb).map_err(|_| UnifyError::Mismatch);
            }
            (Some(v), None) => return self.bind(types, v, a, b),
            (None, Some(v)) => return self.bind(types, v, b, a),
            (None, None) => {}
        }

        match (types.get(a), types.get(b)) {
            (TypeVariant::Primitive(x), TypeVariant::Primitive(y)) if x == y => Ok(()),
            (TypeVariant::Error, _) | (_, TypeVariant::Error) => Ok(()),
            (TypeVariant::SelfPlaceholder, TypeVariant::SelfPlaceholder) => Ok(()),
            (TypeVariant::TemplateParameterReference(x), TypeVariant::TemplateParameterReference(y)) if x == y => {
                Ok(())
            }
            (TypeVariant::Tuple(xs), TypeVariant::Tuple(ys)) => self.unify_slices(types, xs, ys),
            (TypeVariant::Array { element: e1, length: l1 }, TypeVariant::Array { element: e2, length: l2 }) => {
                if l1 != l2 {
                    return Err(UnifyError::Mismatch);
                }
                self.unify(types, *e1, *e2)
            }
            (TypeVariant::Slice(e1), TypeVariant::Slice(e2)) => self.unify(types, *e1, *e2),
            (TypeVariant::Function { params: p1, ret: r1 }, TypeVariant::Function { params: p2, ret: r2 }) => {
                self.unify_slices(types, p1, p2)?;
                self.unify(types, *r1, *r2)
            }
            (
                TypeVariant::Reference { mutability: m1, referent: r1 },
                TypeVariant::Reference { mutability: m2, referent: r2 },
            ) => {
                self.unify_mutability(*m1, *m2)?;
                self.unify(types, *r1, *r2)
            }
            (
                TypeVariant::Pointer { mutability: m1, pointee: p1 },
                TypeVariant::Pointer { mutability: m2, pointee: p2 },
            ) => {
                self.unify_mutability(*m1, *m2)?;
                self.unify(types, *p1, *p2)
            }
            (
                TypeVariant::Structure { id: id1, arguments: a1, .. },
                TypeVariant::Structure { id: id2, arguments: a2, .. },
            ) if id1 == id2 => self.unify_slices(types, a1, a2),
            (
                TypeVariant::Enumeration { id: id1, arguments: a1, .. },
                TypeVariant::Enumeration { id: id2, arguments: a2, .. },
            ) if id1 == id2 => self.unify_slices(types, a1, a2),
            _ => Err(UnifyError::Mismatch),
        }
    }

    fn unify_slices(&mut self, types: &TypeArena, xs: &[Type], ys: &[Type]) -> Result<(), UnifyError> {
        if xs.len() != ys.len() {
            return Err(UnifyError::Arity);
        }
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            self.unify(types, x, y)?;
        }
        Ok(())
    }

    fn bind(&mut self, types: &TypeArena, var: TypeVar, var_ty: Type, target: Type) -> Result<(), UnifyError> {
        if self.occurs_in(types, var, target) {
            return Err(UnifyError::Occurs);
        }
        if let TypeVariant::IntegralUnificationVariable(_) = types.get(var_ty) {
            if !matches!(types.get(target), TypeVariant::Primitive(p) if INTEGRAL_PRIMITIVES.contains(p))
                && !matches!(types.get(target), TypeVariant::IntegralUnificationVariable(_) | TypeVariant::TemplateParameterReference(_))
            {
                return Err(UnifyError::Mismatch);
            }
        }
        self.types.unify_var_value(var, Some(target)).map_err(|_| UnifyError::Mismatch)
    }

    /// Fully resolve a type, recursively substituting any solved
    /// unification variables found inside tuples/functions/etc. Used once
    /// resolution of a definition is complete, right before generalization.
    pub fn deep_resolve(&mut self, types: &mut TypeArena, ty: Type) -> Type {
        let ty = self.shallow_resolve(types, ty);
        let variant = types.get(ty).clone();
        let rebuilt = match variant {
            TypeVariant::Tuple(elements) => {
                TypeVariant::Tuple(elements.iter().map(|&e| self.deep_resolve(types, e)).collect())
            }
            TypeVariant::Array { element, length } => {
                TypeVariant::Array { element: self.deep_resolve(types, element), length }
            }
            TypeVariant::Slice(element) => TypeVariant::Slice(self.deep_resolve(types, element)),
            TypeVariant::Function { params, ret } => TypeVariant::Function {
                params: params.iter().map(|&p| self.deep_resolve(types, p)).collect(),
                ret: self.deep_resolve(types, ret),
            },
            TypeVariant::Reference { mutability, referent } => TypeVariant::Reference {
                mutability: self.resolve_mutability(mutability),
                referent: self.deep_resolve(types, referent),
            },
            TypeVariant::Pointer { mutability, pointee } => TypeVariant::Pointer {
                mutability: self.resolve_mutability(mutability),
                pointee: self.deep_resolve(types, pointee),
            },
            TypeVariant::Structure { id, arguments, is_template_application } => TypeVariant::Structure {
                id,
                arguments: arguments.iter().map(|&a| self.deep_resolve(types, a)).collect(),
                is_template_application,
            },
            TypeVariant::Enumeration { id, arguments, is_template_application } => TypeVariant::Enumeration {
                id,
                arguments: arguments.iter().map(|&a| self.deep_resolve(types, a)).collect(),
                is_template_application,
            },
            other => other,
        };
        types.alloc(rebuilt)
    }

    /// Pin every still-unsolved integral literal variable to `I32`, the
    /// default when nothing else constrained it.
    pub fn default_integral_var(&mut self, var: TypeVar) {
        let _ = self.types.unify_var_value(var, None);
    }

    pub fn is_unsolved(&mut self, types: &TypeArena, ty: Type) -> bool {
        let ty = self.shallow_resolve(types, ty);
        matches!(types.get(ty), TypeVariant::UnificationVariable(_) | TypeVariant::IntegralUnificationVariable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_hir::Primitive;

    #[test]
    fn identical_primitives_unify() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let a = types.alloc(TypeVariant::Primitive(Primitive::I32));
        let b = types.alloc(TypeVariant::Primitive(Primitive::I32));
        assert_eq!(infer.unify(&types, a, b), Ok(()));
    }

    #[test]
    fn mismatched_primitives_fail() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let a = types.alloc(TypeVariant::Primitive(Primitive::I32));
        let b = types.alloc(TypeVariant::Primitive(Primitive::Bool));
        assert_eq!(infer.unify(&types, a, b), Err(UnifyError::Mismatch));
    }

    #[test]
    fn unification_variable_binds_to_concrete_type() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let var = infer.fresh_type_var();
        let var_ty = types.alloc(TypeVariant::UnificationVariable(var));
        let concrete = types.alloc(TypeVariant::Primitive(Primitive::U8));
        assert_eq!(infer.unify(&types, var_ty, concrete), Ok(()));
        assert_eq!(infer.shallow_resolve(&types, var_ty), concrete);
    }

    #[test]
    fn occurs_check_rejects_infinite_type() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let var = infer.fresh_type_var();
        let var_ty = types.alloc(TypeVariant::UnificationVariable(var));
        let tuple = types.alloc(TypeVariant::Tuple(vec![var_ty]));
        assert_eq!(infer.unify(&types, var_ty, tuple), Err(UnifyError::Occurs));
    }

    #[test]
    fn mutable_reference_coerces_to_shared_reference() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let u8_ty = types.alloc(TypeVariant::Primitive(Primitive::U8));
        let mut_ref = types.alloc(TypeVariant::Reference { mutability: Mutability::Concrete(true), referent: u8_ty });
        let shared_ref =
            types.alloc(TypeVariant::Reference { mutability: Mutability::Concrete(false), referent: u8_ty });
        assert_eq!(infer.unify(&types, mut_ref, shared_ref), Ok(()));
    }

    #[test]
    fn shared_reference_does_not_coerce_to_mutable() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let u8_ty = types.alloc(TypeVariant::Primitive(Primitive::U8));
        let mut_ref = types.alloc(TypeVariant::Reference { mutability: Mutability::Concrete(true), referent: u8_ty });
        let shared_ref =
            types.alloc(TypeVariant::Reference { mutability: Mutability::Concrete(false), referent: u8_ty });
        assert_eq!(infer.unify(&types, shared_ref, mut_ref), Err(UnifyError::Mismatch));
    }

    #[test]
    fn tuple_arity_mismatch_is_rejected() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let u8_ty = types.alloc(TypeVariant::Primitive(Primitive::U8));
        let a = types.alloc(TypeVariant::Tuple(vec![u8_ty]));
        let b = types.alloc(TypeVariant::Tuple(vec![u8_ty, u8_ty]));
        assert_eq!(infer.unify(&types, a, b), Err(UnifyError::Arity));
    }

    #[test]
    fn integral_unification_variable_solves_to_integral_primitive_only() {
        let mut types = TypeArena::new();
        let mut infer = InferCtx::new();
        let var = infer.fresh_type_var();
        let var_ty = types.alloc(TypeVariant::IntegralUnificationVariable(var));
        let bool_ty = types.alloc(TypeVariant::Primitive(Primitive::Bool));
        assert_eq!(infer.unify(&types, var_ty, bool_ty), Err(UnifyError::Mismatch));

        let i8_ty = types.alloc(TypeVariant::Primitive(Primitive::I8));
        assert_eq!(infer.unify(&types, var_ty, i8_ty), Ok(()));
    }
}
