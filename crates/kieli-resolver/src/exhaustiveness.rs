//! Pattern-match exhaustiveness and redundancy, via Maranget's usefulness
//! algorithm: a row is useful against a matrix iff some value it matches is
//! matched by no row of the matrix. A `match` is exhaustive iff the
//! all-wildcard row is useless against its arms; arm `i` is redundant iff
//! its row is useless against arms `0..i`.
//!
//! Patterns are lowered into a constructor tree ([`SimplePat`]) first:
//! tuples and record structs have exactly one constructor shape, so a
//! single occurrence of either makes that column complete; enum
//! constructors are complete only once every variant name is present;
//! every other literal domain (integers, floats, strings) is treated as
//! infinite and is never complete on its own.

use kieli_common::interner::StringId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CtorKey {
    Bool(bool),
    /// Any other literal kind, identified by its rendered value. The
    /// domain is treated as infinite regardless of which values appear.
    Lit(String),
    Tuple,
    Struct,
    Variant(StringId),
}

#[derive(Debug, Clone)]
pub enum PatCtor {
    Wildcard,
    Concrete(CtorKey),
}

#[derive(Debug, Clone)]
pub struct SimplePat {
    pub ctor: PatCtor,
    pub args: Vec<SimplePat>,
}

impl SimplePat {
    pub fn wildcard() -> Self {
        SimplePat { ctor: PatCtor::Wildcard, args: Vec::new() }
    }

    fn ctor_key(&self) -> Option<&CtorKey> {
        match &self.ctor {
            PatCtor::Wildcard => None,
            PatCtor::Concrete(key) => Some(key),
        }
    }
}

type Row = Vec<SimplePat>;

fn signature(rows: &[Row]) -> Vec<(CtorKey, usize)> {
    let mut seen: Vec<(CtorKey, usize)> = Vec::new();
    for row in rows {
        if let Some(head) = row.first() {
            if let Some(key) = head.ctor_key() {
                if !seen.iter().any(|(k, _)| k == key) {
                    seen.push((key.clone(), head.args.len()));
                }
            }
        }
    }
    seen
}

fn is_signature_complete<K>(sig: &[(CtorKey, usize)], enum_variants: &FxHashMap<K, Vec<StringId>>) -> bool {
    if sig.is_empty() {
        return false;
    }
    if sig.iter().any(|(k, _)| matches!(k, CtorKey::Lit(_))) {
        return false;
    }
    if sig.iter().any(|(k, _)| matches!(k, CtorKey::Tuple | CtorKey::Struct)) {
        return true;
    }
    if sig.iter().all(|(k, _)| matches!(k, CtorKey::Bool(_))) {
        return sig.iter().any(|(k, _)| matches!(k, CtorKey::Bool(true)))
            && sig.iter().any(|(k, _)| matches!(k, CtorKey::Bool(false)));
    }
    if sig.iter().all(|(k, _)| matches!(k, CtorKey::Variant(_))) {
        let present: Vec<StringId> = sig
            .iter()
            .filter_map(|(k, _)| if let CtorKey::Variant(name) = k { Some(*name) } else { None })
            .collect();
        return enum_variants.values().any(|variants| {
            variants.len() == present.len() && variants.iter().all(|v| present.contains(v))
        });
    }
    false
}

fn specialize(rows: &[Row], key: &CtorKey, arity: usize) -> Vec<Row> {
    rows.iter()
        .filter_map(|row| {
            let (head, rest) = row.split_first()?;
            match &head.ctor {
                PatCtor::Wildcard => {
                    let mut expanded: Row = (0..arity).map(|_| SimplePat::wildcard()).collect();
                    expanded.extend_from_slice(rest);
                    Some(expanded)
                }
                PatCtor::Concrete(k) if k == key => {
                    let mut expanded = head.args.clone();
                    expanded.extend_from_slice(rest);
                    Some(expanded)
                }
                _ => None,
            }
        })
        .collect()
}

fn default_matrix(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .filter_map(|row| {
            let (head, rest) = row.split_first()?;
            match head.ctor {
                PatCtor::Wildcard => Some(rest.to_vec()),
                PatCtor::Concrete(_) => None,
            }
        })
        .collect()
}

/// Whether `query` is useful against `rows`: there exists a value `query`
/// matches that no row of `rows` matches.
pub fn is_useful<K>(rows: &[Row], query: &Row, enum_variants: &FxHashMap<K, Vec<StringId>>) -> bool {
    let Some((head, rest)) = query.split_first() else {
        return rows.is_empty();
    };

    match &head.ctor {
        PatCtor::Concrete(key) => {
            let arity = head.args.len();
            let mut specialized_query = head.args.clone();
            specialized_query.extend_from_slice(rest);
            is_useful(&specialize(rows, key, arity), &specialized_query, enum_variants)
        }
        PatCtor::Wildcard => {
            let sig = signature(rows);
            if is_signature_complete(&sig, enum_variants) {
                sig.iter().any(|(key, arity)| {
                    let mut specialized_query: Row = (0..*arity).map(|_| SimplePat::wildcard()).collect();
                    specialized_query.extend_from_slice(rest);
                    is_useful(&specialize(rows, key, *arity), &specialized_query, enum_variants)
                })
            } else {
                is_useful(&default_matrix(rows), rest, enum_variants)
            }
        }
    }
}

/// A `match`/`let` scrutinee is exhaustively covered iff the all-wildcard
/// row is useless against every arm seen so far.
pub fn is_exhaustive<K>(rows: &[Row], enum_variants: &FxHashMap<K, Vec<StringId>>) -> bool {
    !is_useful(rows, &vec![SimplePat::wildcard()], enum_variants)
}

/// Arm `row` is redundant iff it matches nothing not already matched by
/// `rows_before` (the arms above it).
pub fn is_redundant<K>(rows_before: &[Row], row: &Row, enum_variants: &FxHashMap<K, Vec<StringId>>) -> bool {
    !is_useful(rows_before, row, enum_variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interner_with(names: &[&str]) -> (kieli_common::interner::StringInterner, Vec<kieli_common::interner::StringId>) {
        let mut interner = kieli_common::interner::StringInterner::new();
        let ids = names.iter().map(|n| interner.intern(n)).collect();
        (interner, ids)
    }

    #[test]
    fn wildcard_alone_is_exhaustive() {
        let enum_variants = FxHashMap::default();
        let rows = vec![vec![SimplePat::wildcard()]];
        assert!(is_exhaustive(&rows, &enum_variants));
    }

    #[test]
    fn bool_needs_both_arms() {
        let enum_variants = FxHashMap::default();
        let rows = vec![vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Bool(true)), args: vec![] }]];
        assert!(!is_exhaustive(&rows, &enum_variants));
        let rows = vec![
            vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Bool(true)), args: vec![] }],
            vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Bool(false)), args: vec![] }],
        ];
        assert!(is_exhaustive(&rows, &enum_variants));
    }

    #[test]
    fn enum_requires_every_variant_covered() {
        let (_interner, ids) = interner_with(&["none", "some"]);
        let mut enum_variants = FxHashMap::default();
        enum_variants.insert(ids[0], vec![ids[0], ids[1]]);

        let none_row = vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Variant(ids[0])), args: vec![] }];
        let rows = vec![none_row.clone()];
        assert!(!is_exhaustive(&rows, &enum_variants), "missing `some` arm");

        let some_row = vec![SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Variant(ids[1])),
            args: vec![SimplePat::wildcard()],
        }];
        let rows = vec![none_row, some_row];
        assert!(is_exhaustive(&rows, &enum_variants));
    }

    #[test]
    fn redundant_wildcard_after_exhaustive_enum() {
        let (_interner, ids) = interner_with(&["none", "some"]);
        let mut enum_variants = FxHashMap::default();
        enum_variants.insert(ids[0], vec![ids[0], ids[1]]);

        let none_row = vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Variant(ids[0])), args: vec![] }];
        let some_row = vec![SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Variant(ids[1])),
            args: vec![SimplePat::wildcard()],
        }];
        let rows_before = vec![none_row, some_row];
        let redundant_row = vec![SimplePat::wildcard()];
        assert!(is_redundant(&rows_before, &redundant_row, &enum_variants));
    }

    #[test]
    fn tuple_pattern_is_a_single_complete_constructor() {
        let enum_variants = FxHashMap::default();
        let rows = vec![vec![SimplePat {
            ctor: PatCtor::Concrete(CtorKey::Tuple),
            args: vec![SimplePat::wildcard(), SimplePat::wildcard()],
        }]];
        assert!(is_exhaustive(&rows, &enum_variants));
    }

    #[test]
    fn integer_literal_is_never_exhaustive_alone() {
        let enum_variants = FxHashMap::default();
        let rows = vec![vec![SimplePat { ctor: PatCtor::Concrete(CtorKey::Lit("5".to_owned())), args: vec![] }]];
        assert!(!is_exhaustive(&rows, &enum_variants));
    }
}
