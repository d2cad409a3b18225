//! Semantic type queries.
//!
//! Small predicates over interned types that the rewriter and the expression
//! factory rely on. All of them work purely on static type metadata.

use crate::def::DefKind;
use crate::instantiate::instantiate;
use crate::intern::TypeInterner;
use crate::limits::MAX_BASE_TYPE_DEPTH;
use crate::relations::base_types;
use crate::types::{NamedType, TypeData, TypeId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Whether `ty` is a value type, `T?` included.
///
/// Non-nullable value types are the ones this returns true for that
/// [`is_nullable_or_reference`] rejects.
pub fn is_value_type(db: &TypeInterner, ty: TypeId) -> bool {
    match db.lookup(ty) {
        Some(TypeData::Intrinsic(kind)) => kind.is_value_type(),
        Some(TypeData::Nullable(_)) => true,
        Some(TypeData::Named(named)) => {
            db.definitions().get_kind(named.def) == Some(DefKind::Struct)
        }
        Some(TypeData::Array(_)) | Some(TypeData::TypeParam(_)) | None => false,
    }
}

/// Whether an expression of type `ty` may evaluate to null.
///
/// True for nullable value types and every reference type (strings, objects,
/// arrays, classes, interfaces). Unconstrained type parameters count as
/// reference types.
pub fn is_nullable_or_reference(db: &TypeInterner, ty: TypeId) -> bool {
    match db.lookup(ty) {
        Some(TypeData::Nullable(_)) => true,
        Some(_) => !is_value_type(db, ty),
        None => false,
    }
}

/// `T` for `T?`.
pub fn nullable_underlying_type(db: &TypeInterner, ty: TypeId) -> Option<TypeId> {
    match db.lookup(ty)? {
        TypeData::Nullable(inner) => Some(inner),
        _ => None,
    }
}

pub fn named_type(db: &TypeInterner, ty: TypeId) -> Option<NamedType> {
    match db.lookup(ty)? {
        TypeData::Named(named) => Some(named),
        _ => None,
    }
}

/// Type arguments of a constructed generic, empty for anything else.
pub fn generic_arguments(db: &TypeInterner, ty: TypeId) -> SmallVec<[TypeId; 2]> {
    named_type(db, ty).map(|n| n.args).unwrap_or_default()
}

/// `T` when `ty` is a constructed generic with exactly one type argument.
pub fn generic_single_argument(db: &TypeInterner, ty: TypeId) -> Option<TypeId> {
    match named_type(db, ty) {
        Some(named) if named.args.len() == 1 => Some(named.args[0]),
        _ => None,
    }
}

/// `E` for `E[]`.
pub fn array_element_type(db: &TypeInterner, ty: TypeId) -> Option<TypeId> {
    match db.lookup(ty)? {
        TypeData::Array(element) => Some(element),
        _ => None,
    }
}

/// Whether `new T()` would succeed for `ty`.
///
/// Value types are always default-constructible. Named reference types need
/// a parameterless constructor and must not be interfaces; generic
/// definitions must be fully constructed.
pub fn is_constructible(db: &TypeInterner, ty: TypeId) -> bool {
    match db.lookup(ty) {
        Some(TypeData::Named(named)) => {
            let defs = db.definitions();
            match defs.get_kind(named.def) {
                Some(DefKind::Struct) => true,
                Some(DefKind::Class) => {
                    defs.has_default_constructor(named.def)
                        && defs.get_arity(named.def) == Some(named.args.len())
                }
                Some(DefKind::Interface) | None => false,
            }
        }
        Some(TypeData::Intrinsic(kind)) => kind.is_value_type(),
        Some(TypeData::Nullable(_)) => true,
        Some(TypeData::Array(_)) | Some(TypeData::TypeParam(_)) | None => false,
    }
}

/// Declared type of field `name` on `ty`, searching base types and
/// substituting generic arguments (`List<Order>.Count`, `Entity<T>.Id`).
///
/// Arrays expose `Length`; nullable value types expose `HasValue` and
/// `Value`.
pub fn field_type(db: &TypeInterner, ty: TypeId, name: &str) -> Option<TypeId> {
    match db.lookup(ty)? {
        TypeData::Array(_) => (name == "Length").then_some(TypeId::INT32),
        TypeData::Nullable(inner) => match name {
            "HasValue" => Some(TypeId::BOOLEAN),
            "Value" => Some(inner),
            _ => None,
        },
        TypeData::Intrinsic(_) | TypeData::TypeParam(_) => {
            (ty == TypeId::STRING && name == "Length").then_some(TypeId::INT32)
        }
        TypeData::Named(_) => {
            let mut visited = FxHashSet::default();
            find_field(db, ty, name, &mut visited, 0)
        }
    }
}

fn find_field(
    db: &TypeInterner,
    ty: TypeId,
    name: &str,
    visited: &mut FxHashSet<TypeId>,
    depth: u32,
) -> Option<TypeId> {
    if depth > MAX_BASE_TYPE_DEPTH || !visited.insert(ty) {
        return None;
    }
    let named = named_type(db, ty)?;
    if let Some(declared) = db.definitions().get_field_type(named.def, name) {
        return Some(instantiate(db, declared, &named.args));
    }
    base_types(db, ty)
        .into_iter()
        .find_map(|base| find_field(db, base, name, visited, depth + 1))
}

#[cfg(test)]
#[path = "../tests/queries_tests.rs"]
mod tests;
