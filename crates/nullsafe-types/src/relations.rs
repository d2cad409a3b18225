//! Assignability between static types.
//!
//! Nominal and invariant: a type is assignable to itself, to `object`, and to
//! any base it (transitively) declares, with generic arguments substituted.
//! Arrays implement the read-only and mutable collection interfaces of their
//! element type, and a value type converts implicitly to its nullable form.

use crate::instantiate::instantiate;
use crate::intern::TypeInterner;
use crate::limits::MAX_BASE_TYPE_DEPTH;
use crate::queries::named_type;
use crate::types::{TypeData, TypeId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Direct bases of `ty` with the type's generic arguments substituted.
///
/// `List<int>` yields `IList<int>` and `IReadOnlyList<int>`.
pub fn base_types(db: &TypeInterner, ty: TypeId) -> SmallVec<[TypeId; 4]> {
    let Some(named) = named_type(db, ty) else {
        return SmallVec::new();
    };
    let Some(bases) = db.definitions().get_bases(named.def) else {
        return SmallVec::new();
    };
    bases
        .into_iter()
        .map(|base| instantiate(db, base, &named.args))
        .collect()
}

/// Whether a value of type `source` can be used where `target` is expected.
pub fn is_assignable_to(db: &TypeInterner, source: TypeId, target: TypeId) -> bool {
    if source == target || target == TypeId::OBJECT {
        return true;
    }

    match db.lookup(target) {
        Some(TypeData::Nullable(inner)) if inner == source => return true,
        _ => {}
    }

    match db.lookup(source) {
        Some(TypeData::Array(element)) => array_implements(db, element, target),
        Some(TypeData::Named(_)) => {
            let mut visited = FxHashSet::default();
            derives_from(db, source, target, &mut visited, 0)
        }
        _ => false,
    }
}

fn array_implements(db: &TypeInterner, element: TypeId, target: TypeId) -> bool {
    let Some(named) = named_type(db, target) else {
        return false;
    };
    named.args.len() == 1
        && named.args[0] == element
        && db.well_known().array_interfaces().contains(&named.def)
}

fn derives_from(
    db: &TypeInterner,
    source: TypeId,
    target: TypeId,
    visited: &mut FxHashSet<TypeId>,
    depth: u32,
) -> bool {
    if source == target {
        return true;
    }
    if depth > MAX_BASE_TYPE_DEPTH || !visited.insert(source) {
        return false;
    }
    base_types(db, source)
        .into_iter()
        .any(|base| derives_from(db, base, target, visited, depth + 1))
}

#[cfg(test)]
#[path = "../tests/relations_tests.rs"]
mod tests;
