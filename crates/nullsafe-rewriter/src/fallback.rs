//! Empty-instance fallbacks for collection and array types.
//!
//! When a guarded receiver is a collection, substituting an empty collection
//! keeps the query composable (`Count()` yields 0, `Where` yields nothing)
//! where a conditional would turn the whole result into null.

use nullsafe_expr::Expr;
use nullsafe_types::{
    DefId, TypeId, TypeInterner, array_element_type, generic_single_argument, is_assignable_to,
    is_constructible,
};

/// Build an expression producing an empty instance assignable to `ty`.
///
/// - single-argument generics (`IEnumerable<T>`, `ICollection<T>`,
///   `List<T>`, `ISet<T>`, ...) get `(ty)new List<T>()`, or
///   `(ty)new HashSet<T>()` when a list does not fit;
/// - arrays `E[]` get `new E[0]`;
/// - anything else has no fallback.
pub fn resolve_fallback(db: &TypeInterner, ty: TypeId) -> Option<Expr> {
    if let Some(element) = generic_single_argument(db, ty) {
        let known = db.well_known();
        return collection_fallback(db, known.list, element, ty)
            .or_else(|| collection_fallback(db, known.hash_set, element, ty));
    }

    if array_element_type(db, ty).is_some() {
        return Expr::new_array(db, ty, Vec::new()).ok();
    }

    None
}

/// `(ty)new definition<element>()` if that collection can stand in for `ty`.
fn collection_fallback(
    db: &TypeInterner,
    definition: DefId,
    element: TypeId,
    ty: TypeId,
) -> Option<Expr> {
    let collection = db.generic(definition, &[element]);
    if !is_constructible(db, collection) || !is_assignable_to(db, collection, ty) {
        return None;
    }
    Some(Expr::convert(Expr::new_object(collection, Vec::new()), ty))
}

#[cfg(test)]
#[path = "../tests/fallback_tests.rs"]
mod tests;
