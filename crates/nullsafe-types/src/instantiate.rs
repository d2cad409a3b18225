//! Generic instantiation: substitute positional type parameters.

use crate::intern::TypeInterner;
use crate::types::{NamedType, TypeData, TypeId};

/// Replace every `TypeParam(i)` in `ty` with `args[i]`.
///
/// Parameters without a matching argument are left in place, which keeps the
/// function total for partially applied signatures.
pub fn instantiate(db: &TypeInterner, ty: TypeId, args: &[TypeId]) -> TypeId {
    if args.is_empty() || ty.is_intrinsic() {
        return ty;
    }
    match db.lookup(ty) {
        Some(TypeData::TypeParam(index)) => args.get(index as usize).copied().unwrap_or(ty),
        Some(TypeData::Nullable(inner)) => db.nullable(instantiate(db, inner, args)),
        Some(TypeData::Array(element)) => db.array(instantiate(db, element, args)),
        Some(TypeData::Named(NamedType { def, args: own })) => {
            if own.is_empty() {
                return ty;
            }
            let substituted: Vec<TypeId> =
                own.iter().map(|&arg| instantiate(db, arg, args)).collect();
            db.generic(def, &substituted)
        }
        Some(TypeData::Intrinsic(_)) | None => ty,
    }
}
