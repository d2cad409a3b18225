use super::*;
use nullsafe_expr::ExprKind;
use nullsafe_types::DefinitionInfo;

fn list_fallback(db: &TypeInterner, element: TypeId, ty: TypeId) -> Expr {
    Expr::convert(Expr::new_object(db.list_of(element), vec![]), ty)
}

fn hash_set_fallback(db: &TypeInterner, element: TypeId, ty: TypeId) -> Expr {
    Expr::convert(Expr::new_object(db.hash_set_of(element), vec![]), ty)
}

#[test]
fn test_list_preferred_for_list_compatible_interfaces() {
    let db = TypeInterner::new();
    let known = *db.well_known();

    for def in [
        known.enumerable,
        known.collection,
        known.list_interface,
        known.read_only_collection,
        known.read_only_list,
        known.list,
    ] {
        let ty = db.generic(def, &[TypeId::INT32]);
        assert_eq!(
            resolve_fallback(&db, ty),
            Some(list_fallback(&db, TypeId::INT32, ty)),
            "{def:?}"
        );
    }
}

#[test]
fn test_hash_set_used_when_list_does_not_fit() {
    let db = TypeInterner::new();
    let known = *db.well_known();

    let set = db.generic(known.set_interface, &[TypeId::STRING]);
    assert_eq!(
        resolve_fallback(&db, set),
        Some(hash_set_fallback(&db, TypeId::STRING, set))
    );

    let concrete = db.hash_set_of(TypeId::STRING);
    assert_eq!(
        resolve_fallback(&db, concrete),
        Some(hash_set_fallback(&db, TypeId::STRING, concrete))
    );
}

#[test]
fn test_array_fallback_is_empty_array() {
    let db = TypeInterner::new();
    let strings = db.array(TypeId::STRING);

    let fallback = resolve_fallback(&db, strings).expect("arrays have a fallback");
    assert_eq!(fallback.ty, strings);
    assert_eq!(fallback.kind, ExprKind::NewArray { elements: vec![] });
}

#[test]
fn test_no_fallback_for_other_types() {
    let db = TypeInterner::new();
    let customer = db.named(db.define(DefinitionInfo::class("Customer", &[])));
    let boxed = db.define(DefinitionInfo::class("Box", &["T"]));
    let pair = db.define(DefinitionInfo::class("Pair", &["A", "B"]));

    assert_eq!(resolve_fallback(&db, TypeId::STRING), None);
    assert_eq!(resolve_fallback(&db, TypeId::OBJECT), None);
    assert_eq!(resolve_fallback(&db, customer), None);
    assert_eq!(resolve_fallback(&db, db.nullable(TypeId::INT32)), None);
    // Single type argument, but neither List<T> nor HashSet<T> is a Box<T>
    assert_eq!(resolve_fallback(&db, db.generic(boxed, &[TypeId::INT32])), None);
    assert_eq!(
        resolve_fallback(&db, db.generic(pair, &[TypeId::INT32, TypeId::STRING])),
        None
    );
}

#[test]
fn test_user_interface_implemented_by_list() {
    let db = TypeInterner::new();
    let known = *db.well_known();
    let t = db.type_param(0);

    // A user interface no BCL collection implements
    let bag = db.define(
        DefinitionInfo::interface("IBag", &["T"]).with_bases(vec![db.enumerable_of(t)]),
    );
    assert_eq!(resolve_fallback(&db, db.generic(bag, &[TypeId::INT32])), None);

    // Make List<T> implement it and the list fallback applies
    let mut list_bases = db.definitions().get_bases(known.list).unwrap_or_default();
    list_bases.push(db.generic(bag, &[t]));
    db.definitions().set_bases(known.list, list_bases);

    let ty = db.generic(bag, &[TypeId::INT32]);
    assert_eq!(
        resolve_fallback(&db, ty),
        Some(list_fallback(&db, TypeId::INT32, ty))
    );
}
