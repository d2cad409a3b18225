use super::*;
use crate::def::DefinitionInfo;

#[test]
fn test_identity_and_object() {
    let db = TypeInterner::new();
    let list = db.list_of(TypeId::INT32);

    assert!(is_assignable_to(&db, list, list));
    assert!(is_assignable_to(&db, list, TypeId::OBJECT));
    assert!(is_assignable_to(&db, TypeId::INT32, TypeId::OBJECT));
    assert!(!is_assignable_to(&db, TypeId::OBJECT, list));
}

#[test]
fn test_list_implements_collection_interfaces() {
    let db = TypeInterner::new();
    let known = *db.well_known();
    let list = db.list_of(TypeId::STRING);

    for def in [
        known.enumerable,
        known.collection,
        known.list_interface,
        known.read_only_collection,
        known.read_only_list,
    ] {
        let target = db.generic(def, &[TypeId::STRING]);
        assert!(is_assignable_to(&db, list, target), "List<string> -> {def:?}");
    }

    assert!(!is_assignable_to(&db, list, db.generic(known.set_interface, &[TypeId::STRING])));
    // Invariant in the element type
    assert!(!is_assignable_to(&db, list, db.enumerable_of(TypeId::OBJECT)));
}

#[test]
fn test_hash_set_implements_set_interfaces() {
    let db = TypeInterner::new();
    let known = *db.well_known();
    let set = db.hash_set_of(TypeId::INT32);

    assert!(is_assignable_to(&db, set, db.generic(known.set_interface, &[TypeId::INT32])));
    assert!(is_assignable_to(&db, set, db.enumerable_of(TypeId::INT32)));
    assert!(!is_assignable_to(&db, set, db.generic(known.list_interface, &[TypeId::INT32])));
}

#[test]
fn test_base_types_are_instantiated() {
    let db = TypeInterner::new();
    let known = *db.well_known();
    let bases = base_types(&db, db.list_of(TypeId::CHAR));

    assert_eq!(bases.len(), 2);
    assert!(bases.contains(&db.generic(known.list_interface, &[TypeId::CHAR])));
    assert!(bases.contains(&db.generic(known.read_only_list, &[TypeId::CHAR])));
}

#[test]
fn test_user_class_hierarchy() {
    let db = TypeInterner::new();
    let animal = db.define(DefinitionInfo::class("Animal", &[]));
    let dog = db.define(DefinitionInfo::class("Dog", &[]).with_bases(vec![db.named(animal)]));

    assert!(is_assignable_to(&db, db.named(dog), db.named(animal)));
    assert!(!is_assignable_to(&db, db.named(animal), db.named(dog)));
}

#[test]
fn test_arrays_implement_list_interfaces() {
    let db = TypeInterner::new();
    let known = *db.well_known();
    let array = db.array(TypeId::INT32);

    assert!(is_assignable_to(&db, array, db.enumerable_of(TypeId::INT32)));
    assert!(is_assignable_to(&db, array, db.generic(known.list_interface, &[TypeId::INT32])));
    assert!(!is_assignable_to(&db, array, db.generic(known.set_interface, &[TypeId::INT32])));
    assert!(!is_assignable_to(&db, array, db.list_of(TypeId::INT32)));
}

#[test]
fn test_value_type_to_nullable() {
    let db = TypeInterner::new();
    let int_opt = db.nullable(TypeId::INT32);

    assert!(is_assignable_to(&db, TypeId::INT32, int_opt));
    assert!(!is_assignable_to(&db, int_opt, TypeId::INT32));
    assert!(!is_assignable_to(&db, TypeId::INT64, int_opt));
}

#[test]
fn test_cyclic_bases_terminate() {
    let db = TypeInterner::new();
    let a = db.define(DefinitionInfo::interface("IA", &[]));
    let b = db.define(DefinitionInfo::interface("IB", &[]));
    db.definitions().set_bases(a, vec![db.named(b)]);
    db.definitions().set_bases(b, vec![db.named(a)]);

    assert!(is_assignable_to(&db, db.named(a), db.named(b)));
    assert!(!is_assignable_to(&db, db.named(a), TypeId::STRING));
}
