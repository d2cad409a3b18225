use super::*;
use crate::def::{DefinitionInfo, FieldInfo};

fn create_test_interner() -> TypeInterner {
    TypeInterner::new()
}

#[test]
fn test_intrinsic_nullability() {
    let db = create_test_interner();

    assert!(!is_nullable_or_reference(&db, TypeId::INT32));
    assert!(!is_nullable_or_reference(&db, TypeId::BOOLEAN));
    assert!(!is_nullable_or_reference(&db, TypeId::DATE_TIME));
    assert!(!is_nullable_or_reference(&db, TypeId::VOID));
    assert!(is_nullable_or_reference(&db, TypeId::STRING));
    assert!(is_nullable_or_reference(&db, TypeId::OBJECT));
}

#[test]
fn test_named_nullability_follows_kind() {
    let db = create_test_interner();
    let class = db.named(db.define(DefinitionInfo::class("Order", &[])));
    let structure = db.named(db.define(DefinitionInfo::structure("Money")));
    let interface = db.named(db.define(DefinitionInfo::interface("IShape", &[])));

    assert!(is_nullable_or_reference(&db, class));
    assert!(is_nullable_or_reference(&db, interface));
    assert!(!is_nullable_or_reference(&db, structure));
    assert!(is_value_type(&db, structure));

    let optional_money = db.nullable(structure);
    assert!(is_nullable_or_reference(&db, optional_money));
    assert!(is_value_type(&db, optional_money));
    assert!(!is_value_type(&db, class));
    assert_eq!(nullable_underlying_type(&db, optional_money), Some(structure));
}

#[test]
fn test_arrays_and_type_params_are_references() {
    let db = create_test_interner();
    assert!(is_nullable_or_reference(&db, db.array(TypeId::INT32)));
    assert!(is_nullable_or_reference(&db, db.type_param(0)));
}

#[test]
fn test_generic_single_argument() {
    let db = create_test_interner();
    let pair = db.define(DefinitionInfo::class("Pair", &["TKey", "TValue"]));

    assert_eq!(
        generic_single_argument(&db, db.list_of(TypeId::STRING)),
        Some(TypeId::STRING)
    );
    assert_eq!(
        generic_single_argument(&db, db.enumerable_of(TypeId::INT32)),
        Some(TypeId::INT32)
    );
    assert_eq!(
        generic_single_argument(&db, db.generic(pair, &[TypeId::STRING, TypeId::INT32])),
        None
    );
    assert_eq!(generic_single_argument(&db, TypeId::STRING), None);
    assert_eq!(generic_single_argument(&db, db.array(TypeId::INT32)), None);
}

#[test]
fn test_array_element_type() {
    let db = create_test_interner();
    assert_eq!(
        array_element_type(&db, db.array(TypeId::DOUBLE)),
        Some(TypeId::DOUBLE)
    );
    assert_eq!(array_element_type(&db, db.list_of(TypeId::DOUBLE)), None);
}

#[test]
fn test_constructibility() {
    let db = create_test_interner();
    let known = *db.well_known();
    let entity = db.named(db.define(DefinitionInfo::class("Entity", &[]).without_default_constructor()));

    assert!(is_constructible(&db, db.list_of(TypeId::INT32)));
    assert!(is_constructible(&db, db.hash_set_of(TypeId::INT32)));
    assert!(!is_constructible(&db, db.enumerable_of(TypeId::INT32)));
    assert!(!is_constructible(&db, entity));
    assert!(!is_constructible(&db, TypeId::STRING));
    assert!(is_constructible(&db, TypeId::INT32));
    // Open generic definitions are not constructible
    assert!(!is_constructible(&db, db.named(known.list)));
}

#[test]
fn test_field_type_inherited_and_instantiated() {
    let db = create_test_interner();
    let entity = db.define(DefinitionInfo::class("Entity", &["TKey"]).without_default_constructor());
    db.definitions()
        .set_fields(entity, vec![FieldInfo::new("Id", db.type_param(0))]);
    let order = db.define(
        DefinitionInfo::class("Order", &[]).with_bases(vec![db.generic(entity, &[TypeId::INT64])]),
    );
    let order_ty = db.named(order);

    assert_eq!(field_type(&db, order_ty, "Id"), Some(TypeId::INT64));
    assert_eq!(field_type(&db, order_ty, "Nope"), None);

    // Count is declared on ICollection<T>, reached through IList<T>
    assert_eq!(
        field_type(&db, db.list_of(order_ty), "Count"),
        Some(TypeId::INT32)
    );
}

#[test]
fn test_field_type_special_members() {
    let db = create_test_interner();
    assert_eq!(
        field_type(&db, db.array(TypeId::STRING), "Length"),
        Some(TypeId::INT32)
    );
    assert_eq!(field_type(&db, TypeId::STRING, "Length"), Some(TypeId::INT32));

    let int_opt = db.nullable(TypeId::INT32);
    assert_eq!(field_type(&db, int_opt, "Value"), Some(TypeId::INT32));
    assert_eq!(field_type(&db, int_opt, "HasValue"), Some(TypeId::BOOLEAN));
}

#[test]
fn test_field_type_tolerates_cyclic_bases() {
    let db = create_test_interner();
    let a = db.define(DefinitionInfo::interface("IA", &[]));
    let b = db.define(DefinitionInfo::interface("IB", &[]));
    db.definitions().set_bases(a, vec![db.named(b)]);
    db.definitions().set_bases(b, vec![db.named(a)]);

    assert_eq!(field_type(&db, db.named(a), "Missing"), None);
}
