use super::*;
use crate::TypeInterner;

#[test]
fn test_def_id_validity() {
    assert!(!DefId::INVALID.is_valid());
    assert!(DefId(1).is_valid());
    assert!(DefId(100).is_valid());
}

#[test]
fn test_definition_store_basic() {
    let store = DefinitionStore::new();

    let info = DefinitionInfo::class("Order", &[]).with_field("Total", TypeId::DECIMAL);
    let def_id = store.register(info);

    assert!(def_id.is_valid());
    assert!(store.contains(def_id));
    assert_eq!(store.get_kind(def_id), Some(DefKind::Class));
    assert_eq!(store.lookup("Order"), Some(def_id));
    assert_eq!(store.get_field_type(def_id, "Total"), Some(TypeId::DECIMAL));
    assert_eq!(store.get_field_type(def_id, "Missing"), None);
    assert!(store.has_default_constructor(def_id));
}

#[test]
fn test_interfaces_are_not_constructible() {
    let store = DefinitionStore::new();
    let def_id = store.register(DefinitionInfo::interface("IShape", &[]));
    assert!(!store.has_default_constructor(def_id));
}

#[test]
fn test_abstract_class_without_constructor() {
    let store = DefinitionStore::new();
    let def_id = store.register(DefinitionInfo::class("Entity", &[]).without_default_constructor());
    assert_eq!(store.get_kind(def_id), Some(DefKind::Class));
    assert!(!store.has_default_constructor(def_id));
}

#[test]
fn test_fields_can_be_attached_after_registration() {
    let interner = TypeInterner::new();
    let order = interner.define(DefinitionInfo::class("Order", &[]));
    let customer = interner.define(DefinitionInfo::class("Customer", &[]));

    let order_ty = interner.named(order);
    let customer_ty = interner.named(customer);
    let store = interner.definitions();

    store.set_fields(order, vec![FieldInfo::new("Customer", customer_ty)]);
    store.add_field(customer, FieldInfo::new("Orders", interner.list_of(order_ty)));

    assert_eq!(store.get_field_type(order, "Customer"), Some(customer_ty));
    assert_eq!(
        store.get_field_type(customer, "Orders"),
        Some(interner.list_of(order_ty))
    );
}

#[test]
fn test_generic_definition_arity() {
    let store = DefinitionStore::new();
    let pair = store.register(DefinitionInfo::class("Pair", &["TKey", "TValue"]));
    assert_eq!(store.get_arity(pair), Some(2));
    assert_eq!(store.get_name(pair).as_deref(), Some("Pair"));
}

#[test]
fn test_definition_store_concurrent_registration() {
    use rayon::prelude::*;

    let store = DefinitionStore::new();
    let ids: Vec<DefId> = (0..256)
        .into_par_iter()
        .map(|i| store.register(DefinitionInfo::class(&format!("Type{i}"), &[])))
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 256);
    assert_eq!(store.len(), 256);
    assert_eq!(store.lookup("Type42"), Some(ids[42]));
}
