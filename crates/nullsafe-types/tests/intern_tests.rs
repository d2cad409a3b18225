use super::*;
use crate::def::DefKind;

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();

    // Intrinsics resolve without ever being interned
    assert_eq!(
        interner.lookup(TypeId::STRING),
        Some(TypeData::Intrinsic(IntrinsicKind::String))
    );
    assert_eq!(
        interner.lookup(TypeId::INT32),
        Some(TypeData::Intrinsic(IntrinsicKind::Int32))
    );
    assert_eq!(interner.intrinsic(IntrinsicKind::Double), TypeId::DOUBLE);
    assert_eq!(
        interner.intern(TypeData::Intrinsic(IntrinsicKind::Object)),
        TypeId::OBJECT
    );
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let a = interner.array(TypeId::STRING);
    let b = interner.array(TypeId::STRING);
    let c = interner.array(TypeId::INT32);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.0 >= TypeId::FIRST_USER);
}

#[test]
fn test_lookup_round_trips_structure() {
    let interner = TypeInterner::new();
    let list = interner.list_of(TypeId::INT32);

    match interner.lookup(list) {
        Some(TypeData::Named(named)) => {
            assert_eq!(named.def, interner.well_known().list);
            assert_eq!(named.args.as_slice(), &[TypeId::INT32]);
        }
        other => panic!("Expected List<int>, got {:?}", other),
    }
}

#[test]
fn test_lookup_unknown_id() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(TypeId::FIRST_USER + 100_000)), None);
    assert_eq!(interner.lookup(TypeId(50)), None);
}

#[test]
fn test_nullable_only_wraps_value_types() {
    let interner = TypeInterner::new();

    let int_opt = interner.nullable(TypeId::INT32);
    assert_eq!(interner.lookup(int_opt), Some(TypeData::Nullable(TypeId::INT32)));

    // `string?` and `int??` collapse
    assert_eq!(interner.nullable(TypeId::STRING), TypeId::STRING);
    assert_eq!(interner.nullable(int_opt), int_opt);
}

#[test]
fn test_well_known_collections_registered() {
    let interner = TypeInterner::new();
    let known = *interner.well_known();
    let defs = interner.definitions();

    assert_eq!(defs.lookup("List"), Some(known.list));
    assert_eq!(defs.lookup("HashSet"), Some(known.hash_set));
    assert_eq!(defs.lookup("IEnumerable"), Some(known.enumerable));
    assert_eq!(defs.get_kind(known.list), Some(DefKind::Class));
    assert_eq!(defs.get_kind(known.set_interface), Some(DefKind::Interface));
    assert_eq!(defs.get_arity(known.read_only_list), Some(1));
}

#[test]
fn test_concurrent_interning_agrees() {
    use rayon::prelude::*;
    use std::sync::Arc;

    let interner = Arc::new(TypeInterner::new());
    let ids: Vec<TypeId> = (0..64)
        .into_par_iter()
        .map(|i| {
            let element = if i % 2 == 0 { TypeId::INT32 } else { TypeId::STRING };
            interner.list_of(interner.array(element))
        })
        .collect();

    let int_list = interner.list_of(interner.array(TypeId::INT32));
    let string_list = interner.list_of(interner.array(TypeId::STRING));
    for (i, id) in ids.iter().enumerate() {
        let expected = if i % 2 == 0 { int_list } else { string_list };
        assert_eq!(*id, expected);
    }
}
