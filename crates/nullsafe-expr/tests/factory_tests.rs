use crate::{BinaryOp, BuildError, ConstValue, Expr, ExprKind, NodeKind};
use nullsafe_types::{DefinitionInfo, TypeId, TypeInterner};

fn order_model(db: &TypeInterner) -> (TypeId, TypeId) {
    let address = db.named(db.define(
        DefinitionInfo::class("Address", &[]).with_field("City", TypeId::STRING),
    ));
    let customer = db.named(db.define(
        DefinitionInfo::class("Customer", &[])
            .with_field("Address", address)
            .with_field("Age", TypeId::INT32),
    ));
    (customer, address)
}

#[test]
fn test_member_resolves_field_type() {
    let db = TypeInterner::new();
    let (customer, address) = order_model(&db);

    let c = Expr::parameter("c", customer);
    let addr = Expr::member(&db, c, "Address").expect("Address exists");
    assert_eq!(addr.ty, address);
    assert_eq!(addr.node_kind(), NodeKind::MemberAccess);

    let city = Expr::member(&db, addr, "City").expect("City exists");
    assert_eq!(city.ty, TypeId::STRING);
    match &city.kind {
        ExprKind::Member { target, member } => {
            assert_eq!(&*member.name, "City");
            assert_eq!(member.declaring_type, address);
            assert!(target.is_some());
        }
        other => panic!("expected member access, got {other:?}"),
    }
}

#[test]
fn test_member_unknown_name_is_error() {
    let db = TypeInterner::new();
    let (customer, _) = order_model(&db);

    let err = Expr::member(&db, Expr::parameter("c", customer), "Email").unwrap_err();
    assert_eq!(
        err,
        BuildError::UnknownMember {
            ty: customer,
            member: "Email".to_string()
        }
    );
}

#[test]
fn test_extension_call_requires_receiver() {
    let ok = Expr::extension_call(
        "Enumerable",
        "Count",
        vec![Expr::parameter("xs", TypeId::OBJECT)],
        TypeId::INT32,
    )
    .expect("receiver supplied");
    match &ok.kind {
        ExprKind::Call { object, method, args } => {
            assert!(object.is_none());
            assert!(method.is_extension);
            assert_eq!(method.owner.as_deref(), Some("Enumerable"));
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected call, got {other:?}"),
    }

    assert!(matches!(
        Expr::extension_call("Enumerable", "Count", vec![], TypeId::INT32),
        Err(BuildError::MissingReceiver { .. })
    ));
}

#[test]
fn test_operator_result_types() {
    let eq = Expr::equal(Expr::int(1), Expr::int(2));
    assert_eq!(eq.ty, TypeId::BOOLEAN);

    let sum = Expr::binary(BinaryOp::Add, Expr::double(1.5), Expr::double(2.0));
    assert_eq!(sum.ty, TypeId::DOUBLE);

    let not = Expr::not(Expr::bool(true));
    assert_eq!(not.ty, TypeId::BOOLEAN);

    let coalesce = Expr::coalesce(Expr::null(TypeId::STRING), Expr::string("x"));
    assert_eq!(coalesce.ty, TypeId::STRING);

    let lambda = Expr::lambda(vec![("x", TypeId::INT32)], Expr::parameter("x", TypeId::INT32));
    assert_eq!(lambda.ty, TypeId::OBJECT);
}

#[test]
fn test_try_condition_validates() {
    let ok = Expr::try_condition(Expr::bool(true), Expr::int(1), Expr::int(2)).expect("valid");
    assert_eq!(ok.ty, TypeId::INT32);

    assert_eq!(
        Expr::try_condition(Expr::int(0), Expr::int(1), Expr::int(2)),
        Err(BuildError::NonBooleanCondition {
            found: TypeId::INT32
        })
    );
    assert_eq!(
        Expr::try_condition(Expr::bool(true), Expr::int(1), Expr::string("a")),
        Err(BuildError::BranchTypeMismatch {
            if_true: TypeId::INT32,
            if_false: TypeId::STRING
        })
    );
}

#[test]
fn test_arrays() {
    let db = TypeInterner::new();
    let ints = db.array(TypeId::INT32);

    let empty = Expr::new_array(&db, ints, vec![]).expect("array type");
    assert_eq!(empty.ty, ints);

    let filled = Expr::new_array(&db, ints, vec![Expr::int(1), Expr::int(2)]).expect("ints");
    let first = Expr::index(&db, filled, Expr::int(0)).expect("indexable");
    assert_eq!(first.ty, TypeId::INT32);

    assert_eq!(
        Expr::new_array(&db, TypeId::STRING, vec![]),
        Err(BuildError::NotAnArray { ty: TypeId::STRING })
    );
    assert_eq!(
        Expr::new_array(&db, ints, vec![Expr::string("no")]),
        Err(BuildError::ElementTypeMismatch {
            expected: TypeId::INT32,
            found: TypeId::STRING
        })
    );
    assert!(Expr::index(&db, Expr::int(3), Expr::int(0)).is_err());
}

#[test]
fn test_null_and_default_leaves() {
    let null = Expr::null(TypeId::STRING);
    assert!(null.is_null_constant());
    assert_eq!(null.kind, ExprKind::Constant(ConstValue::Null));

    let zero = Expr::default_of(TypeId::INT32);
    assert_eq!(zero.node_kind(), NodeKind::Default);
    assert!(!zero.is_null_constant());
}

#[test]
fn test_let_in_types_from_value_and_body() {
    let db = TypeInterner::new();
    let (customer, _) = order_model(&db);
    let value = Expr::parameter("c", customer);

    let bound = Expr::let_in("_a", value.clone(), |a| {
        assert_eq!(a, Expr::parameter("_a", customer));
        Expr::member_typed(a, "Name", TypeId::STRING)
    });

    assert_eq!(bound.ty, TypeId::STRING);
    match bound.kind {
        ExprKind::Let { var, value: bound_value, .. } => {
            assert_eq!(&*var.name, "_a");
            assert_eq!(var.ty, customer);
            assert_eq!(*bound_value, value);
        }
        other => panic!("expected let, got {other:?}"),
    }
}
