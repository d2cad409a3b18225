use crate::{Expr, ExprKind};
use nullsafe_types::TypeId;

fn sample() -> Expr {
    // s.ToUpper() == "X" ? s.Length : 0
    let s = Expr::parameter("s", TypeId::STRING);
    let test = Expr::equal(
        Expr::call(s.clone(), "ToUpper", vec![], TypeId::STRING),
        Expr::string("X"),
    );
    Expr::condition(
        test,
        Expr::member_typed(s, "Length", TypeId::INT32),
        Expr::int(0),
        TypeId::INT32,
    )
}

#[test]
fn test_node_count_and_depth() {
    let expr = sample();
    // conditional, equal, call, s, "X", member, s, 0
    assert_eq!(expr.node_count(), 8);
    assert_eq!(expr.depth(), 4);
    assert_eq!(Expr::int(1).depth(), 1);
}

#[test]
fn test_identity_map_preserves_tree() {
    let expr = sample();
    let mapped = expr
        .clone()
        .try_map_children(Ok::<Expr, ()>)
        .expect("identity never fails");
    assert_eq!(mapped, expr);
}

#[test]
fn test_map_children_visits_in_evaluation_order() {
    let call = Expr::call(
        Expr::parameter("obj", TypeId::OBJECT),
        "M",
        vec![Expr::int(1), Expr::int(2)],
        TypeId::INT32,
    );
    let mut seen = Vec::new();
    let rebuilt = call
        .try_map_children(|child| {
            seen.push(child.clone());
            Ok::<_, ()>(Expr::default_of(child.ty))
        })
        .expect("no error");

    assert_eq!(seen.len(), 3);
    assert!(matches!(seen[0].kind, ExprKind::Parameter { .. }));
    assert_eq!(seen[1], Expr::int(1));
    assert_eq!(rebuilt.ty, TypeId::INT32);
    match rebuilt.kind {
        ExprKind::Call { object, args, .. } => {
            assert_eq!(object.map(|o| o.kind), Some(ExprKind::Default));
            assert!(args.iter().all(|a| a.kind == ExprKind::Default));
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_map_children_stops_at_first_error() {
    let expr = Expr::equal(Expr::int(1), Expr::int(2));
    let mut calls = 0;
    let result = expr.try_map_children(|_| {
        calls += 1;
        Err::<Expr, &str>("boom")
    });
    assert_eq!(result, Err("boom"));
    assert_eq!(calls, 1);
}

#[test]
fn test_any_node() {
    let expr = sample();
    assert!(expr.any_node(&|e| matches!(e.kind, ExprKind::Call { .. })));
    assert!(!expr.any_node(&|e| matches!(e.kind, ExprKind::Coalesce { .. })));
}

#[test]
fn test_let_children_are_value_then_body() {
    // _a = s.ToUpper(), _a.Length
    let value = Expr::call(Expr::parameter("s", TypeId::STRING), "ToUpper", vec![], TypeId::STRING);
    let bound = Expr::let_in("_a", value.clone(), |a| {
        Expr::member_typed(a, "Length", TypeId::INT32)
    });

    let mut seen = Vec::new();
    bound.for_each_child(|child| seen.push(child.clone()));
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], value);
    assert!(matches!(seen[1].kind, ExprKind::Member { .. }));

    assert_eq!(bound.node_count(), 5);
    assert!(bound.mentions_parameter("_a"));
    assert!(bound.mentions_parameter("s"));
    assert!(!bound.mentions_parameter("t"));
}
