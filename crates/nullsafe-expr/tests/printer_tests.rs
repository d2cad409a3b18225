use crate::{Expr, ExprPrinter};
use nullsafe_types::{DefinitionInfo, TypeId, TypeInterner};

#[test]
fn test_print_member_chain_and_guard() {
    let db = TypeInterner::new();
    let customer = db.named(db.define(
        DefinitionInfo::class("Customer", &[]).with_field("Name", TypeId::STRING),
    ));
    let c = Expr::parameter("c", customer);
    let name = Expr::member(&db, c.clone(), "Name").expect("field");

    let printer = ExprPrinter::new(&db);
    assert_eq!(printer.print(&name), "c.Name");

    let guarded = Expr::condition(
        Expr::equal(c, Expr::null(customer)),
        Expr::null(TypeId::STRING),
        name,
        TypeId::STRING,
    );
    assert_eq!(printer.print(&guarded), "((c == null) ? null : c.Name)");
}

#[test]
fn test_print_extension_call_with_lambda() {
    let db = TypeInterner::new();
    let list = db.list_of(TypeId::INT32);
    let xs = Expr::parameter("xs", list);
    let predicate = Expr::lambda(
        vec![("x", TypeId::INT32)],
        Expr::binary(
            crate::BinaryOp::GreaterThan,
            Expr::parameter("x", TypeId::INT32),
            Expr::int(2),
        ),
    );
    let call = Expr::extension_call("Enumerable", "Where", vec![xs, predicate], db.enumerable_of(TypeId::INT32))
        .expect("receiver");

    assert_eq!(
        ExprPrinter::new(&db).print(&call),
        "Enumerable.Where(xs, x => (x > 2))"
    );
}

#[test]
fn test_print_fallback_shapes() {
    let db = TypeInterner::new();
    let printer = ExprPrinter::new(&db);
    let enumerable = db.enumerable_of(TypeId::STRING);

    let fallback = Expr::convert(Expr::new_object(db.list_of(TypeId::STRING), vec![]), enumerable);
    assert_eq!(
        printer.print(&fallback),
        "((IEnumerable<string>)new List<string>())"
    );

    let empty = Expr::new_array(&db, db.array(TypeId::INT32), vec![]).expect("array");
    assert_eq!(printer.print(&empty), "new int[0]");

    let filled = Expr::new_array(&db, db.array(TypeId::INT32), vec![Expr::int(1), Expr::int(2)])
        .expect("array");
    assert_eq!(printer.print(&filled), "new int[] {1, 2}");

    let coalesce = Expr::coalesce(Expr::parameter("xs", db.array(TypeId::INT32)), empty);
    assert_eq!(printer.print(&coalesce), "(xs ?? new int[0])");
}

#[test]
fn test_print_leaves() {
    let db = TypeInterner::new();
    let printer = ExprPrinter::new(&db);

    assert_eq!(printer.print(&Expr::default_of(TypeId::INT32)), "default(int)");
    assert_eq!(printer.print(&Expr::string("a\"b")), "\"a\\\"b\"");
    assert_eq!(printer.print(&Expr::double(2.0)), "2.0");
    assert_eq!(printer.print(&Expr::bool(false)), "false");
    assert_eq!(
        printer.print(&Expr::static_member(TypeId::STRING, "Empty", TypeId::STRING)),
        "string.Empty"
    );
}

#[test]
fn test_print_let_assigns_at_first_use() {
    let db = TypeInterner::new();
    let customer = db.named(db.define(
        DefinitionInfo::class("Customer", &[]).with_field("Name", TypeId::STRING),
    ));
    let current = Expr::static_member(customer, "Current", customer);
    let bound = Expr::let_in("_a", current.clone(), |a| {
        Expr::condition(
            Expr::equal(a.clone(), Expr::null(customer)),
            Expr::null(TypeId::STRING),
            Expr::member_typed(a, "Name", TypeId::STRING),
            TypeId::STRING,
        )
    });
    let printer = ExprPrinter::new(&db);
    assert_eq!(
        printer.print(&bound),
        "(((_a = Customer.Current) == null) ? null : _a.Name)"
    );

    let unused = Expr::let_in("_a", current, |_| Expr::int(1));
    assert_eq!(printer.print(&unused), "(_a = Customer.Current, 1)");
}
