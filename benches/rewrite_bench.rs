//! Rewriter benchmarks.
//!
//! Measures guard insertion on long member chains and the effect of a warm
//! fallback cache on collection-heavy queries.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nullsafe::expr::{BinaryOp, Expr};
use nullsafe::types::{DefinitionInfo, FieldInfo, TypeId, TypeInterner};
use nullsafe::{NullsafeContext, NullsafeRewriter, TypeFallbackCache};

/// A self-referencing `Node { Next: Node, Items: IEnumerable<Node>, Name: string }`.
fn declare_node(db: &TypeInterner) -> TypeId {
    let def = db.define(DefinitionInfo::class("Node", &[]).with_field("Name", TypeId::STRING));
    let node = db.named(def);
    db.definitions().set_fields(
        def,
        vec![
            FieldInfo::new("Name", TypeId::STRING),
            FieldInfo::new("Next", node),
            FieldInfo::new("Items", db.enumerable_of(node)),
        ],
    );
    node
}

/// `n.Next.Next ... .Name` with `depth` links.
fn member_chain(db: &TypeInterner, node: TypeId, depth: usize) -> Expr {
    let mut expr = Expr::parameter("n", node);
    for _ in 0..depth {
        expr = Expr::member(db, expr, "Next").expect("member exists");
    }
    Expr::member(db, expr, "Name").expect("member exists")
}

/// `Count(n.Items) + Count(n.Next.Items) + ...` with `width` terms.
fn aggregate_sum(db: &TypeInterner, node: TypeId, width: usize) -> Expr {
    let mut target = Expr::parameter("n", node);
    let mut sum = Expr::int(0);
    for _ in 0..width {
        let items = Expr::member(db, target.clone(), "Items").expect("member exists");
        let count = Expr::extension_call("Enumerable", "Count", vec![items], TypeId::INT32)
            .expect("receiver");
        sum = Expr::binary(BinaryOp::Add, sum, count);
        target = Expr::member(db, target, "Next").expect("member exists");
    }
    sum
}

fn bench_member_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_member_chain");
    let ctx = NullsafeContext::new();
    let node = declare_node(ctx.types());

    for depth in [4, 16, 64, 256] {
        let expr = member_chain(ctx.types(), node, depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &expr, |b, expr| {
            b.iter(|| black_box(ctx.rewrite(expr).expect("rewrites")))
        });
    }
    group.finish();
}

fn bench_fallback_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_fallback_cache");
    let db = TypeInterner::new();
    let node = declare_node(&db);
    let expr = aggregate_sum(&db, node, 8);

    group.bench_function("cold", |b| {
        b.iter(|| {
            let cache = TypeFallbackCache::new();
            let rewriter = NullsafeRewriter::new(&db, &cache);
            black_box(rewriter.rewrite(&expr).expect("rewrites"))
        })
    });

    let warm = TypeFallbackCache::new();
    group.bench_function("warm", |b| {
        let rewriter = NullsafeRewriter::new(&db, &warm);
        b.iter(|| black_box(rewriter.rewrite(&expr).expect("rewrites")))
    });
    group.finish();
}

criterion_group!(benches, bench_member_chain, bench_fallback_cache);
criterion_main!(benches);
