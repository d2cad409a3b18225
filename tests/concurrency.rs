//! Rewriting from many threads against one shared context.

use nullsafe::NullsafeContext;
use nullsafe::expr::Expr;
use nullsafe::types::{DefinitionInfo, TypeId, TypeInterner};
use rayon::prelude::*;

/// `Node0 .. NodeN`, each with a `Next` link, a `Children` list and a `Tags` set.
fn declare_chain(db: &TypeInterner, len: usize) -> Vec<TypeId> {
    let mut nodes: Vec<TypeId> = Vec::with_capacity(len);
    for i in (0..len).rev() {
        let mut info = DefinitionInfo::class(&format!("Node{i}"), &[])
            .with_field("Label", TypeId::STRING)
            .with_field("Tags", db.hash_set_of(TypeId::STRING));
        if let Some(&next) = nodes.last() {
            info = info
                .with_field("Next", next)
                .with_field("Children", db.enumerable_of(next));
        }
        nodes.push(db.named(db.define(info)));
    }
    nodes.reverse();
    nodes
}

fn queries(db: &TypeInterner, nodes: &[TypeId]) -> Vec<Expr> {
    let mut out = Vec::new();
    for start in 0..nodes.len() - 1 {
        let mut chain = Expr::parameter("n", nodes[start]);
        for _ in start..nodes.len() - 1 {
            chain = Expr::member(db, chain, "Next").expect("member exists");
            out.push(Expr::member(db, chain.clone(), "Label").expect("member exists"));
            let tags = Expr::member(db, chain.clone(), "Tags").expect("member exists");
            out.push(
                Expr::extension_call("Enumerable", "Count", vec![tags], TypeId::INT32)
                    .expect("receiver"),
            );
        }
        let root = Expr::parameter("n", nodes[start]);
        let children = Expr::member(db, root, "Children").expect("member exists");
        out.push(
            Expr::extension_call("Enumerable", "Any", vec![children], TypeId::BOOLEAN)
                .expect("receiver"),
        );
    }
    out
}

#[test]
fn test_parallel_rewrites_match_sequential() {
    let sequential_ctx = NullsafeContext::new();
    let nodes = declare_chain(sequential_ctx.types(), 8);
    let work = queries(sequential_ctx.types(), &nodes);
    let expected: Vec<String> = work
        .iter()
        .map(|q| {
            let rewritten = sequential_ctx.rewrite(q).expect("rewrites");
            sequential_ctx.print(&rewritten)
        })
        .collect();

    let shared = NullsafeContext::new();
    let nodes = declare_chain(shared.types(), 8);
    let work = queries(shared.types(), &nodes);
    let actual: Vec<String> = work
        .par_iter()
        .map(|q| {
            let rewritten = shared.rewrite(q).expect("rewrites");
            shared.print(&rewritten)
        })
        .collect();

    assert_eq!(actual, expected);
    assert_eq!(shared.fallbacks().len(), sequential_ctx.fallbacks().len());
}

#[test]
fn test_each_fallback_is_stored_once_under_contention() {
    let ctx = NullsafeContext::new();
    let nodes = declare_chain(ctx.types(), 6);
    let work = queries(ctx.types(), &nodes);

    (0..16).into_par_iter().for_each(|_| {
        for q in &work {
            ctx.rewrite(q).expect("rewrites");
        }
    });

    let stats = ctx.fallbacks().stats();
    assert_eq!(stats.entries, ctx.fallbacks().len());
    // Every lookup after the first per type is a hit
    assert!(stats.hits > stats.misses);

    let tags = ctx.types().hash_set_of(TypeId::STRING);
    let entry = ctx.fallbacks().get(tags).flatten().expect("set fallback cached");
    assert_eq!(ctx.print(&entry), "((HashSet<string>)new HashSet<string>())");
}
