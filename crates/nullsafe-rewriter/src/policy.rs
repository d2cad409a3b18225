//! When a receiver needs a null guard, and what the guard looks like.

use crate::cache::{FallbackEntry, TypeFallbackCache};
use crate::fallback::resolve_fallback;
use crate::temps::TempNames;
use nullsafe_expr::{Expr, ExprKind, ExprPrinter};
use nullsafe_types::{TypeFormatter, TypeId, TypeInterner, is_nullable_or_reference};
use tracing::debug;

/// How a guard protects its receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardStrategy {
    /// `(target ?? fallback)` substituted for the receiver
    Coalesce,
    /// `(target == null ? default : expression)` around the whole node, with
    /// a compound target bound to a variable first
    Conditional,
}

impl GuardStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            GuardStrategy::Coalesce => "coalesce",
            GuardStrategy::Conditional => "conditional",
        }
    }
}

/// Whether `expr` can be dereferenced without a guard.
///
/// Absent receivers (static members), method call results and constants are
/// trusted; otherwise only types that cannot hold null are safe. Trusting
/// call results keeps rewritten queries small at the cost of leaving
/// `a.M().B` unguarded.
///
/// Nodes that cannot produce null by construction are safe too: `new`
/// expressions, a conversion of a safe operand, and `x ?? y` with a safe
/// `y`. Those are exactly the shapes a coalescing guard leaves behind, so
/// rewriting its output again adds nothing.
pub fn is_safe(db: &TypeInterner, expr: Option<&Expr>) -> bool {
    let Some(expr) = expr else {
        return true;
    };
    match &expr.kind {
        ExprKind::Call { .. }
        | ExprKind::Constant(_)
        | ExprKind::New { .. }
        | ExprKind::NewArray { .. } => true,
        ExprKind::Convert { operand } => is_safe(db, Some(operand)),
        ExprKind::Coalesce { right, .. } if is_safe(db, Some(right)) => true,
        _ => !is_nullable_or_reference(db, expr.ty),
    }
}

/// Guard construction bound to one interner and its fallback cache.
#[derive(Clone, Copy)]
pub struct NullSafetyPolicy<'a> {
    db: &'a TypeInterner,
    cache: &'a TypeFallbackCache,
    empty_collection_results: bool,
}

impl<'a> NullSafetyPolicy<'a> {
    pub fn new(db: &'a TypeInterner, cache: &'a TypeFallbackCache) -> Self {
        NullSafetyPolicy {
            db,
            cache,
            empty_collection_results: false,
        }
    }

    /// See [`RewriteOptions::empty_collection_results`](crate::RewriteOptions).
    pub fn with_empty_collection_results(mut self, enabled: bool) -> Self {
        self.empty_collection_results = enabled;
        self
    }

    pub fn is_safe(&self, expr: Option<&Expr>) -> bool {
        is_safe(self.db, expr)
    }

    /// Guard a node whose receiver `target` may be null.
    ///
    /// `rebuild` reattaches a receiver to the node (member access, instance
    /// call or extension call) and must produce a node of type `result_ty`.
    /// It is called exactly once. When the target's type has a fallback it
    /// receives `target ?? fallback`. Otherwise the node is wrapped as
    /// `target == null ? default : node`; a target other than a plain
    /// parameter is first bound to a variable from `temps`, so it is
    /// evaluated once and the guard stays linear in the size of `target`.
    pub fn be_safe(
        &self,
        target: Expr,
        result_ty: TypeId,
        temps: &mut TempNames,
        rebuild: impl FnOnce(Expr) -> Expr,
    ) -> (Expr, GuardStrategy) {
        let target_ty = target.ty;
        if let Some(fallback) = self.fallback(target_ty) {
            self.log_guard(GuardStrategy::Coalesce, &target);
            let guarded = rebuild(Expr::coalesce(target, Expr::clone(&fallback)));
            return (guarded, GuardStrategy::Coalesce);
        }

        self.log_guard(GuardStrategy::Conditional, &target);
        let when_null = self.short_circuit_value(result_ty);
        let null_check = move |receiver: Expr| {
            let test = Expr::equal(receiver.clone(), Expr::null(target_ty));
            Expr::condition(test, when_null, rebuild(receiver), result_ty)
        };
        let guarded = if matches!(target.kind, ExprKind::Parameter { .. }) {
            null_check(target)
        } else {
            Expr::let_in(&temps.fresh(), target, null_check)
        };
        (guarded, GuardStrategy::Conditional)
    }

    fn fallback(&self, ty: TypeId) -> FallbackEntry {
        self.cache
            .get_or_compute(ty, |ty| resolve_fallback(self.db, ty))
    }

    /// Value of a conditional guard when the receiver is null.
    fn short_circuit_value(&self, result_ty: TypeId) -> Expr {
        if self.empty_collection_results {
            if let Some(empty) = self.fallback(result_ty) {
                return Expr::clone(&empty);
            }
        }
        if is_nullable_or_reference(self.db, result_ty) {
            Expr::null(result_ty)
        } else {
            Expr::default_of(result_ty)
        }
    }

    fn log_guard(&self, strategy: GuardStrategy, target: &Expr) {
        debug!(
            strategy = strategy.as_str(),
            target = %ExprPrinter::new(self.db).print(target),
            target_ty = %TypeFormatter::new(self.db).display(target.ty),
            "inserting null guard"
        );
    }
}

#[cfg(test)]
#[path = "../tests/policy_tests.rs"]
mod tests;
