//! Bottom-up tree walk that inserts null guards.
//!
//! Children are rewritten before their parent. Member accesses and method
//! calls are then checked against the rewritten receiver; every other node
//! kind is rebuilt unchanged around its rewritten children.
//!
//! Inside the branch of `p == null ? a : b` (or `p != null ? b : a`) where a
//! parameter `p` is known to be non-null, `p` needs no guard. That keeps
//! rewriting idempotent: guards already present in the input, hand-written
//! or inserted by an earlier rewrite, are recognized and left alone.

use crate::cache::TypeFallbackCache;
use crate::error::RewriteError;
use crate::options::RewriteOptions;
use crate::policy::{GuardStrategy, NullSafetyPolicy};
use crate::temps::TempNames;
use nullsafe_expr::{BinaryOp, Expr, ExprKind, MemberRef, MethodRef};
use nullsafe_types::{TypeId, TypeInterner};
use std::sync::Arc;
use tracing::debug;

/// Counters collected during one rewrite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub nodes_visited: usize,
    pub coalesce_guards: usize,
    pub conditional_guards: usize,
}

impl RewriteStats {
    pub fn guards(&self) -> usize {
        self.coalesce_guards + self.conditional_guards
    }

    fn record(&mut self, strategy: GuardStrategy) {
        match strategy {
            GuardStrategy::Coalesce => self.coalesce_guards += 1,
            GuardStrategy::Conditional => self.conditional_guards += 1,
        }
    }
}

/// Makes member access and method calls in a query expression null-safe.
///
/// The rewriter is a cheap handle over a type interner and a fallback cache;
/// it holds no per-rewrite state and can be shared across threads.
///
/// The output grows linearly with the input: a guarded receiver that is not
/// a plain parameter is bound to a fresh variable (`_a`, `_b`, ...) and
/// evaluated once.
#[derive(Clone, Copy)]
pub struct NullsafeRewriter<'a> {
    db: &'a TypeInterner,
    cache: &'a TypeFallbackCache,
    options: RewriteOptions,
}

impl<'a> NullsafeRewriter<'a> {
    /// `cache` must only ever be used with `db`.
    pub fn new(db: &'a TypeInterner, cache: &'a TypeFallbackCache) -> Self {
        NullsafeRewriter {
            db,
            cache,
            options: RewriteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RewriteOptions {
        self.options
    }

    pub fn cache(&self) -> &'a TypeFallbackCache {
        self.cache
    }

    /// Rewrite `expr` into an equivalent tree of the same static type in
    /// which no member access or method call dereferences null.
    pub fn rewrite(&self, expr: &Expr) -> Result<Expr, RewriteError> {
        self.rewrite_with_stats(expr).map(|(rewritten, _)| rewritten)
    }

    /// Like [`rewrite`](Self::rewrite) for callers whose root may be absent.
    pub fn rewrite_optional(&self, expr: Option<&Expr>) -> Result<Expr, RewriteError> {
        match expr {
            Some(expr) => self.rewrite(expr),
            None => Err(RewriteError::MissingExpression),
        }
    }

    pub fn rewrite_with_stats(&self, expr: &Expr) -> Result<(Expr, RewriteStats), RewriteError> {
        self.rewrite_owned(expr.clone())
    }

    /// Rewrite a tree the caller no longer needs, avoiding the initial clone.
    pub fn rewrite_owned(&self, expr: Expr) -> Result<(Expr, RewriteStats), RewriteError> {
        let mut walker = Walker {
            policy: NullSafetyPolicy::new(self.db, self.cache)
                .with_empty_collection_results(self.options.empty_collection_results),
            temps: TempNames::reserving(&expr),
            non_null: Vec::new(),
            max_depth: self.options.max_depth,
            depth: 0,
            stats: RewriteStats::default(),
        };
        let rewritten = walker.visit(expr)?;
        debug!(
            nodes = walker.stats.nodes_visited,
            guards = walker.stats.guards(),
            coalesce = walker.stats.coalesce_guards,
            conditional = walker.stats.conditional_guards,
            "rewrite complete"
        );
        Ok((rewritten, walker.stats))
    }
}

struct Walker<'a> {
    policy: NullSafetyPolicy<'a>,
    temps: TempNames,
    /// Parameters proven non-null by an enclosing null test
    non_null: Vec<Arc<str>>,
    max_depth: u32,
    depth: u32,
    stats: RewriteStats,
}

impl Walker<'_> {
    fn visit(&mut self, expr: Expr) -> Result<Expr, RewriteError> {
        if self.depth >= self.max_depth {
            return Err(RewriteError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        self.stats.nodes_visited += 1;
        let result = self.visit_node(expr);
        self.depth -= 1;
        result
    }

    fn visit_node(&mut self, expr: Expr) -> Result<Expr, RewriteError> {
        let Expr { ty, kind } = expr;
        match kind {
            ExprKind::Member { target, member } => self.visit_member(ty, target, member),
            ExprKind::Call {
                object,
                method,
                args,
            } => self.visit_call(ty, object, method, args),
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => self.visit_conditional(ty, *test, *if_true, *if_false),
            ExprKind::Lambda { params, body } => {
                let body = self.visit_shadowed(*body, |name| {
                    params.iter().any(|p| &*p.name == name)
                })?;
                Ok(Expr::new(
                    ty,
                    ExprKind::Lambda {
                        params,
                        body: Box::new(body),
                    },
                ))
            }
            ExprKind::Let { var, value, body } => {
                let value = self.visit(*value)?;
                let body = self.visit_shadowed(*body, |name| *var.name == *name)?;
                Ok(Expr::new(
                    ty,
                    ExprKind::Let {
                        var,
                        value: Box::new(value),
                        body: Box::new(body),
                    },
                ))
            }
            kind => Expr::new(ty, kind).try_map_children(|child| self.visit(child)),
        }
    }

    fn visit_conditional(
        &mut self,
        ty: TypeId,
        test: Expr,
        if_true: Expr,
        if_false: Expr,
    ) -> Result<Expr, RewriteError> {
        let test = self.visit(test)?;
        let (in_true, in_false) = match null_test(&test) {
            Some((name, true)) => (None, Some(name)),
            Some((name, false)) => (Some(name), None),
            None => (None, None),
        };
        let if_true = self.visit_non_null(if_true, in_true)?;
        let if_false = self.visit_non_null(if_false, in_false)?;
        Ok(Expr::condition(test, if_true, if_false, ty))
    }

    /// Visit `expr` with `name`, if any, known to be non-null.
    fn visit_non_null(&mut self, expr: Expr, name: Option<Arc<str>>) -> Result<Expr, RewriteError> {
        let Some(name) = name else {
            return self.visit(expr);
        };
        self.non_null.push(name);
        let result = self.visit(expr);
        self.non_null.pop();
        result
    }

    /// Visit the body of a binding construct. Names it rebinds lose whatever
    /// the enclosing scope proved about them.
    fn visit_shadowed(
        &mut self,
        body: Expr,
        rebinds: impl Fn(&str) -> bool,
    ) -> Result<Expr, RewriteError> {
        if !self.non_null.iter().any(|name| rebinds(&**name)) {
            return self.visit(body);
        }
        let saved = self.non_null.clone();
        self.non_null.retain(|name| !rebinds(&**name));
        let result = self.visit(body);
        self.non_null = saved;
        result
    }

    fn is_safe_receiver(&self, expr: &Expr) -> bool {
        if self.policy.is_safe(Some(expr)) {
            return true;
        }
        match &expr.kind {
            ExprKind::Parameter { name } => self.non_null.contains(name),
            _ => false,
        }
    }

    fn visit_member(
        &mut self,
        ty: TypeId,
        target: Option<Box<Expr>>,
        member: MemberRef,
    ) -> Result<Expr, RewriteError> {
        let target = target.map(|t| self.visit(*t)).transpose()?;

        match target {
            Some(target) if !self.is_safe_receiver(&target) => {
                Ok(self.guard(target, ty, |target| {
                    Expr::new(
                        ty,
                        ExprKind::Member {
                            target: Some(Box::new(target)),
                            member,
                        },
                    )
                }))
            }
            target => Ok(Expr::new(
                ty,
                ExprKind::Member {
                    target: target.map(Box::new),
                    member,
                },
            )),
        }
    }

    fn visit_call(
        &mut self,
        ty: TypeId,
        object: Option<Box<Expr>>,
        method: MethodRef,
        args: Vec<Expr>,
    ) -> Result<Expr, RewriteError> {
        let is_extension = method.is_extension && object.is_none();
        if is_extension && args.is_empty() {
            return Err(RewriteError::MissingReceiver {
                method: method.name.to_string(),
            });
        }

        let object = object.map(|o| self.visit(*o)).transpose()?;
        let mut args = args
            .into_iter()
            .map(|arg| self.visit(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(object) = object {
            if !self.is_safe_receiver(&object) {
                return Ok(self.guard(object, ty, |object| {
                    Expr::new(
                        ty,
                        ExprKind::Call {
                            object: Some(Box::new(object)),
                            method,
                            args,
                        },
                    )
                }));
            }
            return Ok(Expr::new(
                ty,
                ExprKind::Call {
                    object: Some(Box::new(object)),
                    method,
                    args,
                },
            ));
        }

        if is_extension && args.first().is_some_and(|arg| !self.is_safe_receiver(arg)) {
            let receiver = args.remove(0);
            return Ok(self.guard(receiver, ty, |receiver| {
                args.insert(0, receiver);
                Expr::new(
                    ty,
                    ExprKind::Call {
                        object: None,
                        method,
                        args,
                    },
                )
            }));
        }

        Ok(Expr::new(
            ty,
            ExprKind::Call {
                object: None,
                method,
                args,
            },
        ))
    }

    fn guard(&mut self, target: Expr, result_ty: TypeId, rebuild: impl FnOnce(Expr) -> Expr) -> Expr {
        let (guarded, strategy) = self.policy.be_safe(target, result_ty, &mut self.temps, rebuild);
        self.stats.record(strategy);
        guarded
    }
}

/// The parameter a `p == null` / `p != null` test checks, and whether the
/// test is true when `p` is null.
fn null_test(test: &Expr) -> Option<(Arc<str>, bool)> {
    let ExprKind::Binary { op, left, right } = &test.kind else {
        return None;
    };
    let true_when_null = match op {
        BinaryOp::Equal => true,
        BinaryOp::NotEqual => false,
        _ => return None,
    };
    let checked = match (&left.kind, &right.kind) {
        (ExprKind::Parameter { name }, _) if right.is_null_constant() => name,
        (_, ExprKind::Parameter { name }) if left.is_null_constant() => name,
        _ => return None,
    };
    Some((Arc::clone(checked), true_when_null))
}

#[cfg(test)]
#[path = "../tests/walker_tests.rs"]
mod tests;
