//! Null-safe rewriting of query expression trees.
//!
//! This crate ties the workspace together: the type model
//! (`nullsafe-types`), expression trees (`nullsafe-expr`), the rewriter
//! itself (`nullsafe-rewriter`) and the reference evaluator
//! (`nullsafe-eval`). [`NullsafeContext`] owns a type interner together with
//! the fallback cache bound to it, which is the usual way to drive a rewrite:
//!
//! ```ignore
//! let ctx = NullsafeContext::new();
//! let safe = ctx.rewrite(&query)?;
//! ```

pub mod cli;
pub mod tracing_config;

pub use nullsafe_eval as eval;
pub use nullsafe_expr as expr;
pub use nullsafe_rewriter as rewriter;
pub use nullsafe_types as types;

pub use nullsafe_eval::{Env, EvalError, Evaluator, Value};
pub use nullsafe_expr::{Expr, ExprKind, ExprPrinter};
pub use nullsafe_rewriter::{
    NullsafeRewriter, RewriteError, RewriteOptions, RewriteStats, TypeFallbackCache,
};
pub use nullsafe_types::{TypeFormatter, TypeId, TypeInterner};

/// A type universe plus the fallback cache that belongs to it.
///
/// Fallback entries are keyed by `TypeId`, which only means something
/// relative to one interner, so the two are kept together.
#[derive(Default)]
pub struct NullsafeContext {
    types: TypeInterner,
    fallbacks: TypeFallbackCache,
    options: RewriteOptions,
}

impl NullsafeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn fallbacks(&self) -> &TypeFallbackCache {
        &self.fallbacks
    }

    pub fn options(&self) -> RewriteOptions {
        self.options
    }

    /// A rewriter sharing this context's interner and cache.
    pub fn rewriter(&self) -> NullsafeRewriter<'_> {
        NullsafeRewriter::new(&self.types, &self.fallbacks).with_options(self.options)
    }

    pub fn rewrite(&self, expr: &Expr) -> Result<Expr, RewriteError> {
        self.rewriter().rewrite(expr)
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.types)
    }

    /// C#-like source text for `expr`.
    pub fn print(&self, expr: &Expr) -> String {
        ExprPrinter::new(&self.types).print(expr)
    }

    pub fn format_type(&self, ty: TypeId) -> String {
        TypeFormatter::new(&self.types).format(ty)
    }
}
