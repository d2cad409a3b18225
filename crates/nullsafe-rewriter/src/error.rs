use thiserror::Error;

/// Invalid input to the rewriter. Fallback construction never fails; a type
/// without a fallback is simply guarded with a conditional.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("no expression to rewrite")]
    MissingExpression,

    #[error("extension call `{method}` has no receiver argument")]
    MissingReceiver { method: String },

    #[error("expression nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: u32 },
}
