use nullsafe_types::limits::MAX_REWRITE_DEPTH;

/// Knobs for a rewrite pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Deepest node nesting accepted before the walk gives up with
    /// `RewriteError::DepthExceeded`. Keeps recursion off the end of the stack.
    pub max_depth: u32,
    /// When a conditional guard short-circuits a node whose own type has a
    /// collection or array fallback, yield that empty instance instead of
    /// `null`. Off by default: `team.Players` with a null `team` is `null`.
    pub empty_collection_results: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            max_depth: MAX_REWRITE_DEPTH,
            empty_collection_results: false,
        }
    }
}

impl RewriteOptions {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_empty_collection_results(mut self, enabled: bool) -> Self {
        self.empty_collection_results = enabled;
        self
    }
}
