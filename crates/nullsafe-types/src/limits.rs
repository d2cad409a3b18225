//! Centralized limits.
//!
//! Recursion bounds shared by the type relations and the tree rewriter.

/// Maximum expression nesting the rewriter descends into.
///
/// Each nested node adds a frame to the walker's call stack; a chain like
/// `a.b.c.d ...` hundreds of links deep is rejected instead of overflowing.
pub const MAX_REWRITE_DEPTH: u32 = 500;

/// Maximum base-type chain length followed when checking assignability or
/// resolving inherited fields. Guards against cyclic `bases` declarations.
pub const MAX_BASE_TYPE_DEPTH: u32 = 64;
