//! Null-safe rewriting of query expression trees.
//!
//! A query such as `order.Customer.Address.City` faults in memory when any
//! link is null, while a database provider would just yield `NULL`. The
//! [`NullsafeRewriter`] inserts guards so the in-memory evaluation behaves
//! like the provider:
//!
//! ```text
//! order.Customer.Name
//!   => (((_a = ((order == null) ? null : order.Customer)) == null) ? null : _a.Name)
//! players.Count()
//!   => Enumerable.Count((players ?? ((IEnumerable<Player>)new List<Player>())))
//! ```
//!
//! Collection-typed receivers are replaced by an empty collection (or empty
//! array) so aggregations keep their natural zero; everything else is
//! short-circuited to `null` or `default`.

mod cache;
mod error;
mod fallback;
mod options;
mod policy;
mod temps;
mod walker;

pub use cache::{FallbackCacheStats, FallbackEntry, TypeFallbackCache};
pub use error::RewriteError;
pub use fallback::resolve_fallback;
pub use options::RewriteOptions;
pub use policy::{GuardStrategy, NullSafetyPolicy, is_safe};
pub use temps::TempNames;
pub use walker::{NullsafeRewriter, RewriteStats};
