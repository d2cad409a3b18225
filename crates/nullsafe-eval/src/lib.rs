//! Reference evaluator for query expression trees.
//!
//! Runs an [`Expr`](nullsafe_expr::Expr) against in-memory values the way an
//! in-process LINQ provider would, including its null-dereference faults.
//! Used to check that rewritten trees no longer fault and still short-circuit.

mod builtins;
mod error;
mod interpreter;
mod value;

pub use builtins::{CallSite, MethodFn, MethodTable};
pub use error::EvalError;
pub use interpreter::{Access, Evaluator};
pub use value::{
    Closure, CollectionKind, CollectionValue, Env, ObjectValue, Value, default_value,
};

#[cfg(test)]
#[path = "../tests/builtins_tests.rs"]
mod builtins_tests;
