//! Typed query expression trees.
//!
//! An [`Expr`] is an owned tree of typed nodes modelled on LINQ expression
//! trees: parameters, constants, member reads, instance and extension method
//! calls, lambdas and the usual operators. The rewriter consumes and produces
//! these trees; the evaluator runs them.

mod error;
mod factory;
pub mod node;
mod printer;
mod visit;

pub use error::BuildError;
pub use node::{
    BinaryOp, ConstValue, Expr, ExprKind, MemberRef, MethodRef, NodeKind, Param, UnaryOp,
};
pub use printer::ExprPrinter;

#[cfg(test)]
#[path = "../tests/factory_tests.rs"]
mod factory_tests;

#[cfg(test)]
#[path = "../tests/visit_tests.rs"]
mod visit_tests;

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod printer_tests;
