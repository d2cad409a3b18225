//! Names for the variables guards bind their receivers to.

use nullsafe_expr::{Expr, ExprKind};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Hands out `_a`, `_b`, ... `_z`, `_a1`, ... skipping every name the input
/// tree already uses, so a bound receiver never shadows a query parameter.
#[derive(Debug, Default)]
pub struct TempNames {
    taken: FxHashSet<Arc<str>>,
    next: u32,
}

impl TempNames {
    /// Allocator that avoids every parameter, lambda parameter and bound
    /// variable name in `expr`.
    pub fn reserving(expr: &Expr) -> Self {
        let mut names = TempNames::default();
        names.reserve_all(expr);
        names
    }

    pub fn fresh(&mut self) -> Arc<str> {
        loop {
            let letter = (b'a' + (self.next % 26) as u8) as char;
            let round = self.next / 26;
            self.next += 1;
            let name: Arc<str> = if round == 0 {
                format!("_{letter}").into()
            } else {
                format!("_{letter}{round}").into()
            };
            if self.taken.insert(Arc::clone(&name)) {
                return name;
            }
        }
    }

    fn reserve_all(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Parameter { name } => {
                self.taken.insert(Arc::clone(name));
            }
            ExprKind::Lambda { params, .. } => {
                self.taken
                    .extend(params.iter().map(|p| Arc::clone(&p.name)));
            }
            ExprKind::Let { var, .. } => {
                self.taken.insert(Arc::clone(&var.name));
            }
            _ => {}
        }
        expr.for_each_child(|child| self.reserve_all(child));
    }
}

#[cfg(test)]
#[path = "../tests/temps_tests.rs"]
mod tests;
