//! C#-flavoured text rendering of expression trees.
//!
//! Used for CLI output, log fields and test assertions. Binary, coalesce and
//! conditional nodes are always parenthesized so the output is unambiguous
//! without precedence rules. A `Let` prints no text of its own: its value is
//! assigned inline where the bound variable first appears, as in
//! `(((_a = order.Customer) == null) ? null : _a.Name)`.

use crate::node::{ConstValue, Expr, ExprKind};
use nullsafe_types::{TypeFormatter, TypeInterner, array_element_type};
use std::fmt::Write;

pub struct ExprPrinter<'a> {
    db: &'a TypeInterner,
    types: TypeFormatter<'a>,
}

impl<'a> ExprPrinter<'a> {
    pub fn new(db: &'a TypeInterner) -> Self {
        ExprPrinter {
            db,
            types: TypeFormatter::new(db),
        }
    }

    pub fn print(&self, expr: &Expr) -> String {
        let mut emitter = Emitter {
            db: self.db,
            types: &self.types,
            out: String::new(),
            pending: Vec::new(),
        };
        emitter.emit(expr);
        emitter.out
    }
}

/// Output buffer for one `print` call.
struct Emitter<'p, 'e> {
    db: &'p TypeInterner,
    types: &'p TypeFormatter<'p>,
    out: String,
    /// `Let` bindings whose variable has not been printed yet, innermost last
    pending: Vec<(&'e str, &'e Expr)>,
}

impl<'e> Emitter<'_, 'e> {
    fn emit(&mut self, expr: &'e Expr) {
        match &expr.kind {
            ExprKind::Parameter { name } => self.emit_parameter(name),
            ExprKind::Constant(value) => emit_constant(&mut self.out, value),
            ExprKind::Default => {
                let _ = write!(self.out, "default({})", self.types.format(expr.ty));
            }
            ExprKind::Member { target, member } => {
                match target {
                    Some(target) => self.emit(target),
                    None => self.out.push_str(&self.types.format(member.declaring_type)),
                }
                self.out.push('.');
                self.out.push_str(&member.name);
            }
            ExprKind::Call {
                object,
                method,
                args,
            } => {
                match (object, &method.owner) {
                    (Some(object), _) => {
                        self.emit(object);
                        self.out.push('.');
                    }
                    (None, Some(owner)) => {
                        self.out.push_str(owner);
                        self.out.push('.');
                    }
                    (None, None) => {}
                }
                self.out.push_str(&method.name);
                self.emit_list("(", args, ")");
            }
            ExprKind::Lambda { params, body } => {
                if let [param] = params.as_slice() {
                    self.out.push_str(&param.name);
                } else {
                    self.out.push('(');
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.out.push_str(&param.name);
                    }
                    self.out.push(')');
                }
                self.out.push_str(" => ");
                self.emit(body);
            }
            ExprKind::Binary { op, left, right } => {
                self.out.push('(');
                self.emit(left);
                let _ = write!(self.out, " {} ", op.symbol());
                self.emit(right);
                self.out.push(')');
            }
            ExprKind::Unary { op, operand } => {
                self.out.push_str(op.symbol());
                self.emit(operand);
            }
            ExprKind::Coalesce { left, right } => {
                self.out.push('(');
                self.emit(left);
                self.out.push_str(" ?? ");
                self.emit(right);
                self.out.push(')');
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                self.out.push('(');
                self.emit(test);
                self.out.push_str(" ? ");
                self.emit(if_true);
                self.out.push_str(" : ");
                self.emit(if_false);
                self.out.push(')');
            }
            ExprKind::Convert { operand } => {
                let _ = write!(self.out, "(({})", self.types.format(expr.ty));
                self.emit(operand);
                self.out.push(')');
            }
            ExprKind::New { args } => {
                let _ = write!(self.out, "new {}", self.types.format(expr.ty));
                self.emit_list("(", args, ")");
            }
            ExprKind::NewArray { elements } => {
                let element = array_element_type(self.db, expr.ty).unwrap_or(expr.ty);
                let element = self.types.format(element);
                if elements.is_empty() {
                    let _ = write!(self.out, "new {element}[0]");
                } else {
                    let _ = write!(self.out, "new {element}[] ");
                    self.emit_list("{", elements, "}");
                }
            }
            ExprKind::Index { target, index } => {
                self.emit(target);
                self.out.push('[');
                self.emit(index);
                self.out.push(']');
            }
            ExprKind::Let { var, value, body } => {
                if body.mentions_parameter(&var.name) {
                    self.pending.push((&*var.name, &**value));
                    self.emit(body);
                } else {
                    let _ = write!(self.out, "({} = ", var.name);
                    self.emit(value);
                    self.out.push_str(", ");
                    self.emit(body);
                    self.out.push(')');
                }
            }
        }
    }

    fn emit_parameter(&mut self, name: &'e str) {
        let bound = self.pending.iter().rposition(|(var, _)| *var == name);
        match bound {
            Some(i) => {
                let (var, value) = self.pending.remove(i);
                let _ = write!(self.out, "({var} = ");
                self.emit(value);
                self.out.push(')');
            }
            None => self.out.push_str(name),
        }
    }

    fn emit_list(&mut self, open: &str, items: &'e [Expr], close: &str) {
        self.out.push_str(open);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.emit(item);
        }
        self.out.push_str(close);
    }
}

fn emit_constant(out: &mut String, value: &ConstValue) {
    match value {
        ConstValue::Null => out.push_str("null"),
        ConstValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConstValue::Int(i) => {
            let _ = write!(out, "{i}");
        }
        ConstValue::Double(d) => {
            let _ = write!(out, "{d:?}");
        }
        ConstValue::Str(s) => {
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
    }
}
