//! Child traversal helpers.
//!
//! `try_map_children` rebuilds a node from transformed children while
//! keeping its kind, payload and type. Children are visited in evaluation
//! order (receiver before arguments, left before right).

use crate::node::{Expr, ExprKind};

impl Expr {
    /// Consume the node, replace each direct child with `f(child)`, and
    /// return the rebuilt node. Stops at the first error.
    pub fn try_map_children<E>(
        self,
        mut f: impl FnMut(Expr) -> Result<Expr, E>,
    ) -> Result<Expr, E> {
        let Expr { ty, kind } = self;
        let mut map_box = |child: Box<Expr>| -> Result<Box<Expr>, E> { Ok(Box::new(f(*child)?)) };

        let kind = match kind {
            leaf @ (ExprKind::Parameter { .. } | ExprKind::Constant(_) | ExprKind::Default) => leaf,
            ExprKind::Member { target, member } => ExprKind::Member {
                target: target.map(&mut map_box).transpose()?,
                member,
            },
            ExprKind::Call {
                object,
                method,
                args,
            } => {
                let object = object.map(&mut map_box).transpose()?;
                let args = args
                    .into_iter()
                    .map(|a| map_box(Box::new(a)).map(|b| *b))
                    .collect::<Result<Vec<_>, _>>()?;
                ExprKind::Call {
                    object,
                    method,
                    args,
                }
            }
            ExprKind::Lambda { params, body } => ExprKind::Lambda {
                params,
                body: map_box(body)?,
            },
            ExprKind::Binary { op, left, right } => {
                let left = map_box(left)?;
                let right = map_box(right)?;
                ExprKind::Binary { op, left, right }
            }
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: map_box(operand)?,
            },
            ExprKind::Coalesce { left, right } => {
                let left = map_box(left)?;
                let right = map_box(right)?;
                ExprKind::Coalesce { left, right }
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                let test = map_box(test)?;
                let if_true = map_box(if_true)?;
                let if_false = map_box(if_false)?;
                ExprKind::Conditional {
                    test,
                    if_true,
                    if_false,
                }
            }
            ExprKind::Convert { operand } => ExprKind::Convert {
                operand: map_box(operand)?,
            },
            ExprKind::New { args } => ExprKind::New {
                args: args
                    .into_iter()
                    .map(|a| map_box(Box::new(a)).map(|b| *b))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            ExprKind::NewArray { elements } => ExprKind::NewArray {
                elements: elements
                    .into_iter()
                    .map(|e| map_box(Box::new(e)).map(|b| *b))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            ExprKind::Index { target, index } => {
                let target = map_box(target)?;
                let index = map_box(index)?;
                ExprKind::Index { target, index }
            }
            ExprKind::Let { var, value, body } => {
                let value = map_box(value)?;
                let body = map_box(body)?;
                ExprKind::Let { var, value, body }
            }
        };
        Ok(Expr { ty, kind })
    }

    /// Call `f` on each direct child, in evaluation order.
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Expr)) {
        match &self.kind {
            ExprKind::Parameter { .. } | ExprKind::Constant(_) | ExprKind::Default => {}
            ExprKind::Member { target, .. } => {
                if let Some(target) = target {
                    f(target);
                }
            }
            ExprKind::Call { object, args, .. } => {
                if let Some(object) = object {
                    f(object);
                }
                args.iter().for_each(f);
            }
            ExprKind::Lambda { body, .. } => f(body),
            ExprKind::Binary { left, right, .. } | ExprKind::Coalesce { left, right } => {
                f(left);
                f(right);
            }
            ExprKind::Unary { operand, .. } | ExprKind::Convert { operand } => f(operand),
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                f(test);
                f(if_true);
                f(if_false);
            }
            ExprKind::New { args } => args.iter().for_each(f),
            ExprKind::NewArray { elements } => elements.iter().for_each(f),
            ExprKind::Index { target, index } => {
                f(target);
                f(index);
            }
            ExprKind::Let { value, body, .. } => {
                f(value);
                f(body);
            }
        }
    }

    /// Total number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let mut count = 1;
        self.for_each_child(|child| count += child.node_count());
        count
    }

    /// Length of the longest root-to-leaf path (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        self.for_each_child(|child| deepest = deepest.max(child.depth()));
        deepest + 1
    }

    /// Whether a parameter named `name` occurs anywhere in the tree.
    pub fn mentions_parameter(&self, name: &str) -> bool {
        self.any_node(&|node| matches!(&node.kind, ExprKind::Parameter { name: n } if &**n == name))
    }

    /// Whether any node in the tree satisfies `pred`.
    pub fn any_node(&self, pred: &impl Fn(&Expr) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        let mut found = false;
        self.for_each_child(|child| found = found || child.any_node(pred));
        found
    }
}
