//! Expression tree nodes.
//!
//! Every node carries its static type. Children are owned (`Box` / `Vec`), so
//! a tree is a plain value: rewriting produces a new tree and leaves the input
//! untouched.

use nullsafe_types::TypeId;
use std::sync::Arc;

/// A typed expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Static type of the value this node produces
    pub ty: TypeId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // =========================================================================
    // Leaves
    // =========================================================================
    /// Lambda or query parameter: `order`
    Parameter { name: Arc<str> },

    /// Literal value, including a typed `null`
    Constant(ConstValue),

    /// Zero value of the node's type: `default(int)`
    Default,

    // =========================================================================
    // Guarded shapes
    // =========================================================================
    /// Field or property read: `target.Member`.
    /// `target` is `None` for static members.
    Member {
        target: Option<Box<Expr>>,
        member: MemberRef,
    },

    /// Method invocation.
    ///
    /// Instance calls have `object: Some(receiver)`. Extension calls have no
    /// object and pass the logical receiver as `args[0]`. Static helpers have
    /// neither.
    Call {
        object: Option<Box<Expr>>,
        method: MethodRef,
        args: Vec<Expr>,
    },

    // =========================================================================
    // Everything else (rebuilt structurally)
    // =========================================================================
    /// `x => body`
    Lambda { params: Vec<Param>, body: Box<Expr> },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary { op: UnaryOp, operand: Box<Expr> },

    /// `left ?? right`
    Coalesce { left: Box<Expr>, right: Box<Expr> },

    /// `test ? if_true : if_false`
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },

    /// Conversion of `operand` to the node's type
    Convert { operand: Box<Expr> },

    /// `new T(args)` where `T` is the node's type
    New { args: Vec<Expr> },

    /// `new E[] { elements }`; the node's type is the array type
    NewArray { elements: Vec<Expr> },

    /// Array element read: `target[index]`
    Index { target: Box<Expr>, index: Box<Expr> },

    /// `value` evaluated once and bound to `var` while `body` runs. The
    /// node's type is the body's type. Printed inline at the first use of
    /// `var`: `((_a = value) == null) ? ... : _a.Name`.
    Let {
        var: Param,
        value: Box<Expr>,
        body: Box<Expr>,
    },
}

/// Tag of an [`ExprKind`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Parameter,
    Constant,
    Default,
    MemberAccess,
    MethodCall,
    Lambda,
    Binary,
    Unary,
    Coalesce,
    Conditional,
    Convert,
    New,
    NewArray,
    Index,
    Let,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Arc<str>),
}

/// The member read by a [`ExprKind::Member`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub name: Arc<str>,
    /// Type that declares the member (the target's type for instance members)
    pub declaring_type: TypeId,
}

/// The method invoked by a [`ExprKind::Call`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: Arc<str>,
    /// Static class holding an extension or static method (`Enumerable`)
    pub owner: Option<Arc<str>>,
    /// Declared as `static R M(this T receiver, ...)`
    pub is_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Arc<str>,
    pub ty: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    AndAlso,
    OrElse,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
        }
    }

    /// Operators whose result is `bool` regardless of operand types.
    pub const fn is_predicate(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::AndAlso
                | BinaryOp::OrElse
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

impl Expr {
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::Parameter { .. } => NodeKind::Parameter,
            ExprKind::Constant(_) => NodeKind::Constant,
            ExprKind::Default => NodeKind::Default,
            ExprKind::Member { .. } => NodeKind::MemberAccess,
            ExprKind::Call { .. } => NodeKind::MethodCall,
            ExprKind::Lambda { .. } => NodeKind::Lambda,
            ExprKind::Binary { .. } => NodeKind::Binary,
            ExprKind::Unary { .. } => NodeKind::Unary,
            ExprKind::Coalesce { .. } => NodeKind::Coalesce,
            ExprKind::Conditional { .. } => NodeKind::Conditional,
            ExprKind::Convert { .. } => NodeKind::Convert,
            ExprKind::New { .. } => NodeKind::New,
            ExprKind::NewArray { .. } => NodeKind::NewArray,
            ExprKind::Index { .. } => NodeKind::Index,
            ExprKind::Let { .. } => NodeKind::Let,
        }
    }

    /// Whether this node is a constant `null`.
    pub fn is_null_constant(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(ConstValue::Null))
    }
}
