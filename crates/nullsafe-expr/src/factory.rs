//! Constructors for expression nodes.
//!
//! Leaf and structural constructors are infallible. Constructors that need
//! type information (`member`, `index`, `new_array`, `try_condition`) consult
//! the interner and report a `BuildError` instead of producing an ill-typed
//! node.

use crate::error::BuildError;
use crate::node::{BinaryOp, ConstValue, Expr, ExprKind, MemberRef, MethodRef, Param, UnaryOp};
use nullsafe_types::{TypeId, TypeInterner, array_element_type, field_type, is_assignable_to};
use std::sync::Arc;

impl Expr {
    pub fn new(ty: TypeId, kind: ExprKind) -> Self {
        Expr { ty, kind }
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    pub fn parameter(name: &str, ty: TypeId) -> Self {
        Expr::new(ty, ExprKind::Parameter { name: name.into() })
    }

    pub fn constant(value: ConstValue, ty: TypeId) -> Self {
        Expr::new(ty, ExprKind::Constant(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::constant(ConstValue::Bool(value), TypeId::BOOLEAN)
    }

    pub fn int(value: i64) -> Self {
        Expr::constant(ConstValue::Int(value), TypeId::INT32)
    }

    pub fn double(value: f64) -> Self {
        Expr::constant(ConstValue::Double(value), TypeId::DOUBLE)
    }

    pub fn string(value: &str) -> Self {
        Expr::constant(ConstValue::Str(value.into()), TypeId::STRING)
    }

    /// A `null` literal typed as `ty`.
    pub fn null(ty: TypeId) -> Self {
        Expr::constant(ConstValue::Null, ty)
    }

    /// `default(ty)`
    pub fn default_of(ty: TypeId) -> Self {
        Expr::new(ty, ExprKind::Default)
    }

    // =========================================================================
    // Member access and calls
    // =========================================================================

    /// `target.name`, typed by looking the member up on the target's type.
    pub fn member(db: &TypeInterner, target: Expr, name: &str) -> Result<Self, BuildError> {
        let member_ty = field_type(db, target.ty, name).ok_or_else(|| BuildError::UnknownMember {
            ty: target.ty,
            member: name.to_string(),
        })?;
        Ok(Expr::member_typed(target, name, member_ty))
    }

    /// `target.name` with an explicitly supplied member type.
    pub fn member_typed(target: Expr, name: &str, member_ty: TypeId) -> Self {
        let member = MemberRef {
            name: name.into(),
            declaring_type: target.ty,
        };
        Expr::new(
            member_ty,
            ExprKind::Member {
                target: Some(Box::new(target)),
                member,
            },
        )
    }

    /// `DeclaringType.name`
    pub fn static_member(declaring_type: TypeId, name: &str, member_ty: TypeId) -> Self {
        Expr::new(
            member_ty,
            ExprKind::Member {
                target: None,
                member: MemberRef {
                    name: name.into(),
                    declaring_type,
                },
            },
        )
    }

    /// Instance call `object.name(args)` returning `ret`.
    pub fn call(object: Expr, name: &str, args: Vec<Expr>, ret: TypeId) -> Self {
        Expr::new(
            ret,
            ExprKind::Call {
                object: Some(Box::new(object)),
                method: MethodRef {
                    name: name.into(),
                    owner: None,
                    is_extension: false,
                },
                args,
            },
        )
    }

    /// Extension call `owner.name(receiver, rest...)`; `args[0]` is the receiver.
    pub fn extension_call(
        owner: &str,
        name: &str,
        args: Vec<Expr>,
        ret: TypeId,
    ) -> Result<Self, BuildError> {
        if args.is_empty() {
            return Err(BuildError::MissingReceiver {
                method: name.to_string(),
            });
        }
        Ok(Expr::new(
            ret,
            ExprKind::Call {
                object: None,
                method: MethodRef {
                    name: name.into(),
                    owner: Some(owner.into()),
                    is_extension: true,
                },
                args,
            },
        ))
    }

    /// Plain static call `owner.name(args)`. The first argument is not a receiver.
    pub fn static_call(owner: &str, name: &str, args: Vec<Expr>, ret: TypeId) -> Self {
        Expr::new(
            ret,
            ExprKind::Call {
                object: None,
                method: MethodRef {
                    name: name.into(),
                    owner: Some(owner.into()),
                    is_extension: false,
                },
                args,
            },
        )
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// `(params) => body`. Lambdas are typed `object`; delegate types are not
    /// modelled.
    pub fn lambda(params: Vec<(&str, TypeId)>, body: Expr) -> Self {
        let params = params
            .into_iter()
            .map(|(name, ty)| Param {
                name: Arc::from(name),
                ty,
            })
            .collect();
        Expr::new(
            TypeId::OBJECT,
            ExprKind::Lambda {
                params,
                body: Box::new(body),
            },
        )
    }

    /// Comparisons and logical operators yield `bool`; arithmetic takes the
    /// left operand's type.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let ty = if op.is_predicate() {
            TypeId::BOOLEAN
        } else {
            left.ty
        };
        Expr::new(
            ty,
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    pub fn equal(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Equal, left, right)
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let ty = match op {
            UnaryOp::Not => TypeId::BOOLEAN,
            UnaryOp::Negate => operand.ty,
        };
        Expr::new(
            ty,
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        )
    }

    pub fn not(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Not, operand)
    }

    /// `left ?? right`, typed as `left`.
    pub fn coalesce(left: Expr, right: Expr) -> Self {
        Expr::new(
            left.ty,
            ExprKind::Coalesce {
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    /// `test ? if_true : if_false` with an explicit result type.
    pub fn condition(test: Expr, if_true: Expr, if_false: Expr, ty: TypeId) -> Self {
        Expr::new(
            ty,
            ExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
        )
    }

    /// Like [`Expr::condition`], but checks the test is `bool` and both
    /// branches share a type, which becomes the result type.
    pub fn try_condition(test: Expr, if_true: Expr, if_false: Expr) -> Result<Self, BuildError> {
        if test.ty != TypeId::BOOLEAN {
            return Err(BuildError::NonBooleanCondition { found: test.ty });
        }
        if if_true.ty != if_false.ty {
            return Err(BuildError::BranchTypeMismatch {
                if_true: if_true.ty,
                if_false: if_false.ty,
            });
        }
        let ty = if_true.ty;
        Ok(Expr::condition(test, if_true, if_false, ty))
    }

    /// `(ty)operand`
    pub fn convert(operand: Expr, ty: TypeId) -> Self {
        Expr::new(
            ty,
            ExprKind::Convert {
                operand: Box::new(operand),
            },
        )
    }

    /// Bind `value` to a fresh variable `name` for the duration of the body
    /// built by `body`, so the value is evaluated once however often the
    /// body refers to it.
    pub fn let_in(name: &str, value: Expr, body: impl FnOnce(Expr) -> Expr) -> Self {
        let var = Param {
            name: Arc::from(name),
            ty: value.ty,
        };
        let body = body(Expr::parameter(name, value.ty));
        Expr::new(
            body.ty,
            ExprKind::Let {
                var,
                value: Box::new(value),
                body: Box::new(body),
            },
        )
    }

    // =========================================================================
    // Construction and indexing
    // =========================================================================

    /// `new ty(args)`
    pub fn new_object(ty: TypeId, args: Vec<Expr>) -> Self {
        Expr::new(ty, ExprKind::New { args })
    }

    /// `new E[] { elements }` for `array_ty = E[]`.
    pub fn new_array(
        db: &TypeInterner,
        array_ty: TypeId,
        elements: Vec<Expr>,
    ) -> Result<Self, BuildError> {
        let element_ty =
            array_element_type(db, array_ty).ok_or(BuildError::NotAnArray { ty: array_ty })?;
        if let Some(bad) = elements
            .iter()
            .find(|e| !e.is_null_constant() && !is_assignable_to(db, e.ty, element_ty))
        {
            return Err(BuildError::ElementTypeMismatch {
                expected: element_ty,
                found: bad.ty,
            });
        }
        Ok(Expr::new(array_ty, ExprKind::NewArray { elements }))
    }

    /// `target[index]` on an array.
    pub fn index(db: &TypeInterner, target: Expr, index: Expr) -> Result<Self, BuildError> {
        let element_ty =
            array_element_type(db, target.ty).ok_or(BuildError::NotAnArray { ty: target.ty })?;
        Ok(Expr::new(
            element_ty,
            ExprKind::Index {
                target: Box::new(target),
                index: Box::new(index),
            },
        ))
    }
}
