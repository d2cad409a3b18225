//! Tree-walking evaluator.
//!
//! Evaluation follows C# semantics where it matters for null safety:
//! reading a member of `null` or calling an instance method on `null` is a
//! `NullReference` fault, an extension method rejects a `null` receiver,
//! and `&&`, `||`, `??` and `?:` only evaluate the operands they need.
//! Every member read and method invocation is appended to an access log so
//! callers can observe what was (and was not) evaluated.

use crate::builtins::{CallSite, MethodTable};
use crate::error::EvalError;
use crate::value::{Closure, CollectionKind, Env, ObjectValue, Value, default_value};
use nullsafe_expr::{BinaryOp, ConstValue, Expr, ExprKind, MemberRef, MethodRef, UnaryOp};
use nullsafe_types::{
    TypeId, TypeInterner, TypeFormatter, field_type, named_type, nullable_underlying_type,
};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

/// One observable step of an evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    /// A member was read from a non-null value
    Member(Arc<str>),
    /// A method body was entered
    Call(Arc<str>),
}

pub struct Evaluator<'a> {
    db: &'a TypeInterner,
    methods: MethodTable,
    log: Vec<Access>,
}

impl<'a> Evaluator<'a> {
    pub fn new(db: &'a TypeInterner) -> Self {
        Evaluator {
            db,
            methods: MethodTable::with_builtins(),
            log: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: MethodTable) -> Self {
        self.methods = methods;
        self
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.db
    }

    pub fn methods_mut(&mut self) -> &mut MethodTable {
        &mut self.methods
    }

    pub fn access_log(&self) -> &[Access] {
        &self.log
    }

    pub fn take_access_log(&mut self) -> Vec<Access> {
        std::mem::take(&mut self.log)
    }

    /// Whether a member with this name was read since the log was last taken.
    pub fn read_member(&self, name: &str) -> bool {
        self.log
            .iter()
            .any(|a| matches!(a, Access::Member(m) if &**m == name))
    }

    /// Whether a method with this name was invoked since the log was last taken.
    pub fn invoked(&self, name: &str) -> bool {
        self.log
            .iter()
            .any(|a| matches!(a, Access::Call(m) if &**m == name))
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Env) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Parameter { name } => {
                env.get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundParameter {
                        name: name.to_string(),
                    })
            }
            ExprKind::Constant(value) => Ok(constant(value)),
            ExprKind::Default => Ok(default_value(self.db, expr.ty)),
            ExprKind::Member { target, member } => {
                self.eval_member(expr.ty, target.as_deref(), member, env)
            }
            ExprKind::Call {
                object,
                method,
                args,
            } => self.eval_call(expr.ty, object.as_deref(), method, args, env),
            ExprKind::Lambda { params, body } => Ok(Value::Closure(Arc::new(Closure {
                params: params.clone(),
                body: Expr::clone(body),
                env: env.clone(),
            }))),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand, env)?;
                unary(*op, value)
            }
            ExprKind::Coalesce { left, right } => match self.evaluate(left, env)? {
                Value::Null => self.evaluate(right, env),
                value => Ok(value),
            },
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => match self.evaluate(test, env)? {
                Value::Bool(true) => self.evaluate(if_true, env),
                Value::Bool(false) => self.evaluate(if_false, env),
                other => Err(EvalError::mismatch("conditional test", "bool", &other)),
            },
            ExprKind::Convert { operand } => {
                let value = self.evaluate(operand, env)?;
                Ok(convert(value, expr.ty))
            }
            ExprKind::New { args } => {
                for arg in args {
                    self.evaluate(arg, env)?;
                }
                Ok(self.construct(expr.ty))
            }
            ExprKind::NewArray { elements } => {
                let items = elements
                    .iter()
                    .map(|e| self.evaluate(e, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }
            ExprKind::Index { target, index } => {
                let target = self.evaluate(target, env)?;
                let index = self.evaluate(index, env)?;
                element_at(target, index)
            }
            ExprKind::Let { var, value, body } => {
                let value = self.evaluate(value, env)?;
                let mut scope = env.clone();
                scope.insert(Arc::clone(&var.name), value);
                self.evaluate(body, &scope)
            }
        }
    }

    /// Call a closure value with positional arguments.
    pub fn invoke(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        let Value::Closure(closure) = callee else {
            return Err(EvalError::mismatch("invocation", "closure", callee));
        };
        if closure.params.len() != args.len() {
            return Err(EvalError::TypeMismatch {
                context: format!("lambda taking {} argument(s)", closure.params.len()),
                expected: "matching argument count",
                found: "different argument count",
            });
        }
        let mut env = closure.env.clone();
        for (param, arg) in closure.params.iter().zip(args) {
            env.insert(Arc::clone(&param.name), arg);
        }
        self.evaluate(&closure.body, &env)
    }

    // =========================================================================
    // Member access
    // =========================================================================

    fn eval_member(
        &mut self,
        ty: TypeId,
        target: Option<&Expr>,
        member: &MemberRef,
        env: &Env,
    ) -> Result<Value, EvalError> {
        let Some(target) = target else {
            return self.static_member(ty, member);
        };
        let name = &*member.name;
        let value = self.evaluate(target, env)?;

        if value.is_null() {
            // Nullable<T>.HasValue is readable on an empty nullable
            if name == "HasValue" && nullable_underlying_type(self.db, target.ty).is_some() {
                self.log.push(Access::Member(Arc::clone(&member.name)));
                return Ok(Value::Bool(false));
            }
            return Err(EvalError::NullReference {
                member: name.to_string(),
            });
        }
        self.log.push(Access::Member(Arc::clone(&member.name)));

        match (&value, name) {
            (Value::Object(obj), _) => self.read_field(obj, name, ty),
            (Value::Str(s), "Length") => Ok(Value::Int(s.chars().count() as i64)),
            (Value::Collection(c), "Count" | "Length") => Ok(Value::Int(c.items.len() as i64)),
            (_, "HasValue") => Ok(Value::Bool(true)),
            (_, "Value") if nullable_underlying_type(self.db, target.ty).is_some() => {
                Ok(value.clone())
            }
            _ => Err(EvalError::UnknownMember {
                member: name.to_string(),
                receiver: value.kind_name().to_string(),
            }),
        }
    }

    fn read_field(&self, obj: &ObjectValue, name: &str, ty: TypeId) -> Result<Value, EvalError> {
        if let Some(value) = obj.fields.get(name) {
            return Ok(value.clone());
        }
        // Declared but not populated: the field holds its zero value
        if field_type(self.db, obj.ty, name).is_some() {
            return Ok(default_value(self.db, ty));
        }
        Err(EvalError::UnknownMember {
            member: name.to_string(),
            receiver: TypeFormatter::new(self.db).format(obj.ty),
        })
    }

    fn static_member(&mut self, ty: TypeId, member: &MemberRef) -> Result<Value, EvalError> {
        self.log.push(Access::Member(Arc::clone(&member.name)));
        match (member.declaring_type, &*member.name) {
            (TypeId::STRING, "Empty") => Ok(Value::string("")),
            _ if ty == TypeId::VOID => Ok(Value::Null),
            _ => Err(EvalError::UnknownMember {
                member: member.name.to_string(),
                receiver: TypeFormatter::new(self.db).format(member.declaring_type),
            }),
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn eval_call(
        &mut self,
        ret: TypeId,
        object: Option<&Expr>,
        method: &MethodRef,
        args: &[Expr],
        env: &Env,
    ) -> Result<Value, EvalError> {
        let object = match object {
            Some(object) => Some(self.evaluate(object, env)?),
            None => None,
        };
        let mut values = args
            .iter()
            .map(|arg| self.evaluate(arg, env))
            .collect::<Result<Vec<_>, _>>()?;

        let name = &*method.name;
        let (key, receiver) = match object {
            Some(Value::Null) => {
                return Err(EvalError::NullReference {
                    member: name.to_string(),
                });
            }
            Some(receiver) => (name.to_string(), receiver),
            None if method.is_extension => {
                if values.is_empty() || values[0].is_null() {
                    return Err(EvalError::NullReceiver {
                        method: name.to_string(),
                    });
                }
                (name.to_string(), values.remove(0))
            }
            None => {
                let key = match &method.owner {
                    Some(owner) => format!("{owner}.{name}"),
                    None => name.to_string(),
                };
                (key, Value::Null)
            }
        };

        let Some(implementation) = self.methods.get(&key) else {
            return Err(EvalError::UnknownMethod {
                method: key,
                receiver: receiver.kind_name().to_string(),
            });
        };

        trace!(method = %key, receiver = receiver.kind_name(), args = values.len(), "invoke");
        self.log.push(Access::Call(Arc::clone(&method.name)));
        let site = CallSite { method: name, ret };
        implementation(self, &site, receiver, values)
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &Env,
    ) -> Result<Value, EvalError> {
        match op {
            BinaryOp::AndAlso | BinaryOp::OrElse => {
                let short_circuit_on = op == BinaryOp::OrElse;
                let l = self.eval_bool(left, env, op)?;
                if l == short_circuit_on {
                    return Ok(Value::Bool(l));
                }
                Ok(Value::Bool(self.eval_bool(right, env, op)?))
            }
            _ => {
                let l = self.evaluate(left, env)?;
                let r = self.evaluate(right, env)?;
                binary(op, l, r)
            }
        }
    }

    fn eval_bool(&mut self, expr: &Expr, env: &Env, op: BinaryOp) -> Result<bool, EvalError> {
        match self.evaluate(expr, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::mismatch(op.symbol(), "bool", &other)),
        }
    }

    fn construct(&self, ty: TypeId) -> Value {
        let known = self.db.well_known();
        match named_type(self.db, ty) {
            Some(named) if named.def == known.list => Value::list(Vec::new()),
            Some(named) if named.def == known.hash_set => {
                Value::collection(CollectionKind::Set, Vec::new())
            }
            Some(_) if default_value(self.db, ty).is_null() => {
                Value::Object(Arc::new(ObjectValue {
                    ty,
                    fields: FxHashMap::default(),
                }))
            }
            _ => default_value(self.db, ty),
        }
    }
}

fn constant(value: &ConstValue) -> Value {
    match value {
        ConstValue::Null => Value::Null,
        ConstValue::Bool(b) => Value::Bool(*b),
        ConstValue::Int(i) => Value::Int(*i),
        ConstValue::Double(d) => Value::Double(*d),
        ConstValue::Str(s) => Value::Str(Arc::clone(s)),
    }
}

fn convert(value: Value, ty: TypeId) -> Value {
    match (value, ty) {
        (Value::Int(i), TypeId::DOUBLE | TypeId::DECIMAL) => Value::Double(i as f64),
        (Value::Double(d), TypeId::INT32 | TypeId::INT64) => Value::Int(d.trunc() as i64),
        (value, _) => value,
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Negate, Value::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
        (UnaryOp::Negate, Value::Double(d)) => Ok(Value::Double(-d)),
        (_, Value::Null) => Ok(Value::Null),
        (UnaryOp::Not, other) => Err(EvalError::mismatch("!", "bool", &other)),
        (UnaryOp::Negate, other) => Err(EvalError::mismatch("-", "number", &other)),
    }
}

/// Non-short-circuiting binary operators. Comparisons involving `null` are
/// false and arithmetic on `null` is `null`, as with lifted operators.
fn binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(l.loosely_equals(&r))),
        BinaryOp::NotEqual => Ok(Value::Bool(!l.loosely_equals(&r))),
        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual => {
            if l.is_null() || r.is_null() {
                return Ok(Value::Bool(false));
            }
            let ordering = compare(op, &l, &r)?;
            Ok(Value::Bool(match op {
                BinaryOp::LessThan => ordering == Ordering::Less,
                BinaryOp::LessThanOrEqual => ordering != Ordering::Greater,
                BinaryOp::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
            arithmetic(op, l, r)
        }
        BinaryOp::AndAlso | BinaryOp::OrElse => match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::AndAlso {
                a && b
            } else {
                a || b
            })),
            (other, _) => Err(EvalError::mismatch(op.symbol(), "bool", &other)),
        },
    }
}

fn compare(op: BinaryOp, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
            (None, _) => Err(EvalError::mismatch(op.symbol(), "comparable", l)),
            (_, None) => Err(EvalError::mismatch(op.symbol(), "comparable", r)),
        },
    }
}

fn arithmetic(op: BinaryOp, l: Value, r: Value) -> Result<Value, EvalError> {
    match (op, &l, &r) {
        (BinaryOp::Add, Value::Str(a), _) => Ok(Value::string(&format!("{a}{}", concat_text(&r)))),
        (BinaryOp::Add, _, Value::Str(b)) => Ok(Value::string(&format!("{}{b}", concat_text(&l)))),
        (_, Value::Null, _) | (_, _, Value::Null) => Ok(Value::Null),
        (_, Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
                BinaryOp::Subtract => Ok(Value::Int(a.wrapping_sub(b))),
                BinaryOp::Multiply => Ok(Value::Int(a.wrapping_mul(b))),
                _ => a
                    .checked_div(b)
                    .map(Value::Int)
                    .ok_or(EvalError::DivideByZero),
            }
        }
        _ => {
            let a = l
                .as_f64()
                .ok_or_else(|| EvalError::mismatch(op.symbol(), "number", &l))?;
            let b = r
                .as_f64()
                .ok_or_else(|| EvalError::mismatch(op.symbol(), "number", &r))?;
            Ok(Value::Double(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Subtract => a - b,
                BinaryOp::Multiply => a * b,
                _ => a / b,
            }))
        }
    }
}

/// Text of a value as string concatenation sees it: strings unquoted, null empty.
fn concat_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Str(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn element_at(target: Value, index: Value) -> Result<Value, EvalError> {
    let items = match &target {
        Value::Null => {
            return Err(EvalError::NullReference {
                member: "[]".to_string(),
            });
        }
        Value::Collection(c) => &c.items,
        other => return Err(EvalError::mismatch("index", "collection", other)),
    };
    let &Value::Int(i) = &index else {
        return Err(EvalError::mismatch("index", "int", &index));
    };
    usize::try_from(i)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(EvalError::IndexOutOfRange {
            index: i,
            len: items.len(),
        })
}

#[cfg(test)]
#[path = "../tests/interpreter_tests.rs"]
mod tests;
