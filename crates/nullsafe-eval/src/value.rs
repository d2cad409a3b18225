//! Runtime values.

use nullsafe_expr::{Expr, Param};
use nullsafe_types::{
    DefKind, IntrinsicKind, TypeData, TypeId, TypeInterner, is_nullable_or_reference,
};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Parameter bindings visible to an expression.
pub type Env = FxHashMap<Arc<str>, Value>;

/// A runtime value. Compound values are reference-counted so cloning a value
/// never copies its contents.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Arc<str>),
    Object(Arc<ObjectValue>),
    Collection(Arc<CollectionValue>),
    Closure(Arc<Closure>),
}

/// An instance of a class or struct.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    pub ty: TypeId,
    pub fields: FxHashMap<Arc<str>, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
    Array,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionValue {
    pub kind: CollectionKind,
    pub items: Vec<Value>,
}

/// A lambda together with the bindings it was created under.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure {
    pub params: Vec<Param>,
    pub body: Expr,
    pub env: Env,
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(s.into())
    }

    pub fn object(ty: TypeId, fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, value)| (Arc::from(name), value))
            .collect();
        Value::Object(Arc::new(ObjectValue { ty, fields }))
    }

    pub fn collection(kind: CollectionKind, items: Vec<Value>) -> Self {
        Value::Collection(Arc::new(CollectionValue { kind, items }))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::collection(CollectionKind::List, items)
    }

    /// A set keeps the first occurrence of each distinct item.
    pub fn set(items: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|u| u.loosely_equals(&item)) {
                unique.push(item);
            }
        }
        Value::collection(CollectionKind::Set, unique)
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::collection(CollectionKind::Array, items)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Collection(_) => "collection",
            Value::Closure(_) => "closure",
        }
    }

    /// Equality as the query language sees it: numbers compare by value
    /// across `int` and `double`, objects and collections structurally.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Double(b)) | (Value::Double(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            _ => self == other,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

/// The zero value of `ty`: `null` for anything that can hold null, otherwise
/// `false`, `0`, `0.0`, or an empty struct instance.
pub fn default_value(db: &TypeInterner, ty: TypeId) -> Value {
    if is_nullable_or_reference(db, ty) {
        return Value::Null;
    }
    match db.lookup(ty) {
        Some(TypeData::Intrinsic(kind)) => match kind {
            IntrinsicKind::Boolean => Value::Bool(false),
            IntrinsicKind::Double | IntrinsicKind::Decimal => Value::Double(0.0),
            IntrinsicKind::Int32
            | IntrinsicKind::Int64
            | IntrinsicKind::Char
            | IntrinsicKind::DateTime => Value::Int(0),
            _ => Value::Null,
        },
        Some(TypeData::Named(named))
            if db.definitions().get_kind(named.def) == Some(DefKind::Struct) =>
        {
            Value::Object(Arc::new(ObjectValue {
                ty,
                fields: FxHashMap::default(),
            }))
        }
        _ => Value::Null,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(obj) => {
                let mut names: Vec<&Arc<str>> = obj.fields.keys().collect();
                names.sort();
                f.write_str("{")?;
                for (i, name) in names.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {}", obj.fields[name])?;
                }
                f.write_str(" }")
            }
            Value::Collection(items) => {
                f.write_str("[")?;
                for (i, item) in items.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Closure(closure) => write!(f, "<closure/{}>", closure.params.len()),
        }
    }
}
