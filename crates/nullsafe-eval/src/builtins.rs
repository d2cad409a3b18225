//! Built-in method implementations.
//!
//! Methods are looked up by name. The same implementation serves the
//! instance form (`xs.Count()`) and the extension form
//! (`Enumerable.Count(xs)`): the evaluator resolves the receiver first and
//! passes the remaining arguments. Static helpers are registered under a
//! qualified `Owner.Name` key and receive `Value::Null` as their receiver.

use crate::error::EvalError;
use crate::interpreter::Evaluator;
use crate::value::{CollectionValue, Value, default_value};
use nullsafe_types::TypeId;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Static information about the call being dispatched.
#[derive(Clone, Copy, Debug)]
pub struct CallSite<'e> {
    pub method: &'e str,
    /// Declared return type of the call node
    pub ret: TypeId,
}

pub type MethodFn =
    fn(&mut Evaluator<'_>, &CallSite<'_>, Value, Vec<Value>) -> Result<Value, EvalError>;

/// Name-indexed method implementations.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: FxHashMap<Arc<str>, MethodFn>,
}

impl MethodTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The LINQ-style methods every evaluator understands.
    pub fn with_builtins() -> Self {
        let mut table = MethodTable::new();
        table.register("Count", count);
        table.register("Any", any);
        table.register("First", first);
        table.register("FirstOrDefault", first_or_default);
        table.register("Where", where_);
        table.register("Select", select);
        table.register("Sum", sum);
        table.register("Contains", contains);
        table.register("ToUpper", to_upper);
        table.register("Length", length);
        table.register("String.IsNullOrEmpty", is_null_or_empty);
        table
    }

    /// Add or replace a method.
    pub fn register(&mut self, name: &str, method: MethodFn) {
        self.methods.insert(name.into(), method);
    }

    pub fn get(&self, name: &str) -> Option<MethodFn> {
        self.methods.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn items(site: &CallSite<'_>, receiver: &Value) -> Result<Arc<CollectionValue>, EvalError> {
    match receiver {
        Value::Collection(c) => Ok(Arc::clone(c)),
        other => Err(EvalError::mismatch(site.method, "collection", other)),
    }
}

/// Items of `receiver`, filtered by the optional predicate in `args[0]`.
fn matching(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: &Value,
    args: &[Value],
) -> Result<Vec<Value>, EvalError> {
    let collection = items(site, receiver)?;
    let Some(predicate) = args.first() else {
        return Ok(collection.items.clone());
    };
    let mut kept = Vec::new();
    for item in &collection.items {
        if test(ev, site, predicate, item.clone())? {
            kept.push(item.clone());
        }
    }
    Ok(kept)
}

fn test(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    predicate: &Value,
    item: Value,
) -> Result<bool, EvalError> {
    match ev.invoke(predicate, vec![item])? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::mismatch(site.method, "bool", &other)),
    }
}

// =============================================================================
// Sequence methods
// =============================================================================

fn count(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let kept = matching(ev, site, &receiver, &args)?;
    Ok(Value::Int(kept.len() as i64))
}

fn any(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let kept = matching(ev, site, &receiver, &args)?;
    Ok(Value::Bool(!kept.is_empty()))
}

fn first(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    matching(ev, site, &receiver, &args)?
        .into_iter()
        .next()
        .ok_or_else(|| EvalError::EmptySequence {
            method: site.method.to_string(),
        })
}

fn first_or_default(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let found = matching(ev, site, &receiver, &args)?.into_iter().next();
    Ok(found.unwrap_or_else(|| default_value(ev.types(), site.ret)))
}

fn where_(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::mismatch(site.method, "closure", &Value::Null));
    }
    Ok(Value::list(matching(ev, site, &receiver, &args)?))
}

fn select(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let collection = items(site, &receiver)?;
    let selector = args.first().cloned().unwrap_or(Value::Null);
    let mut mapped = Vec::with_capacity(collection.items.len());
    for item in &collection.items {
        mapped.push(ev.invoke(&selector, vec![item.clone()])?);
    }
    Ok(Value::list(mapped))
}

/// Nulls are skipped. Integers stay integral unless the call is typed as a
/// floating-point sum or a `double` shows up.
fn sum(
    ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let collection = items(site, &receiver)?;
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut floating = site.ret == TypeId::DOUBLE || site.ret == TypeId::DECIMAL;

    for item in &collection.items {
        let value = match args.first() {
            Some(selector) => ev.invoke(selector, vec![item.clone()])?,
            None => item.clone(),
        };
        match value {
            Value::Null => {}
            Value::Int(i) => {
                int_total = int_total.wrapping_add(i);
                float_total += i as f64;
            }
            Value::Double(d) => {
                floating = true;
                float_total += d;
            }
            other => return Err(EvalError::mismatch(site.method, "number", &other)),
        }
    }

    Ok(if floating {
        Value::Double(float_total)
    } else {
        Value::Int(int_total)
    })
}

fn contains(
    _ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    let needle = args.into_iter().next().unwrap_or(Value::Null);
    match (&receiver, &needle) {
        (Value::Str(haystack), Value::Str(needle)) => Ok(Value::Bool(haystack.contains(&**needle))),
        (Value::Str(_), other) => Err(EvalError::mismatch(site.method, "string", other)),
        _ => {
            let collection = items(site, &receiver)?;
            Ok(Value::Bool(
                collection.items.iter().any(|item| item.loosely_equals(&needle)),
            ))
        }
    }
}

// =============================================================================
// String methods
// =============================================================================

fn to_upper(
    _ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    _args: Vec<Value>,
) -> Result<Value, EvalError> {
    match receiver {
        Value::Str(s) => Ok(Value::string(&s.to_uppercase())),
        other => Err(EvalError::mismatch(site.method, "string", &other)),
    }
}

fn length(
    _ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    receiver: Value,
    _args: Vec<Value>,
) -> Result<Value, EvalError> {
    match receiver {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Collection(c) => Ok(Value::Int(c.items.len() as i64)),
        other => Err(EvalError::mismatch(site.method, "string", &other)),
    }
}

fn is_null_or_empty(
    _ev: &mut Evaluator<'_>,
    site: &CallSite<'_>,
    _receiver: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    match args.first() {
        None | Some(Value::Null) => Ok(Value::Bool(true)),
        Some(Value::Str(s)) => Ok(Value::Bool(s.is_empty())),
        Some(other) => Err(EvalError::mismatch(site.method, "string", other)),
    }
}
