//! JSON query documents.
//!
//! A document declares the types a query needs, the query's parameters, the
//! query itself as a tree of tagged nodes, and optional data to run it on:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Order", "fields": [{ "name": "Customer", "type": "Customer" }] },
//!     { "name": "Customer", "fields": [{ "name": "Name", "type": "string" }] }
//!   ],
//!   "parameters": { "order": "Order" },
//!   "expr": {
//!     "kind": "member", "name": "Name",
//!     "target": { "kind": "member", "name": "Customer",
//!                 "target": { "kind": "param", "name": "order" } }
//!   },
//!   "data": { "order": { "Customer": null } }
//! }
//! ```
//!
//! Declared types are non-generic; generic collections come from the
//! built-in `List<T>`, `HashSet<T>` and `IEnumerable<T>` family.

use anyhow::{Context, Result, anyhow, bail};
use nullsafe_eval::{Env, ObjectValue, Value, default_value};
use nullsafe_expr::{BinaryOp, ConstValue, Expr, UnaryOp};
use nullsafe_types::{
    DefId, DefinitionInfo, FieldInfo, IntrinsicKind, TypeFormatter, TypeId, TypeInterner, array_element_type,
    field_type, generic_single_argument, named_type, nullable_underlying_type, parse_type,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDocument {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Parameter name to type name
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    pub expr: ExprNode,
    /// Parameter name to JSON value; missing parameters take their type's default
    #[serde(default)]
    pub data: BTreeMap<String, Json>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Class,
    Struct,
    Interface,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// `false` for abstract classes or classes without a parameterless constructor
    #[serde(default = "constructible_by_default")]
    pub constructible: bool,
}

fn constructible_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// One expression node. `returns` and `type` fields hold type names.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprNode {
    Param {
        name: String,
    },
    Const {
        value: Json,
        #[serde(rename = "type", default)]
        ty: Option<String>,
    },
    Null {
        #[serde(rename = "type")]
        ty: String,
    },
    Default {
        #[serde(rename = "type")]
        ty: String,
    },
    Member {
        target: Box<ExprNode>,
        name: String,
    },
    StaticMember {
        owner: String,
        name: String,
        #[serde(rename = "type")]
        ty: String,
    },
    Call {
        object: Box<ExprNode>,
        method: String,
        #[serde(default)]
        args: Vec<ExprNode>,
        returns: String,
    },
    Extension {
        owner: String,
        method: String,
        args: Vec<ExprNode>,
        returns: String,
    },
    StaticCall {
        owner: String,
        method: String,
        #[serde(default)]
        args: Vec<ExprNode>,
        returns: String,
    },
    Lambda {
        params: Vec<FieldDecl>,
        body: Box<ExprNode>,
    },
    Binary {
        op: String,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Unary {
        op: String,
        operand: Box<ExprNode>,
    },
    Coalesce {
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Condition {
        test: Box<ExprNode>,
        if_true: Box<ExprNode>,
        if_false: Box<ExprNode>,
    },
    Convert {
        operand: Box<ExprNode>,
        #[serde(rename = "type")]
        ty: String,
    },
    New {
        #[serde(rename = "type")]
        ty: String,
    },
    NewArray {
        /// The array type, e.g. `Player[]`
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        elements: Vec<ExprNode>,
    },
    Index {
        target: Box<ExprNode>,
        index: Box<ExprNode>,
    },
}

impl QueryDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid query document")
    }

    /// Register the document's type declarations with `db`.
    ///
    /// Declarations may refer to each other in any order: every name is
    /// registered before any field or base is resolved.
    pub fn declare_types(&self, db: &TypeInterner) -> Result<()> {
        let defs = db.definitions();
        let mut declared: Vec<(DefId, &TypeDecl)> = Vec::with_capacity(self.types.len());

        for decl in &self.types {
            if IntrinsicKind::from_name(&decl.name).is_some() || defs.lookup(&decl.name).is_some() {
                bail!("type `{}` is already defined", decl.name);
            }
            let mut info = match decl.kind {
                DeclKind::Class => DefinitionInfo::class(&decl.name, &[]),
                DeclKind::Struct => DefinitionInfo::structure(&decl.name),
                DeclKind::Interface => DefinitionInfo::interface(&decl.name, &[]),
            };
            if !decl.constructible {
                info = info.without_default_constructor();
            }
            declared.push((db.define(info), decl));
        }

        for (def, decl) in declared {
            let bases = decl
                .bases
                .iter()
                .map(|base| resolve_type(db, base))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("in the bases of `{}`", decl.name))?;
            let fields = decl
                .fields
                .iter()
                .map(|field| Ok(FieldInfo::new(field.name.as_str(), resolve_type(db, &field.ty)?)))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("in the fields of `{}`", decl.name))?;
            defs.set_bases(def, bases);
            defs.set_fields(def, fields);
        }
        Ok(())
    }

    /// Parameter name to declared type.
    pub fn parameter_types(&self, db: &TypeInterner) -> Result<FxHashMap<String, TypeId>> {
        self.parameters
            .iter()
            .map(|(name, ty)| {
                let ty = resolve_type(db, ty)
                    .with_context(|| format!("in the type of parameter `{name}`"))?;
                Ok((name.clone(), ty))
            })
            .collect()
    }

    /// Build the expression tree. Types must already be declared.
    pub fn build_expr(&self, db: &TypeInterner) -> Result<Expr> {
        let mut lowering = Lowering {
            db,
            scopes: vec![self.parameter_types(db)?],
        };
        lowering.lower(&self.expr)
    }

    /// Bindings for every declared parameter.
    pub fn environment(&self, db: &TypeInterner) -> Result<Env> {
        let parameters = self.parameter_types(db)?;
        if let Some(stray) = self.data.keys().find(|name| !parameters.contains_key(*name)) {
            bail!("data given for undeclared parameter `{stray}`");
        }

        let mut env = Env::default();
        for (name, ty) in parameters {
            let value = match self.data.get(&name) {
                Some(json) => json_to_value(db, ty, json)
                    .with_context(|| format!("in the data for `{name}`"))?,
                None => default_value(db, ty),
            };
            env.insert(Arc::from(name.as_str()), value);
        }
        Ok(env)
    }
}

fn resolve_type(db: &TypeInterner, name: &str) -> Result<TypeId> {
    parse_type(db, name).with_context(|| format!("invalid type `{name}`"))
}

struct Lowering<'a> {
    db: &'a TypeInterner,
    /// Innermost lambda last
    scopes: Vec<FxHashMap<String, TypeId>>,
}

impl Lowering<'_> {
    fn ty(&self, name: &str) -> Result<TypeId> {
        resolve_type(self.db, name)
    }

    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn lower_all(&mut self, nodes: &[ExprNode]) -> Result<Vec<Expr>> {
        nodes.iter().map(|node| self.lower(node)).collect()
    }

    fn lower(&mut self, node: &ExprNode) -> Result<Expr> {
        let db = self.db;
        Ok(match node {
            ExprNode::Param { name } => {
                let ty = self
                    .lookup(name)
                    .ok_or_else(|| anyhow!("parameter `{name}` is not declared"))?;
                Expr::parameter(name, ty)
            }
            ExprNode::Const { value, ty } => {
                let declared = ty.as_deref().map(|t| self.ty(t)).transpose()?;
                lower_constant(value, declared)?
            }
            ExprNode::Null { ty } => Expr::null(self.ty(ty)?),
            ExprNode::Default { ty } => Expr::default_of(self.ty(ty)?),
            ExprNode::Member { target, name } => {
                let target = self.lower(target)?;
                Expr::member(db, target, name)?
            }
            ExprNode::StaticMember { owner, name, ty } => {
                Expr::static_member(self.ty(owner)?, name, self.ty(ty)?)
            }
            ExprNode::Call {
                object,
                method,
                args,
                returns,
            } => {
                let object = self.lower(object)?;
                let args = self.lower_all(args)?;
                Expr::call(object, method, args, self.ty(returns)?)
            }
            ExprNode::Extension {
                owner,
                method,
                args,
                returns,
            } => {
                let args = self.lower_all(args)?;
                Expr::extension_call(owner, method, args, self.ty(returns)?)?
            }
            ExprNode::StaticCall {
                owner,
                method,
                args,
                returns,
            } => {
                let args = self.lower_all(args)?;
                Expr::static_call(owner, method, args, self.ty(returns)?)
            }
            ExprNode::Lambda { params, body } => {
                let typed = params
                    .iter()
                    .map(|p| Ok((p.name.clone(), self.ty(&p.ty)?)))
                    .collect::<Result<Vec<(String, TypeId)>>>()?;
                self.scopes.push(typed.iter().cloned().collect());
                let body = self.lower(body);
                self.scopes.pop();
                let params = typed.iter().map(|(n, t)| (n.as_str(), *t)).collect();
                Expr::lambda(params, body?)
            }
            ExprNode::Binary { op, left, right } => {
                let op = binary_op(op)?;
                Expr::binary(op, self.lower(left)?, self.lower(right)?)
            }
            ExprNode::Unary { op, operand } => {
                let op = unary_op(op)?;
                Expr::unary(op, self.lower(operand)?)
            }
            ExprNode::Coalesce { left, right } => {
                Expr::coalesce(self.lower(left)?, self.lower(right)?)
            }
            ExprNode::Condition {
                test,
                if_true,
                if_false,
            } => Expr::try_condition(
                self.lower(test)?,
                self.lower(if_true)?,
                self.lower(if_false)?,
            )?,
            ExprNode::Convert { operand, ty } => Expr::convert(self.lower(operand)?, self.ty(ty)?),
            ExprNode::New { ty } => Expr::new_object(self.ty(ty)?, Vec::new()),
            ExprNode::NewArray { ty, elements } => {
                let elements = self.lower_all(elements)?;
                Expr::new_array(db, self.ty(ty)?, elements)?
            }
            ExprNode::Index { target, index } => {
                Expr::index(db, self.lower(target)?, self.lower(index)?)?
            }
        })
    }
}

fn lower_constant(value: &Json, declared: Option<TypeId>) -> Result<Expr> {
    let floating = declared.is_some_and(|t| t == TypeId::DOUBLE || t == TypeId::DECIMAL);
    let (value, inferred) = match value {
        Json::Null => (ConstValue::Null, TypeId::OBJECT),
        Json::Bool(b) => (ConstValue::Bool(*b), TypeId::BOOLEAN),
        Json::Number(n) => match n.as_i64() {
            Some(i) if !floating => (ConstValue::Int(i), TypeId::INT32),
            _ => {
                let d = n
                    .as_f64()
                    .ok_or_else(|| anyhow!("number `{n}` is out of range"))?;
                (ConstValue::Double(d), TypeId::DOUBLE)
            }
        },
        Json::String(s) => (ConstValue::Str(Arc::from(s.as_str())), TypeId::STRING),
        other => bail!("a constant must be a scalar, found `{other}`"),
    };
    Ok(Expr::constant(value, declared.unwrap_or(inferred)))
}

const BINARY_OPS: [BinaryOp; 12] = [
    BinaryOp::Equal,
    BinaryOp::NotEqual,
    BinaryOp::LessThan,
    BinaryOp::LessThanOrEqual,
    BinaryOp::GreaterThan,
    BinaryOp::GreaterThanOrEqual,
    BinaryOp::Add,
    BinaryOp::Subtract,
    BinaryOp::Multiply,
    BinaryOp::Divide,
    BinaryOp::AndAlso,
    BinaryOp::OrElse,
];

fn binary_op(symbol: &str) -> Result<BinaryOp> {
    BINARY_OPS
        .into_iter()
        .find(|op| op.symbol() == symbol)
        .ok_or_else(|| anyhow!("unknown binary operator `{symbol}`"))
}

fn unary_op(symbol: &str) -> Result<UnaryOp> {
    [UnaryOp::Not, UnaryOp::Negate]
        .into_iter()
        .find(|op| op.symbol() == symbol)
        .ok_or_else(|| anyhow!("unknown unary operator `{symbol}`"))
}

/// Convert JSON data to a runtime value, using `ty` to pick number
/// representations, collection kinds and object field types.
pub fn json_to_value(db: &TypeInterner, ty: TypeId, json: &Json) -> Result<Value> {
    let ty = nullable_underlying_type(db, ty).unwrap_or(ty);
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) if ty != TypeId::DOUBLE && ty != TypeId::DECIMAL => Value::Int(i),
            _ => Value::Double(
                n.as_f64()
                    .ok_or_else(|| anyhow!("number `{n}` is out of range"))?,
            ),
        },
        Json::String(s) => Value::Str(Arc::from(s.as_str())),
        Json::Array(items) => {
            let element = array_element_type(db, ty)
                .or_else(|| generic_single_argument(db, ty))
                .unwrap_or(TypeId::OBJECT);
            let items = items
                .iter()
                .map(|item| json_to_value(db, element, item))
                .collect::<Result<Vec<_>>>()?;
            if array_element_type(db, ty).is_some() {
                Value::array(items)
            } else if is_set_type(db, ty) {
                Value::set(items)
            } else {
                Value::list(items)
            }
        }
        Json::Object(map) => {
            let mut fields = FxHashMap::default();
            for (name, field) in map {
                let field_ty = field_type(db, ty, name).ok_or_else(|| {
                    anyhow!(
                        "`{}` has no member `{name}`",
                        TypeFormatter::new(db).format(ty)
                    )
                })?;
                fields.insert(Arc::from(name.as_str()), json_to_value(db, field_ty, field)?);
            }
            Value::Object(Arc::new(ObjectValue { ty, fields }))
        }
    })
}

fn is_set_type(db: &TypeInterner, ty: TypeId) -> bool {
    let well_known = db.well_known();
    named_type(db, ty)
        .is_some_and(|named| named.def == well_known.hash_set || named.def == well_known.set_interface)
}
