//! Named type definitions.
//!
//! A `DefId` identifies a class, struct or interface. The structural type
//! layer only stores `DefId`s inside [`NamedType`](crate::NamedType); all
//! nominal facts (kind, bases, fields, constructibility) live in the
//! [`DefinitionStore`].
//!
//! Definitions may be registered before their fields are known so that
//! mutually recursive types (`Order.Customer`, `Customer.Orders`) can refer to
//! each other: register every definition first, intern the named types, then
//! attach fields with [`DefinitionStore::set_fields`].

use crate::types::TypeId;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Definition identifier, owned by the store that allocated it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Kind of named definition.
///
/// | Kind | Nullable | Constructible |
/// |------|----------|---------------|
/// | Class | yes | when it has a parameterless constructor |
/// | Struct | no | always |
/// | Interface | yes | never |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Class,
    Struct,
    Interface,
}

/// A field or property declared on a definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: Arc<str>,
    /// May mention `TypeParam`s of the declaring definition.
    pub type_id: TypeId,
}

impl FieldInfo {
    pub fn new(name: impl Into<Arc<str>>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
        }
    }
}

/// Everything known about a named definition.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,
    pub name: Arc<str>,
    /// Names of the generic parameters, in positional order
    pub type_params: Vec<Arc<str>>,
    /// Base class and implemented interfaces (may mention `TypeParam`s)
    pub bases: Vec<TypeId>,
    pub fields: Vec<FieldInfo>,
    /// Whether `new T()` is valid for this definition
    pub has_default_constructor: bool,
}

impl DefinitionInfo {
    fn with_kind(kind: DefKind, name: &str, type_params: &[&str]) -> Self {
        Self {
            kind,
            name: Arc::from(name),
            type_params: type_params.iter().map(|p| Arc::from(*p)).collect(),
            bases: Vec::new(),
            fields: Vec::new(),
            has_default_constructor: kind != DefKind::Interface,
        }
    }

    /// A class with a parameterless constructor.
    pub fn class(name: &str, type_params: &[&str]) -> Self {
        Self::with_kind(DefKind::Class, name, type_params)
    }

    /// A non-generic value type.
    pub fn structure(name: &str) -> Self {
        Self::with_kind(DefKind::Struct, name, &[])
    }

    pub fn interface(name: &str, type_params: &[&str]) -> Self {
        Self::with_kind(DefKind::Interface, name, type_params)
    }

    pub fn with_bases(mut self, bases: Vec<TypeId>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_field(mut self, name: &str, type_id: TypeId) -> Self {
        self.fields.push(FieldInfo::new(name, type_id));
        self
    }

    /// Mark the class as abstract or lacking a public parameterless constructor.
    pub fn without_default_constructor(mut self) -> Self {
        self.has_default_constructor = false;
        self
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| &*f.name == name)
    }
}

/// Thread-safe storage for type definitions.
///
/// Uses `DashMap` so that definitions can be read from many rewriting threads
/// while a host registers new ones.
pub struct DefinitionStore {
    /// Unique instance ID for debugging (tracks which store instance this is)
    instance_id: u64,
    definitions: DashMap<DefId, DefinitionInfo>,
    /// Name -> `DefId`; the latest registration of a name wins
    by_name: DashMap<Arc<str>, DefId>,
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new - creating new instance");
        Self {
            instance_id,
            definitions: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    fn allocate(&self) -> DefId {
        DefId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            def_id = id.0,
            kind = ?info.kind,
            name = %info.name,
            "DefinitionStore::register"
        );
        self.by_name.insert(info.name.clone(), id);
        self.definitions.insert(id, info);
        id
    }

    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn get_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    pub fn get_name(&self, id: DefId) -> Option<Arc<str>> {
        self.definitions.get(&id).map(|r| r.name.clone())
    }

    pub fn get_arity(&self, id: DefId) -> Option<usize> {
        self.definitions.get(&id).map(|r| r.arity())
    }

    pub fn get_bases(&self, id: DefId) -> Option<Vec<TypeId>> {
        self.definitions.get(&id).map(|r| r.bases.clone())
    }

    /// Declared type of `name` on this definition only (bases are not searched).
    pub fn get_field_type(&self, id: DefId, name: &str) -> Option<TypeId> {
        self.definitions
            .get(&id)
            .and_then(|r| r.field(name).map(|f| f.type_id))
    }

    pub fn has_default_constructor(&self, id: DefId) -> bool {
        self.definitions
            .get(&id)
            .is_some_and(|r| r.has_default_constructor)
    }

    /// Find a definition by its declared name.
    pub fn lookup(&self, name: &str) -> Option<DefId> {
        self.by_name.get(name).map(|r| *r)
    }

    /// Replace the fields of a definition.
    pub fn set_fields(&self, id: DefId, fields: Vec<FieldInfo>) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            entry.fields = fields;
        }
    }

    pub fn add_field(&self, id: DefId, field: FieldInfo) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            entry.fields.push(field);
        }
    }

    pub fn set_bases(&self, id: DefId, bases: Vec<TypeId>) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            entry.bases = bases;
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
