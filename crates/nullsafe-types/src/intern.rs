//! Type interning for structural deduplication.
//!
//! This module implements the type interning engine that converts
//! `TypeData` structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - `TypeId` is a cheap, `Copy` key for caches such as the fallback cache

use crate::def::{DefId, DefinitionInfo, DefinitionStore};
use crate::queries;
use crate::types::{IntrinsicKind, NamedType, TypeData, TypeId};
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;
use tracing::trace;

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 16 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    index_to_key: RwLock<Vec<TypeData>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

/// Definitions of the collection types every interner knows about.
///
/// The relations mirror the .NET base class library:
///
/// ```text
/// IEnumerable<T>
/// ├── IReadOnlyCollection<T> ── IReadOnlyList<T>
/// └── ICollection<T> ─┬─ IList<T>
///                     └─ ISet<T>
/// List<T>    : IList<T>, IReadOnlyList<T>
/// HashSet<T> : ISet<T>, IReadOnlyCollection<T>
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WellKnownDefs {
    pub enumerable: DefId,
    pub read_only_collection: DefId,
    pub collection: DefId,
    pub read_only_list: DefId,
    pub list_interface: DefId,
    pub set_interface: DefId,
    pub list: DefId,
    pub hash_set: DefId,
}

impl WellKnownDefs {
    const UNREGISTERED: WellKnownDefs = WellKnownDefs {
        enumerable: DefId::INVALID,
        read_only_collection: DefId::INVALID,
        collection: DefId::INVALID,
        read_only_list: DefId::INVALID,
        list_interface: DefId::INVALID,
        set_interface: DefId::INVALID,
        list: DefId::INVALID,
        hash_set: DefId::INVALID,
    };

    /// Interfaces that a single-dimension array `T[]` implements.
    pub fn array_interfaces(&self) -> [DefId; 5] {
        [
            self.enumerable,
            self.read_only_collection,
            self.collection,
            self.read_only_list,
            self.list_interface,
        ]
    }
}

/// Type interning table.
/// Thread-safe via sharded `RwLock`s for concurrent access.
pub struct TypeInterner {
    shards: [TypeShard; SHARD_COUNT],
    definitions: DefinitionStore,
    well_known: WellKnownDefs,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics and
    /// collection definitions.
    pub fn new() -> Self {
        let mut interner = TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            definitions: DefinitionStore::new(),
            well_known: WellKnownDefs::UNREGISTERED,
        };
        interner.well_known = interner.register_collections();
        interner
    }

    fn register_collections(&self) -> WellKnownDefs {
        let t = self.type_param(0);
        let defs = &self.definitions;

        let enumerable = defs.register(DefinitionInfo::interface("IEnumerable", &["T"]));
        let read_only_collection = defs.register(
            DefinitionInfo::interface("IReadOnlyCollection", &["T"])
                .with_bases(vec![self.generic(enumerable, &[t])])
                .with_field("Count", TypeId::INT32),
        );
        let collection = defs.register(
            DefinitionInfo::interface("ICollection", &["T"])
                .with_bases(vec![self.generic(enumerable, &[t])])
                .with_field("Count", TypeId::INT32),
        );
        let read_only_list = defs.register(
            DefinitionInfo::interface("IReadOnlyList", &["T"])
                .with_bases(vec![self.generic(read_only_collection, &[t])]),
        );
        let list_interface = defs.register(
            DefinitionInfo::interface("IList", &["T"])
                .with_bases(vec![self.generic(collection, &[t])]),
        );
        let set_interface = defs.register(
            DefinitionInfo::interface("ISet", &["T"])
                .with_bases(vec![self.generic(collection, &[t])]),
        );
        let list = defs.register(DefinitionInfo::class("List", &["T"]).with_bases(vec![
            self.generic(list_interface, &[t]),
            self.generic(read_only_list, &[t]),
        ]));
        let hash_set = defs.register(DefinitionInfo::class("HashSet", &["T"]).with_bases(vec![
            self.generic(set_interface, &[t]),
            self.generic(read_only_collection, &[t]),
        ]));

        WellKnownDefs {
            enumerable,
            read_only_collection,
            collection,
            read_only_list,
            list_interface,
            set_interface,
            list,
            hash_set,
        }
    }

    pub fn definitions(&self) -> &DefinitionStore {
        &self.definitions
    }

    pub fn well_known(&self) -> &WellKnownDefs {
        &self.well_known
    }

    /// Register a definition and return the `DefId`.
    pub fn define(&self, info: DefinitionInfo) -> DefId {
        self.definitions.register(info)
    }

    /// Intern a type structure and return its `TypeId`.
    /// If the structure already exists, returns the existing `TypeId`.
    pub fn intern(&self, key: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = key {
            return kind.to_type_id();
        }

        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        trace!(shard = shard_idx, local_index, key = ?key, "TypeInterner::intern");
        storage.push(key.clone());
        map.insert(key, local_index);

        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the structure behind a `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return IntrinsicKind::from_type_id(id).map(TypeData::Intrinsic);
        }

        let raw_val = id.0.checked_sub(TypeId::FIRST_USER)?;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    /// Number of interned non-intrinsic types.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.index_to_key.read().expect("shard index_to_key lock poisoned").len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        kind.to_type_id()
    }

    /// `inner?`. Nullable is only meaningful for value types; for types that
    /// already admit null the input is returned unchanged.
    pub fn nullable(&self, inner: TypeId) -> TypeId {
        if !queries::is_value_type(self, inner)
            || queries::nullable_underlying_type(self, inner).is_some()
        {
            return inner;
        }
        self.intern(TypeData::Nullable(inner))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    /// Non-generic reference to a definition.
    pub fn named(&self, def: DefId) -> TypeId {
        self.generic(def, &[])
    }

    /// Constructed generic: `def<args...>`.
    pub fn generic(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Named(NamedType {
            def,
            args: SmallVec::from_slice(args),
        }))
    }

    pub fn type_param(&self, index: u32) -> TypeId {
        self.intern(TypeData::TypeParam(index))
    }

    pub fn list_of(&self, element: TypeId) -> TypeId {
        self.generic(self.well_known.list, &[element])
    }

    pub fn hash_set_of(&self, element: TypeId) -> TypeId {
        self.generic(self.well_known.hash_set, &[element])
    }

    pub fn enumerable_of(&self, element: TypeId) -> TypeId {
        self.generic(self.well_known.enumerable, &[element])
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
