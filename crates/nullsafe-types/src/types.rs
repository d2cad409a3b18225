//! Structural type representation.
//!
//! Types are interned into `TypeId` handles by [`crate::TypeInterner`]; the
//! structure behind a handle is a [`TypeData`]. Intrinsic types have fixed,
//! pre-registered ids so they can be named without an interner.

use crate::def::DefId;
use smallvec::SmallVec;

/// Interned type handle.
///
/// Cheap to copy and compare. Ids below [`TypeId::FIRST_USER`] are reserved
/// for intrinsics; everything else is only meaningful relative to the
/// interner that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel for "no type".
    pub const NONE: TypeId = TypeId(0);

    pub const VOID: TypeId = TypeId(1);
    pub const BOOLEAN: TypeId = TypeId(2);
    pub const INT32: TypeId = TypeId(3);
    pub const INT64: TypeId = TypeId(4);
    pub const DOUBLE: TypeId = TypeId(5);
    pub const DECIMAL: TypeId = TypeId(6);
    pub const CHAR: TypeId = TypeId(7);
    pub const DATE_TIME: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);
    pub const OBJECT: TypeId = TypeId(10);

    /// First id handed out for interned (non-intrinsic) types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 > 0 && self.0 < Self::FIRST_USER
    }
}

/// Built-in primitive types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Void,
    Boolean,
    Int32,
    Int64,
    Double,
    Decimal,
    Char,
    DateTime,
    String,
    Object,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 10] = [
        IntrinsicKind::Void,
        IntrinsicKind::Boolean,
        IntrinsicKind::Int32,
        IntrinsicKind::Int64,
        IntrinsicKind::Double,
        IntrinsicKind::Decimal,
        IntrinsicKind::Char,
        IntrinsicKind::DateTime,
        IntrinsicKind::String,
        IntrinsicKind::Object,
    ];

    pub const fn to_type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Void => TypeId::VOID,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Int32 => TypeId::INT32,
            IntrinsicKind::Int64 => TypeId::INT64,
            IntrinsicKind::Double => TypeId::DOUBLE,
            IntrinsicKind::Decimal => TypeId::DECIMAL,
            IntrinsicKind::Char => TypeId::CHAR,
            IntrinsicKind::DateTime => TypeId::DATE_TIME,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Object => TypeId::OBJECT,
        }
    }

    pub const fn from_type_id(id: TypeId) -> Option<Self> {
        match id {
            TypeId::VOID => Some(IntrinsicKind::Void),
            TypeId::BOOLEAN => Some(IntrinsicKind::Boolean),
            TypeId::INT32 => Some(IntrinsicKind::Int32),
            TypeId::INT64 => Some(IntrinsicKind::Int64),
            TypeId::DOUBLE => Some(IntrinsicKind::Double),
            TypeId::DECIMAL => Some(IntrinsicKind::Decimal),
            TypeId::CHAR => Some(IntrinsicKind::Char),
            TypeId::DATE_TIME => Some(IntrinsicKind::DateTime),
            TypeId::STRING => Some(IntrinsicKind::String),
            TypeId::OBJECT => Some(IntrinsicKind::Object),
            _ => None,
        }
    }

    /// Whether values of this type can never be null.
    ///
    /// `void` counts as a value type: an expression of type `void` has no
    /// value to be null.
    pub const fn is_value_type(self) -> bool {
        !matches!(self, IntrinsicKind::String | IntrinsicKind::Object)
    }

    /// Source-level keyword for this type.
    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Void => "void",
            IntrinsicKind::Boolean => "bool",
            IntrinsicKind::Int32 => "int",
            IntrinsicKind::Int64 => "long",
            IntrinsicKind::Double => "double",
            IntrinsicKind::Decimal => "decimal",
            IntrinsicKind::Char => "char",
            IntrinsicKind::DateTime => "DateTime",
            IntrinsicKind::String => "string",
            IntrinsicKind::Object => "object",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A reference to a (possibly generic) named definition.
///
/// `args` is empty for non-generic definitions and has one entry per type
/// parameter for constructed generics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub def: DefId,
    pub args: SmallVec<[TypeId; 2]>,
}

/// Structure of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// Nullable value type: `int?`
    Nullable(TypeId),
    /// Single-dimension array: `T[]`
    Array(TypeId),
    /// Class, struct or interface, possibly a constructed generic
    Named(NamedType),
    /// Positional type parameter of the enclosing generic definition.
    /// Only appears inside definition signatures (bases, fields).
    TypeParam(u32),
}
