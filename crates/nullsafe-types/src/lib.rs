//! Static type model for the nullsafe query rewriter.
//!
//! Expression trees carry a `TypeId` on every node. This crate owns what
//! those ids mean:
//!
//! - **Interning**: `TypeData` structures are deduplicated into `TypeId`s
//!   (`TypeInterner`), so type equality is an integer comparison and ids are
//!   cheap cache keys.
//! - **Definitions**: classes, structs and interfaces with their bases and
//!   fields (`DefinitionStore`). The BCL collection family (`IEnumerable<T>`
//!   through `List<T>` and `HashSet<T>`) is pre-registered.
//! - **Queries**: nullability, generic shape, array element, constructibility
//!   and assignability, all computed from static metadata only.

pub mod def;
mod format;
mod instantiate;
mod intern;
pub mod limits;
mod parse;
pub mod queries;
mod relations;
pub mod types;

pub use def::{DefId, DefKind, DefinitionInfo, DefinitionStore, FieldInfo};
pub use format::{TypeDisplay, TypeFormatter};
pub use instantiate::instantiate;
pub use intern::{TypeInterner, WellKnownDefs};
pub use parse::{TypeParseError, parse_type};
pub use queries::{
    array_element_type, field_type, generic_arguments, generic_single_argument,
    is_constructible, is_nullable_or_reference, is_value_type, named_type,
    nullable_underlying_type,
};
pub use relations::{base_types, is_assignable_to};
pub use types::{IntrinsicKind, NamedType, TypeData, TypeId};
