use nullsafe_types::TypeId;
use thiserror::Error;

/// Validation failure while building an expression through the factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("type {ty:?} has no member named `{member}`")]
    UnknownMember { ty: TypeId, member: String },

    #[error("conditional test must be `bool`, found {found:?}")]
    NonBooleanCondition { found: TypeId },

    #[error("conditional branches disagree: {if_true:?} vs {if_false:?}")]
    BranchTypeMismatch { if_true: TypeId, if_false: TypeId },

    #[error("{ty:?} is not an array type")]
    NotAnArray { ty: TypeId },

    #[error("array of {expected:?} cannot hold an element of type {found:?}")]
    ElementTypeMismatch { expected: TypeId, found: TypeId },

    #[error("`{method}` is an extension method and needs its receiver as the first argument")]
    MissingReceiver { method: String },
}
