use thiserror::Error;

/// A runtime fault while evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Member read or instance call on a null value.
    #[error("null reference while accessing `{member}`")]
    NullReference { member: String },

    /// Extension call whose receiver argument is null.
    #[error("`{method}` was called with a null receiver")]
    NullReceiver { method: String },

    #[error("unknown method `{method}` for {receiver}")]
    UnknownMethod { method: String, receiver: String },

    #[error("unknown member `{member}` on {receiver}")]
    UnknownMember { member: String, receiver: String },

    #[error("parameter `{name}` is not bound")]
    UnboundParameter { name: String },

    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{method}` found no matching element")]
    EmptySequence { method: String },

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("division by zero")]
    DivideByZero,
}

impl EvalError {
    pub(crate) fn mismatch(context: &str, expected: &'static str, found: &crate::Value) -> Self {
        EvalError::TypeMismatch {
            context: context.to_string(),
            expected,
            found: found.kind_name(),
        }
    }
}
