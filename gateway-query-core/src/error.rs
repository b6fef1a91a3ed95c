//! Binding error types.
//!
//! - [`BindError`]: Fatal errors returned by the binder, each carrying the offending path
//! - [`ConvertError`]: Query text that does not parse as the target kind
//! - [`FieldError`]: Failures reported by a [`ReflectMessage`](crate::ReflectMessage)
//!   implementation
//!
//! Unknown fields and surplus values are not errors; the binder logs them and
//! moves on.

use crate::message::Kind;

/// Errors from parsing query text into a typed value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// No converter is registered for the kind.
    #[error("unsupported field type {0}")]
    Unsupported(Kind),

    /// The text is not a valid literal of the kind.
    #[error("parsing {value:?} as {kind}: {reason}")]
    Invalid {
        kind: Kind,
        value: String,
        reason: String,
    },
}

impl ConvertError {
    pub(crate) fn invalid<E: std::fmt::Display>(kind: Kind, value: &str, reason: E) -> Self {
        ConvertError::Invalid {
            kind,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised by message implementations when a field access is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The message has no field with this name.
    #[error("no field {field} in {message}")]
    NotFound { message: String, field: String },

    /// The value or operation does not match the field's kind or cardinality.
    #[error("field {field} is {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A repeated element write past the end of the sequence.
    #[error("index {index} out of range for field {field} of length {len}")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },

    /// A message field without a schema for its nested type.
    #[error("no message type for field {0}")]
    MissingMessageType(String),
}

/// Fatal errors from binding query parameters into a message.
///
/// Every variant carries the dot-path of the query key that failed, so the
/// caller can build a client-facing rejection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// A path continues past a field that is not a message.
    #[error("non-aggregate type in the middle of path: {path}")]
    NonAggregate { path: String },

    /// A path continues past a repeated field.
    #[error("unexpected repeated field in {path}")]
    RepeatedInPath { path: String },

    /// The target field has no converter.
    #[error("unsupported field type {kind} in {path}")]
    UnsupportedType { path: String, kind: Kind },

    /// A value failed to parse as the field's kind.
    #[error("invalid value for {path}: {source}")]
    Conversion {
        path: String,
        #[source]
        source: ConvertError,
    },

    /// A singular field was given no value.
    #[error("no value of field: {path}")]
    NoValue { path: String },

    /// The message rejected a field access.
    #[error("{path}: {source}")]
    Field {
        path: String,
        #[source]
        source: FieldError,
    },
}

impl BindError {
    /// Get the dot-path of the query key that failed.
    pub fn path(&self) -> &str {
        match self {
            BindError::NonAggregate { path }
            | BindError::RepeatedInPath { path }
            | BindError::UnsupportedType { path, .. }
            | BindError::Conversion { path, .. }
            | BindError::NoValue { path }
            | BindError::Field { path, .. } => path,
        }
    }

    /// Map a converter failure, keeping unsupported kinds distinct from bad input.
    pub(crate) fn from_convert(path: &str, err: ConvertError) -> Self {
        match err {
            ConvertError::Unsupported(kind) => BindError::UnsupportedType {
                path: path.to_string(),
                kind,
            },
            source => BindError::Conversion {
                path: path.to_string(),
                source,
            },
        }
    }

    pub(crate) fn field(path: &str, source: FieldError) -> Self {
        BindError::Field {
            path: path.to_string(),
            source,
        }
    }
}
