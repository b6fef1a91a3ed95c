//! Typed scalar values produced by the converters.

use serde::Serialize;

use crate::message::Kind;

/// A typed scalar field value.
///
/// Serializes as the bare JSON scalar.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
}

impl Value {
    /// Get the field kind this value belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::I32(_) => Kind::Int32,
            Value::I64(_) => Kind::Int64,
            Value::U32(_) => Kind::Uint32,
            Value::U64(_) => Kind::Uint64,
            Value::F32(_) => Kind::Float32,
            Value::F64(_) => Kind::Float64,
            Value::String(_) => Kind::String,
        }
    }

    /// Get the zero value of a scalar kind, or `None` for non-scalar kinds.
    pub fn default_for(kind: Kind) -> Option<Self> {
        match kind {
            Kind::Bool => Some(Value::Bool(false)),
            Kind::Int32 => Some(Value::I32(0)),
            Kind::Int64 => Some(Value::I64(0)),
            Kind::Uint32 => Some(Value::U32(0)),
            Kind::Uint64 => Some(Value::U64(0)),
            Kind::Float32 => Some(Value::F32(0.0)),
            Kind::Float64 => Some(Value::F64(0.0)),
            Kind::String => Some(Value::String(String::new())),
            Kind::Bytes | Kind::Message | Kind::Map => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
