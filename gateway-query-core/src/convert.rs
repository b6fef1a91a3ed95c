//! Type converter registry.
//!
//! Maps each scalar [`Kind`] to a function parsing query text into a
//! [`Value`]. The table is built at compile time and never changes, so it
//! can be read from any number of threads.
//!
//! Parsing rules:
//! - bool: `1 t T TRUE true True` and `0 f F FALSE false False`
//! - integers: decimal with optional sign, range-checked for the field width
//! - floats: IEEE-754 text including `inf` and `nan`; finite text that
//!   overflows the field width is rejected
//! - string: taken as is

use crate::error::ConvertError;
use crate::message::Kind;
use crate::value::Value;

/// A conversion function from query text to a typed value.
pub type Converter = fn(&str) -> Result<Value, ConvertError>;

/// Kind-indexed table of converters.
pub struct ConverterRegistry {
    table: [Option<Converter>; Kind::COUNT],
}

/// The process-wide registry.
static REGISTRY: ConverterRegistry = ConverterRegistry::standard();

/// Get the process-wide converter registry.
pub fn registry() -> &'static ConverterRegistry {
    &REGISTRY
}

/// Convert query text using the process-wide registry.
///
/// # Example
///
/// ```
/// use gateway_query_core::{Kind, Value, convert};
///
/// assert_eq!(convert(Kind::Int32, "42"), Ok(Value::I32(42)));
/// assert!(convert(Kind::Int32, "abc").is_err());
/// assert!(convert(Kind::Bytes, "abc").is_err());
/// ```
pub fn convert(kind: Kind, value: &str) -> Result<Value, ConvertError> {
    REGISTRY.convert(kind, value)
}

impl ConverterRegistry {
    /// Build the table of built-in scalar converters.
    pub const fn standard() -> Self {
        let mut table: [Option<Converter>; Kind::COUNT] = [None; Kind::COUNT];
        table[Kind::Bool as usize] = Some(parse_bool as Converter);
        table[Kind::Int32 as usize] = Some(parse_int32 as Converter);
        table[Kind::Int64 as usize] = Some(parse_int64 as Converter);
        table[Kind::Uint32 as usize] = Some(parse_uint32 as Converter);
        table[Kind::Uint64 as usize] = Some(parse_uint64 as Converter);
        table[Kind::Float32 as usize] = Some(parse_float32 as Converter);
        table[Kind::Float64 as usize] = Some(parse_float64 as Converter);
        table[Kind::String as usize] = Some(parse_string as Converter);
        Self { table }
    }

    /// Get the converter for a kind, or `None` if the kind is unsupported.
    pub fn get(&self, kind: Kind) -> Option<Converter> {
        self.table[kind as usize]
    }

    /// Convert query text to a value of the given kind.
    pub fn convert(&self, kind: Kind, value: &str) -> Result<Value, ConvertError> {
        let converter = self.get(kind).ok_or(ConvertError::Unsupported(kind))?;
        converter(value)
    }
}

fn parse_bool(value: &str) -> Result<Value, ConvertError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
        _ => Err(ConvertError::invalid(Kind::Bool, value, "invalid syntax")),
    }
}

fn parse_int32(value: &str) -> Result<Value, ConvertError> {
    value
        .parse()
        .map(Value::I32)
        .map_err(|e| ConvertError::invalid(Kind::Int32, value, e))
}

fn parse_int64(value: &str) -> Result<Value, ConvertError> {
    value
        .parse()
        .map(Value::I64)
        .map_err(|e| ConvertError::invalid(Kind::Int64, value, e))
}

fn parse_uint32(value: &str) -> Result<Value, ConvertError> {
    value
        .parse()
        .map(Value::U32)
        .map_err(|e| ConvertError::invalid(Kind::Uint32, value, e))
}

fn parse_uint64(value: &str) -> Result<Value, ConvertError> {
    value
        .parse()
        .map(Value::U64)
        .map_err(|e| ConvertError::invalid(Kind::Uint64, value, e))
}

fn parse_float32(value: &str) -> Result<Value, ConvertError> {
    let parsed: f32 = value
        .parse()
        .map_err(|e| ConvertError::invalid(Kind::Float32, value, e))?;
    if parsed.is_infinite() && !is_infinity_literal(value) {
        return Err(ConvertError::invalid(Kind::Float32, value, "value out of range"));
    }
    Ok(Value::F32(parsed))
}

fn parse_float64(value: &str) -> Result<Value, ConvertError> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| ConvertError::invalid(Kind::Float64, value, e))?;
    if parsed.is_infinite() && !is_infinity_literal(value) {
        return Err(ConvertError::invalid(Kind::Float64, value, "value out of range"));
    }
    Ok(Value::F64(parsed))
}

fn parse_string(value: &str) -> Result<Value, ConvertError> {
    Ok(Value::String(value.to_string()))
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
