//! Query parameter binding.
//!
//! Flow per key: split on `.` → exclusion filter → resolve → bind.
//! Repeated fields take every value of the key; singular fields take the
//! first.

use crate::convert::registry;
use crate::error::BindError;
use crate::filter::ExclusionFilter;
use crate::message::ReflectMessage;
use crate::query::QueryValues;
use crate::repeated::bind_repeated;
use crate::resolve::{Resolved, resolve};

/// Populate `message` from query string `values`.
///
/// Keys starting with a prefix reserved in `filter` are ignored. Keys naming
/// an unknown field are logged and ignored. The first fatal error aborts the
/// call; fields bound before it keep their values.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gateway_query_core::{
///     DynamicMessage, ExclusionFilter, FieldDescriptor, Kind, MessageDescriptor, QueryValues,
///     Value, populate_query_parameters,
/// };
///
/// let nested = Arc::new(
///     MessageDescriptor::new("example.Nested")
///         .with_field(FieldDescriptor::singular("value", Kind::Int32)),
/// );
/// let descriptor = Arc::new(
///     MessageDescriptor::new("example.Request")
///         .with_field(FieldDescriptor::message("nested", nested)),
/// );
/// let mut message = DynamicMessage::new(descriptor);
/// let values: QueryValues = [("nested.value", "42")].into_iter().collect();
///
/// populate_query_parameters(&mut message, &values, &ExclusionFilter::new()).unwrap();
/// assert_eq!(message.get_message("nested").unwrap().get("value"), Some(&Value::I32(42)));
/// ```
pub fn populate_query_parameters(
    message: &mut dyn ReflectMessage,
    values: &QueryValues,
    filter: &ExclusionFilter,
) -> Result<(), BindError> {
    for (key, key_values) in values.iter() {
        let path: Vec<&str> = key.split('.').collect();
        if filter.excludes(&path) {
            continue;
        }
        populate_query_parameter(message, &path, key_values)?;
    }
    Ok(())
}

/// Bind the values of a single key, given as path segments.
pub fn populate_query_parameter<S: AsRef<str>>(
    message: &mut dyn ReflectMessage,
    path: &[&str],
    values: &[S],
) -> Result<(), BindError> {
    let dotted = path.join(".");
    let (target, field) = match resolve(message, path)? {
        Resolved::Field { message, field } => (message, field),
        Resolved::Skip => return Ok(()),
    };

    if field.is_repeated() {
        return bind_repeated(target, &field, values, &dotted);
    }

    let value = match values {
        [] => return Err(BindError::NoValue { path: dotted }),
        [value] => value,
        [value, ..] => {
            tracing::warn!(
                target: "gateway_query",
                path = %dotted,
                count = values.len(),
                "too many field values"
            );
            value
        }
    };

    let converted = registry()
        .convert(field.kind(), value.as_ref())
        .map_err(|err| BindError::from_convert(&dotted, err))?;
    target
        .set_field(field.name(), converted)
        .map_err(|err| BindError::field(&dotted, err))
}
