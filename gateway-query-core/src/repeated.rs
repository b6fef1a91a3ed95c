//! Repeated field binding.

use crate::convert::registry;
use crate::error::BindError;
use crate::message::{FieldDescriptor, ReflectMessage};

/// Replace a repeated field with one converted element per value.
///
/// The field is resized to `values.len()` default elements before any value
/// is parsed, and slots are written in order. A value that fails to parse
/// aborts the bind: earlier slots keep their converted values and later
/// slots stay at the element default. The caller rejects the whole request
/// on any error, so the partial write is never observed by a handler.
pub fn bind_repeated<S: AsRef<str>>(
    message: &mut dyn ReflectMessage,
    field: &FieldDescriptor,
    values: &[S],
    path: &str,
) -> Result<(), BindError> {
    let converter = registry().get(field.kind()).ok_or_else(|| BindError::UnsupportedType {
        path: path.to_string(),
        kind: field.kind(),
    })?;

    message
        .resize_repeated(field.name(), values.len())
        .map_err(|err| BindError::field(path, err))?;

    for (index, value) in values.iter().enumerate() {
        let converted =
            converter(value.as_ref()).map_err(|err| BindError::from_convert(path, err))?;
        message
            .set_repeated(field.name(), index, converted)
            .map_err(|err| BindError::field(path, err))?;
    }
    Ok(())
}
