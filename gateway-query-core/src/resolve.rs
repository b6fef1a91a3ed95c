//! Field path resolution.
//!
//! Walks a dot-path through a message, allocating nested messages on the way
//! down, and returns the message that owns the final field together with that
//! field's descriptor.

use crate::error::BindError;
use crate::message::{Cardinality, FieldDescriptor, FieldValue, Kind, ReflectMessage};

/// Outcome of resolving a path.
#[derive(Debug)]
pub enum Resolved<'m> {
    /// The final field and the message that owns it.
    Field {
        message: &'m mut dyn ReflectMessage,
        field: FieldDescriptor,
    },
    /// A segment names no field; the key should be dropped.
    Skip,
}

/// Resolve `path` against `message`.
///
/// Intermediate segments must name singular message fields. An unset nested
/// message is allocated once and reused by every later path through it.
/// The final segment must name a singular scalar or a repeated field;
/// repeated element kinds are checked by the repeated binder.
///
/// Unknown segments log a warning and yield [`Resolved::Skip`].
pub fn resolve<'m, S: AsRef<str>>(
    message: &'m mut dyn ReflectMessage,
    path: &[S],
) -> Result<Resolved<'m>, BindError> {
    let dotted = path
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".");
    resolve_segments(message, path, &dotted)
}

fn resolve_segments<'m, S: AsRef<str>>(
    message: &'m mut dyn ReflectMessage,
    segments: &[S],
    path: &str,
) -> Result<Resolved<'m>, BindError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(Resolved::Skip);
    };

    let descriptor = message.descriptor();
    let name = descriptor.naming().field_name(segment.as_ref()).into_owned();
    let Some(field) = descriptor.field(&name).cloned() else {
        tracing::warn!(
            target: "gateway_query",
            message_type = descriptor.name(),
            path,
            "field not found"
        );
        return Ok(Resolved::Skip);
    };

    if rest.is_empty() {
        return match (field.cardinality(), field.kind()) {
            (Cardinality::Repeated, _) => Ok(Resolved::Field { message, field }),
            (Cardinality::Singular, kind) if kind.is_scalar() => {
                Ok(Resolved::Field { message, field })
            }
            (Cardinality::Singular, kind) => Err(BindError::UnsupportedType {
                path: path.to_string(),
                kind,
            }),
        };
    }

    match (field.cardinality(), field.kind()) {
        (Cardinality::Repeated, _) => Err(BindError::RepeatedInPath {
            path: path.to_string(),
        }),
        (Cardinality::Singular, Kind::Message) => {
            let allocated = matches!(message.get_field(&name), Some(FieldValue::Message(_)));
            let nested = if allocated {
                message
                    .nested_mut(&name)
                    .ok_or_else(|| BindError::NonAggregate {
                        path: path.to_string(),
                    })?
            } else {
                message
                    .new_nested_instance(&name)
                    .map_err(|err| BindError::field(path, err))?
            };
            resolve_segments(nested, rest, path)
        }
        (Cardinality::Singular, _) => Err(BindError::NonAggregate {
            path: path.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicMessage;
    use crate::error::FieldError;
    use crate::message::{FieldNaming, MessageDescriptor};
    use crate::value::Value;
    use std::sync::Arc;

    fn schema() -> Arc<MessageDescriptor> {
        let inner = Arc::new(
            MessageDescriptor::new("test.Inner")
                .with_field(FieldDescriptor::singular("flag", Kind::Bool)),
        );
        let nested = Arc::new(
            MessageDescriptor::new("test.Nested")
                .with_field(FieldDescriptor::singular("value", Kind::Int32))
                .with_field(FieldDescriptor::singular("label", Kind::String))
                .with_field(FieldDescriptor::message("inner", inner)),
        );
        Arc::new(
            MessageDescriptor::new("test.Outer")
                .with_field(FieldDescriptor::singular("id", Kind::Int64))
                .with_field(FieldDescriptor::repeated("tags", Kind::String))
                .with_field(FieldDescriptor::message("nested", nested))
                .with_field(FieldDescriptor::singular("data", Kind::Bytes))
                .with_field(FieldDescriptor::singular("untyped", Kind::Message)),
        )
    }

    fn field_name(resolved: Resolved<'_>) -> String {
        match resolved {
            Resolved::Field { field, .. } => field.name().to_string(),
            Resolved::Skip => panic!("expected a field"),
        }
    }

    #[test]
    fn test_resolve_top_level_scalar() {
        let mut message = DynamicMessage::new(schema());
        let resolved = resolve(&mut message, &["id"]).unwrap();
        assert_eq!(field_name(resolved), "id");
        assert!(message.is_empty());
    }

    #[test]
    fn test_resolve_repeated_leaf() {
        let mut message = DynamicMessage::new(schema());
        match resolve(&mut message, &["tags"]).unwrap() {
            Resolved::Field { field, .. } => assert!(field.is_repeated()),
            Resolved::Skip => panic!("expected a field"),
        }
    }

    #[test]
    fn test_resolve_allocates_nested() {
        let mut message = DynamicMessage::new(schema());
        let resolved = resolve(&mut message, &["nested", "inner", "flag"]).unwrap();
        assert_eq!(field_name(resolved), "flag");

        let nested = message.get_message("nested").unwrap();
        assert!(nested.get_message("inner").is_some());
    }

    #[test]
    fn test_resolve_reuses_nested() {
        let mut message = DynamicMessage::new(schema());
        match resolve(&mut message, &["nested", "value"]).unwrap() {
            Resolved::Field { message, field } => {
                message.set_field(field.name(), Value::I32(1)).unwrap()
            }
            Resolved::Skip => panic!("expected a field"),
        }
        match resolve(&mut message, &["nested", "label"]).unwrap() {
            Resolved::Field { message, field } => {
                message.set_field(field.name(), Value::from("x")).unwrap()
            }
            Resolved::Skip => panic!("expected a field"),
        }

        let nested = message.get_message("nested").unwrap();
        assert_eq!(nested.get("value"), Some(&Value::I32(1)));
        assert_eq!(nested.get("label"), Some(&Value::from("x")));
    }

    #[test]
    fn test_resolve_unknown_field_skips() {
        let mut message = DynamicMessage::new(schema());
        assert!(matches!(resolve(&mut message, &["unknown_field"]), Ok(Resolved::Skip)));
        assert!(matches!(resolve(&mut message, &["nested", "missing"]), Ok(Resolved::Skip)));
        assert!(matches!(resolve(&mut message, &["missing", "value"]), Ok(Resolved::Skip)));
    }

    #[test]
    fn test_resolve_scalar_mid_path() {
        let mut message = DynamicMessage::new(schema());
        let err = resolve(&mut message, &["id", "x"]).unwrap_err();
        assert_eq!(
            err,
            BindError::NonAggregate {
                path: "id.x".into()
            }
        );
    }

    #[test]
    fn test_resolve_repeated_mid_path() {
        let mut message = DynamicMessage::new(schema());
        let err = resolve(&mut message, &["tags", "x"]).unwrap_err();
        assert_eq!(
            err,
            BindError::RepeatedInPath {
                path: "tags.x".into()
            }
        );
    }

    #[test]
    fn test_resolve_unsupported_leaf() {
        let mut message = DynamicMessage::new(schema());
        assert!(matches!(
            resolve(&mut message, &["data"]),
            Err(BindError::UnsupportedType { kind: Kind::Bytes, .. })
        ));
        assert!(matches!(
            resolve(&mut message, &["nested"]),
            Err(BindError::UnsupportedType { kind: Kind::Message, .. })
        ));
        assert!(message.get_message("nested").is_none());
    }

    #[test]
    fn test_resolve_allocation_failure() {
        let mut message = DynamicMessage::new(schema());
        let err = resolve(&mut message, &["untyped", "x"]).unwrap_err();
        assert_eq!(
            err,
            BindError::Field {
                path: "untyped.x".into(),
                source: FieldError::MissingMessageType("untyped".into()),
            }
        );
    }

    #[test]
    fn test_resolve_translates_naming() {
        let descriptor = Arc::new(
            MessageDescriptor::new("test.Pascal")
                .with_naming(FieldNaming::Pascal)
                .with_field(FieldDescriptor::singular("UserName", Kind::String)),
        );
        let mut message = DynamicMessage::new(descriptor);
        let resolved = resolve(&mut message, &["user_name"]).unwrap();
        assert_eq!(field_name(resolved), "UserName");
    }

    #[test]
    fn test_resolve_translates_names_with_digits() {
        let descriptor = Arc::new(
            MessageDescriptor::new("test.Camel")
                .with_naming(FieldNaming::Camel)
                .with_field(FieldDescriptor::singular("sha256sum", Kind::String))
                .with_field(FieldDescriptor::singular("field1aValue", Kind::Int32)),
        );
        let mut message = DynamicMessage::new(descriptor);
        let resolved = resolve(&mut message, &["sha256sum"]).unwrap();
        assert_eq!(field_name(resolved), "sha256sum");
        let resolved = resolve(&mut message, &["field1a_value"]).unwrap();
        assert_eq!(field_name(resolved), "field1aValue");
    }

    #[test]
    fn test_resolve_empty_path() {
        let mut message = DynamicMessage::new(schema());
        assert!(matches!(resolve::<&str>(&mut message, &[]), Ok(Resolved::Skip)));
    }
}
