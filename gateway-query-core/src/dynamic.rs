//! Schema-driven message for gateways without generated types.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::FieldError;
use crate::message::{FieldDescriptor, FieldValue, Kind, MessageDescriptor, ReflectMessage};
use crate::value::Value;

/// A message whose shape is given by a [`MessageDescriptor`] at runtime.
///
/// Every write is checked against the schema. Nested messages are allocated
/// from the nested type carried by the field descriptor.
///
/// Serializes as a JSON object of its set fields, in declaration order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gateway_query_core::{
///     DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, ReflectMessage, Value,
/// };
///
/// let descriptor = Arc::new(
///     MessageDescriptor::new("example.Echo")
///         .with_field(FieldDescriptor::singular("id", Kind::Int32)),
/// );
/// let mut message = DynamicMessage::new(descriptor);
/// message.set_field("id", Value::I32(7)).unwrap();
///
/// assert_eq!(message.get("id"), Some(&Value::I32(7)));
/// assert!(message.set_field("id", Value::from("seven")).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct DynamicMessage {
    descriptor: Arc<MessageDescriptor>,
    values: BTreeMap<String, DynamicValue>,
    messages: BTreeMap<String, DynamicMessage>,
}

#[derive(Clone, Debug)]
enum DynamicValue {
    Scalar(Value),
    Repeated(Vec<Value>),
}

impl DynamicMessage {
    /// Create an empty message.
    pub fn new(descriptor: Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
            messages: BTreeMap::new(),
        }
    }

    /// Get a singular scalar field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.values.get(name) {
            Some(DynamicValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Get a repeated field.
    pub fn get_repeated(&self, name: &str) -> Option<&[Value]> {
        match self.values.get(name) {
            Some(DynamicValue::Repeated(values)) => Some(values),
            _ => None,
        }
    }

    /// Get an allocated nested message.
    pub fn get_message(&self, name: &str) -> Option<&DynamicMessage> {
        self.messages.get(name)
    }

    /// Returns whether no field has been set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.messages.is_empty()
    }
}

fn lookup<'d>(
    descriptor: &'d MessageDescriptor,
    name: &str,
) -> Result<&'d FieldDescriptor, FieldError> {
    descriptor.field(name).ok_or_else(|| FieldError::NotFound {
        message: descriptor.name().to_string(),
        field: name.to_string(),
    })
}

fn describe(field: &FieldDescriptor) -> String {
    if field.is_repeated() {
        format!("repeated {}", field.kind())
    } else {
        field.kind().to_string()
    }
}

fn mismatch(field: &FieldDescriptor, actual: impl Into<String>) -> FieldError {
    FieldError::TypeMismatch {
        field: field.name().to_string(),
        expected: describe(field),
        actual: actual.into(),
    }
}

impl ReflectMessage for DynamicMessage {
    fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
        if let Some(message) = self.messages.get(name) {
            return Some(FieldValue::Message(message as &dyn ReflectMessage));
        }
        match self.values.get(name)? {
            DynamicValue::Scalar(value) => Some(FieldValue::Scalar(value.clone())),
            DynamicValue::Repeated(values) => Some(FieldValue::Repeated(values.clone())),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), FieldError> {
        let field = lookup(&self.descriptor, name)?;
        if field.is_repeated() || field.kind() != value.kind() {
            return Err(mismatch(field, value.kind().as_str()));
        }
        self.values
            .insert(name.to_string(), DynamicValue::Scalar(value));
        Ok(())
    }

    fn new_nested_instance(&mut self, name: &str) -> Result<&mut dyn ReflectMessage, FieldError> {
        let field = lookup(&self.descriptor, name)?;
        if field.is_repeated() || field.kind() != Kind::Message {
            return Err(mismatch(field, "message"));
        }
        let message_type = field
            .message_type()
            .cloned()
            .ok_or_else(|| FieldError::MissingMessageType(name.to_string()))?;

        let fresh = DynamicMessage::new(message_type);
        let slot = match self.messages.entry(name.to_string()) {
            Entry::Vacant(entry) => entry.insert(fresh),
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = fresh;
                slot
            }
        };
        Ok(slot as &mut dyn ReflectMessage)
    }

    fn nested_mut(&mut self, name: &str) -> Option<&mut dyn ReflectMessage> {
        self.messages
            .get_mut(name)
            .map(|message| message as &mut dyn ReflectMessage)
    }

    fn resize_repeated(&mut self, name: &str, len: usize) -> Result<(), FieldError> {
        let field = lookup(&self.descriptor, name)?;
        if !field.is_repeated() {
            return Err(mismatch(field, format!("repeated {}", field.kind())));
        }
        let zero = Value::default_for(field.kind())
            .ok_or_else(|| mismatch(field, "scalar element"))?;
        self.values
            .insert(name.to_string(), DynamicValue::Repeated(vec![zero; len]));
        Ok(())
    }

    fn set_repeated(&mut self, name: &str, index: usize, value: Value) -> Result<(), FieldError> {
        let field = lookup(&self.descriptor, name)?;
        if !field.is_repeated() || field.kind() != value.kind() {
            return Err(mismatch(field, format!("repeated {}", value.kind())));
        }
        let values = match self.values.get_mut(name) {
            Some(DynamicValue::Repeated(values)) => values,
            _ => {
                return Err(FieldError::IndexOutOfRange {
                    field: name.to_string(),
                    index,
                    len: 0,
                });
            }
        };
        let len = values.len();
        let slot = values.get_mut(index).ok_or_else(|| FieldError::IndexOutOfRange {
            field: name.to_string(),
            index,
            len,
        })?;
        *slot = value;
        Ok(())
    }
}

impl Serialize for DynamicMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for field in self.descriptor.fields() {
            let name = field.name();
            if let Some(message) = self.messages.get(name) {
                map.serialize_entry(name, message)?;
                continue;
            }
            match self.values.get(name) {
                Some(DynamicValue::Scalar(value)) => map.serialize_entry(name, value)?,
                Some(DynamicValue::Repeated(values)) => map.serialize_entry(name, values)?,
                None => {}
            }
        }
        map.end()
    }
}
