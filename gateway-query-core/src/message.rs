//! Message reflection types.
//!
//! This module provides the schema model the binder walks:
//! - [`Kind`] and [`Cardinality`]: What a field holds
//! - [`FieldDescriptor`] and [`MessageDescriptor`]: Static schema of a message
//! - [`FieldNaming`]: How field names are spelled in a schema
//! - [`ReflectMessage`]: Field access every bindable message implements

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};

use crate::error::FieldError;
use crate::value::Value;

/// Field kinds, matching the protobuf scalar types plus the aggregates.
///
/// `Bytes` and `Map` are part of the model so schemas can describe them,
/// but no converter exists for either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool = 0,
    Int32 = 1,
    Int64 = 2,
    Uint32 = 3,
    Uint64 = 4,
    Float32 = 5,
    Float64 = 6,
    String = 7,
    Bytes = 8,
    Message = 9,
    Map = 10,
}

impl Kind {
    /// Number of kinds, used to size kind-indexed tables.
    pub const COUNT: usize = Kind::Map as usize + 1;

    /// Get the protobuf spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Float32 => "float",
            Kind::Float64 => "double",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Message => "message",
            Kind::Map => "map",
        }
    }

    /// Returns whether values of this kind can be parsed from query text.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Kind::Bytes | Kind::Message | Kind::Map)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field holds one value or an ordered sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// How field names are spelled in a message schema.
///
/// Query keys always use lower snake case; the resolver translates each
/// segment with [`FieldNaming::field_name`] before looking it up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldNaming {
    /// `nested_value` (protobuf and Rust field names).
    #[default]
    Snake,
    /// `NestedValue`
    Pascal,
    /// `nestedValue` (protobuf JSON names).
    Camel,
}

impl FieldNaming {
    /// Translate a lower snake case path segment to this convention.
    pub fn field_name<'a>(&self, segment: &'a str) -> Cow<'a, str> {
        match self {
            FieldNaming::Snake => Cow::Borrowed(segment),
            // Split on underscores only; `sha256sum` stays one word
            FieldNaming::Pascal => Cow::Owned(segment.from_case(Case::Snake).to_case(Case::Pascal)),
            FieldNaming::Camel => Cow::Owned(segment.from_case(Case::Snake).to_case(Case::Camel)),
        }
    }
}

/// Schema entry for a single field.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    kind: Kind,
    cardinality: Cardinality,
    /// Schema of the nested type, for `Kind::Message` fields.
    message_type: Option<Arc<MessageDescriptor>>,
}

impl FieldDescriptor {
    /// Create a singular field.
    pub fn singular<S: Into<Cow<'static, str>>>(name: S, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Singular,
            message_type: None,
        }
    }

    /// Create a repeated field with the given element kind.
    pub fn repeated<S: Into<Cow<'static, str>>>(name: S, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Repeated,
            message_type: None,
        }
    }

    /// Create a singular nested-message field with a known schema.
    pub fn message<S: Into<Cow<'static, str>>>(
        name: S,
        message_type: Arc<MessageDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Message,
            cardinality: Cardinality::Singular,
            message_type: Some(message_type),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    /// Get the nested schema, if this is a message field that carries one.
    pub fn message_type(&self) -> Option<&Arc<MessageDescriptor>> {
        self.message_type.as_ref()
    }
}

/// Schema of a message: its name, naming convention and fields.
///
/// # Example
///
/// ```
/// use gateway_query_core::{FieldDescriptor, Kind, MessageDescriptor};
///
/// let descriptor = MessageDescriptor::new("example.Echo")
///     .with_field(FieldDescriptor::singular("id", Kind::String))
///     .with_field(FieldDescriptor::repeated("tags", Kind::String));
///
/// assert_eq!(descriptor.fields().len(), 2);
/// assert!(descriptor.field("tags").unwrap().is_repeated());
/// ```
#[derive(Clone, Debug)]
pub struct MessageDescriptor {
    name: Cow<'static, str>,
    naming: FieldNaming,
    fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    /// Create an empty schema using snake case field names.
    pub fn new<S: Into<Cow<'static, str>>>(name: S) -> Self {
        Self {
            name: name.into(),
            naming: FieldNaming::default(),
            fields: Vec::new(),
        }
    }

    /// Set the naming convention of the field names.
    pub fn with_naming(mut self, naming: FieldNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Get the fully-qualified message name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn naming(&self) -> FieldNaming {
        self.naming
    }

    /// Get the fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by its schema name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Current value of a field, as returned by [`ReflectMessage::get_field`].
#[derive(Debug)]
pub enum FieldValue<'a> {
    Scalar(Value),
    Repeated(Vec<Value>),
    Message(&'a dyn ReflectMessage),
}

/// Field access for messages the binder can write into.
///
/// Generated or hand-written message types implement this instead of being
/// inspected at runtime. Names passed to every method are schema names, as
/// listed by [`ReflectMessage::list_fields`].
///
/// `get_field` returns `None` for a nested message that has not been
/// allocated; the resolver relies on this to allocate each nested message
/// at most once.
pub trait ReflectMessage: fmt::Debug {
    /// Get the schema of this message.
    fn descriptor(&self) -> &MessageDescriptor;

    /// Get the current value of a field, or `None` if it is unknown or an
    /// unallocated message.
    fn get_field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Set a singular scalar field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), FieldError>;

    /// Allocate an empty nested message, attach it to the field and return it.
    fn new_nested_instance(&mut self, name: &str) -> Result<&mut dyn ReflectMessage, FieldError>;

    /// Get an already allocated nested message.
    fn nested_mut(&mut self, name: &str) -> Option<&mut dyn ReflectMessage>;

    /// Replace a repeated field with `len` default elements.
    fn resize_repeated(&mut self, name: &str, len: usize) -> Result<(), FieldError>;

    /// Write one element of a repeated field.
    fn set_repeated(&mut self, name: &str, index: usize, value: Value) -> Result<(), FieldError>;

    /// List the fields of this message.
    fn list_fields(&self) -> &[FieldDescriptor] {
        self.descriptor().fields()
    }
}
