//! Query parameter binding for HTTP-to-RPC gateways.
//!
//! This crate writes URL query parameters into request messages, addressing
//! fields by dot-separated paths such as `book.author.name`. Binding is driven
//! by the message schema, so it works for any type implementing
//! [`ReflectMessage`].
//!
//! ## Modules
//!
//! - [`message`]: Schema model and the [`ReflectMessage`] trait
//! - [`convert`]: Scalar converter registry
//! - [`filter`]: Exclusion of reserved path prefixes
//! - [`resolve`]: Field path resolution
//! - [`populate`]: Binding of a whole query into a message

pub mod convert;
mod dynamic;
mod error;
pub mod filter;
pub mod message;
pub mod populate;
mod query;
mod repeated;
pub mod resolve;
mod value;

pub use convert::{Converter, ConverterRegistry, convert, registry};
pub use dynamic::DynamicMessage;
pub use error::*;
pub use filter::ExclusionFilter;
pub use message::{
    Cardinality, FieldDescriptor, FieldNaming, FieldValue, Kind, MessageDescriptor, ReflectMessage,
};
pub use populate::{populate_query_parameter, populate_query_parameters};
pub use query::QueryValues;
pub use repeated::bind_repeated;
pub use resolve::{Resolved, resolve};
pub use value::Value;
