//! # Gateway Query
//!
//! Bind URL query parameters into request messages for HTTP-to-RPC gateways
//! built with [Axum](https://github.com/tokio-rs/axum).
//!
//! A `GET /v1/books?filter.author=Le%20Guin&page_size=10` becomes a fully typed
//! request message before the handler runs. Field lookup goes through the
//! [`ReflectMessage`] trait, so generated types and schema-driven
//! [`DynamicMessage`]s are bound the same way.
//!
//! ## Features
//!
//! - **Axum-native:** [`QueryMessage`] is a standard `FromRequestParts` extractor.
//! - **Path-aware:** path-template variables and reserved prefixes are never bound.
//! - **Error Handling:** [`BindRejection`] maps to a Connect `invalid_argument`
//!   error response with HTTP 400.
//!
//! ## Getting Started
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use gateway_query::prelude::*;
//!
//! let app = Router::new()
//!     .route("/v1/books", get(list_books))
//!     .layer(QueryBindingLayer::new(QueryBindingConfig::new().with_reserved("utm")));
//! ```

mod config;
mod extract;
mod layer;
mod rejection;

pub use config::QueryBindingConfig;
pub use extract::QueryMessage;
pub use layer::{QueryBindingLayer, QueryBindingService};
pub use rejection::BindRejection;

// Re-export the binding engine
pub use gateway_query_core;
pub use gateway_query_core::{
    BindError, DynamicMessage, ExclusionFilter, FieldDescriptor, Kind, MessageDescriptor,
    QueryValues, ReflectMessage, Value, populate_query_parameters,
};

pub mod prelude {
    //! A prelude for `gateway-query` providing the most common types.
    pub use crate::config::QueryBindingConfig;
    pub use crate::extract::QueryMessage;
    pub use crate::layer::QueryBindingLayer;
    pub use crate::rejection::BindRejection;
    pub use gateway_query_core::{MessageDescriptor, ReflectMessage};
}
