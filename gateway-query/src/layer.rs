//! Middleware layer carrying the binding configuration.
//!
//! ```rust,ignore
//! use gateway_query::{QueryBindingConfig, QueryBindingLayer};
//!
//! let app = Router::new()
//!     .route("/v1/books/{book.id}", get(get_book))
//!     .layer(QueryBindingLayer::new(QueryBindingConfig::new().with_reserved("utm")));
//! ```

use axum::http::Request;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::config::QueryBindingConfig;

/// Layer that makes a [`QueryBindingConfig`] available to the
/// [`QueryMessage`](crate::QueryMessage) extractor.
#[derive(Debug, Clone, Default)]
pub struct QueryBindingLayer {
    config: QueryBindingConfig,
}

impl QueryBindingLayer {
    pub fn new(config: QueryBindingConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for QueryBindingLayer {
    type Service = QueryBindingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        QueryBindingService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service inserting the binding configuration into request extensions.
#[derive(Debug, Clone)]
pub struct QueryBindingService<S> {
    inner: S,
    config: QueryBindingConfig,
}

impl<S, B> Service<Request<B>> for QueryBindingService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.config.clone());
        self.inner.call(req)
    }
}
