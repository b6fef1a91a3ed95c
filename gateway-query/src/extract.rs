//! Extractor binding the request query string into a message.
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, Query, RawPathParams};
use axum::http::{Uri, request::Parts};
use gateway_query_core::{ExclusionFilter, QueryValues, ReflectMessage, populate_query_parameters};

use crate::config::QueryBindingConfig;
use crate::rejection::BindRejection;

// Flag to ensure we only log the missing layer warning once per process
static WARNED_MISSING_LAYER: AtomicBool = AtomicBool::new(false);

/// Get the binding config from request extensions, or the default one if missing.
fn config_or_default(parts: &Parts) -> QueryBindingConfig {
    if let Some(config) = parts.extensions.get::<QueryBindingConfig>() {
        return config.clone();
    }

    if !WARNED_MISSING_LAYER.swap(true, Ordering::Relaxed) {
        tracing::warn!(
            target: "gateway_query",
            "QueryBindingLayer not found. Using default binding config."
        );
    }
    QueryBindingConfig::default()
}

/// Request message bound from URL query parameters.
///
/// Keys are dot-paths into the message (`?book.author.name=Le%20Guin`).
/// Path-template variables are excluded by default so query parameters never
/// override values the router already extracted. Fields bound from other
/// sources are the handler's concern.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_books(
///     QueryMessage(req): QueryMessage<ListBooksRequest>,
/// ) -> Json<ListBooksResponse> {
///     // req.page_size, req.filter.author, ... come from the query string
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QueryMessage<T>(pub T);

impl<T> QueryMessage<T> {
    /// Extract the inner message.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequestParts<S> for QueryMessage<T>
where
    S: Send + Sync,
    T: ReflectMessage + Default + Send,
{
    type Rejection = BindRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = config_or_default(parts);

        let path_params = if config.excludes_path_params() {
            match RawPathParams::from_request_parts(parts, state).await {
                Ok(params) => Some(params),
                // Routes without a path template have nothing to exclude
                Err(RawPathParamsRejection::MissingPathParams(_)) => None,
                Err(err) => return Err(BindRejection::InvalidPath(err.to_string())),
            }
        } else {
            None
        };
        let filter = exclusion_filter(&config, path_params.as_ref());

        let values = query_values(&parts.uri)?;
        let mut message = T::default();
        populate_query_parameters(&mut message, &values, &filter)?;
        Ok(QueryMessage(message))
    }
}

/// Combine reserved prefixes with path-template variable names.
fn exclusion_filter<'c>(
    config: &'c QueryBindingConfig,
    path_params: Option<&RawPathParams>,
) -> Cow<'c, ExclusionFilter> {
    let Some(params) = path_params else {
        return Cow::Borrowed(config.reserved());
    };
    let mut filter = config.reserved().clone();
    for (name, _) in params.iter() {
        filter.insert_dotted(name);
    }
    Cow::Owned(filter)
}

/// Decode the query string into values grouped by key.
fn query_values(uri: &Uri) -> Result<QueryValues, BindRejection> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|err| BindRejection::InvalidQuery(err.to_string()))?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::QueryBindingLayer;
    use axum::{
        Json, Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use gateway_query_core::{
        DynamicMessage, FieldDescriptor, FieldError, FieldValue, Kind, MessageDescriptor, Value,
    };
    use http_body_util::BodyExt;
    use std::sync::{Arc, LazyLock};
    use tower::ServiceExt;

    static ECHO: LazyLock<Arc<MessageDescriptor>> = LazyLock::new(|| {
        let status = Arc::new(
            MessageDescriptor::new("test.Status")
                .with_field(FieldDescriptor::singular("progress", Kind::Int64))
                .with_field(FieldDescriptor::singular("note", Kind::String)),
        );
        Arc::new(
            MessageDescriptor::new("test.Echo")
                .with_field(FieldDescriptor::singular("id", Kind::String))
                .with_field(FieldDescriptor::singular("num", Kind::Int64))
                .with_field(FieldDescriptor::singular("lang", Kind::String))
                .with_field(FieldDescriptor::message("status", status))
                .with_field(FieldDescriptor::repeated("tags", Kind::String)),
        )
    });

    #[derive(Debug)]
    struct Echo(DynamicMessage);

    impl Default for Echo {
        fn default() -> Self {
            Echo(DynamicMessage::new(ECHO.clone()))
        }
    }

    impl ReflectMessage for Echo {
        fn descriptor(&self) -> &MessageDescriptor {
            self.0.descriptor()
        }

        fn get_field(&self, name: &str) -> Option<FieldValue<'_>> {
            self.0.get_field(name)
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<(), FieldError> {
            self.0.set_field(name, value)
        }

        fn new_nested_instance(
            &mut self,
            name: &str,
        ) -> Result<&mut dyn ReflectMessage, FieldError> {
            self.0.new_nested_instance(name)
        }

        fn nested_mut(&mut self, name: &str) -> Option<&mut dyn ReflectMessage> {
            self.0.nested_mut(name)
        }

        fn resize_repeated(&mut self, name: &str, len: usize) -> Result<(), FieldError> {
            self.0.resize_repeated(name, len)
        }

        fn set_repeated(
            &mut self,
            name: &str,
            index: usize,
            value: Value,
        ) -> Result<(), FieldError> {
            self.0.set_repeated(name, index, value)
        }
    }

    async fn echo(QueryMessage(req): QueryMessage<Echo>) -> Json<DynamicMessage> {
        Json(req.0)
    }

    fn app(config: Option<QueryBindingConfig>) -> Router {
        let router = Router::new()
            .route("/v1/echo", get(echo))
            .route("/v1/echo/{id}", get(echo));
        match config {
            Some(config) => router.layer(QueryBindingLayer::new(config)),
            None => router,
        }
    }

    fn default_app() -> Router {
        app(Some(QueryBindingConfig::default()))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_binds_scalars_nested_and_repeated() {
        let (status, body) = call(
            default_app(),
            "/v1/echo?num=3&status.progress=5&status.note=ok&tags=a&tags=b",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "num": 3,
                "status": {"progress": 5, "note": "ok"},
                "tags": ["a", "b"],
            })
        );
    }

    #[tokio::test]
    async fn test_percent_decoding() {
        let (status, body) = call(
            default_app(),
            "/v1/echo?status.note=hello%20world&lang=en+GB",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"]["note"], "hello world");
        assert_eq!(body["lang"], "en GB");
    }

    #[tokio::test]
    async fn test_path_params_excluded() {
        let (status, body) = call(default_app(), "/v1/echo/abc?id=zzz&num=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("id").is_none());
        assert_eq!(body["num"], 1);
    }

    #[tokio::test]
    async fn test_path_params_bound_when_not_excluded() {
        let config = QueryBindingConfig::new().with_path_params_excluded(false);
        let (status, body) = call(app(Some(config)), "/v1/echo/abc?id=zzz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "zzz");
    }

    #[tokio::test]
    async fn test_reserved_prefixes_excluded() {
        let config = QueryBindingConfig::new().with_reserved("lang");
        let (status, body) = call(app(Some(config)), "/v1/echo?lang=fr&num=2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("lang").is_none());
        assert_eq!(body["num"], 2);
    }

    #[tokio::test]
    async fn test_unknown_fields_ignored() {
        let (status, body) = call(default_app(), "/v1/echo?unknown=1&status.missing=2").await;
        assert_eq!(status, StatusCode::OK);
        // Intermediate messages are allocated before the unknown leaf is seen
        assert_eq!(body, serde_json::json!({"status": {}}));
    }

    #[tokio::test]
    async fn test_conversion_error_rejected() {
        let (status, body) = call(default_app(), "/v1/echo?num=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_argument");
        assert!(body["message"].as_str().unwrap().contains("num"));
    }

    #[tokio::test]
    async fn test_structural_error_rejected() {
        let (status, body) = call(default_app(), "/v1/echo?num.value=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "non-aggregate type in the middle of path: num.value");
    }

    #[tokio::test]
    async fn test_undecodable_path_param_rejected() {
        let (status, body) = call(default_app(), "/v1/echo/%FF?id=zzz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_argument");
        assert!(body["message"].as_str().unwrap().starts_with("invalid path parameter"));
    }

    #[tokio::test]
    async fn test_undecodable_path_param_ignored_when_not_excluded() {
        let config = QueryBindingConfig::new().with_path_params_excluded(false);
        let (status, body) = call(app(Some(config)), "/v1/echo/%FF?id=zzz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "zzz");
    }

    #[tokio::test]
    async fn test_missing_layer_uses_default_config() {
        let (status, body) = call(app(None), "/v1/echo/abc?id=zzz&num=7").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("id").is_none());
        assert_eq!(body["num"], 7);
    }

    #[test]
    fn test_exclusion_filter_borrows_without_params() {
        let config = QueryBindingConfig::new().with_reserved("a");
        assert!(matches!(exclusion_filter(&config, None), Cow::Borrowed(_)));
    }

    #[test]
    fn test_query_values_grouped() {
        let uri: Uri = "/x?a=1&b=2&a=3".parse().unwrap();
        let values = query_values(&uri).unwrap();
        assert_eq!(values.get("a"), Some(&["1".to_string(), "3".to_string()][..]));
        assert_eq!(values.get("b"), Some(&["2".to_string()][..]));

        let uri: Uri = "/x".parse().unwrap();
        assert!(query_values(&uri).unwrap().is_empty());
    }
}
