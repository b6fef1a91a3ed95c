//! Rejection returned when query parameters cannot be bound.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gateway_query_core::BindError;
use serde::Serialize;

/// Connect error code sent with every rejection.
const INVALID_ARGUMENT: &str = "invalid_argument";

/// Rejection used by [`QueryMessage`](crate::QueryMessage).
///
/// Responds with HTTP 400 and a Connect error body:
///
/// ```json
/// {"code": "invalid_argument", "message": "no value of field: id"}
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BindRejection {
    /// The query string could not be decoded.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A path-template variable could not be decoded, so it cannot be
    /// excluded from binding.
    #[error("invalid path parameter: {0}")]
    InvalidPath(String),

    /// A query parameter could not be bound into the message.
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl BindRejection {
    /// Get the dot-path of the failing parameter, if the query decoded.
    pub fn path(&self) -> Option<&str> {
        match self {
            BindRejection::InvalidQuery(_) | BindRejection::InvalidPath(_) => None,
            BindRejection::Bind(err) => Some(err.path()),
        }
    }
}

/// JSON body of a rejection.
#[derive(Serialize)]
struct ErrorResponseBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        tracing::debug!(
            target: "gateway_query",
            path = self.path(),
            error = %self,
            "rejecting request"
        );
        let body = ErrorResponseBody {
            code: INVALID_ARGUMENT,
            message: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
