use std::time::Duration;

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Body returned when the upstream fails with a body that is not JSON.
pub const BACKEND_FAILED_MESSAGE: &str = "Backend request failed";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failure classes of a proxied call.
/// Implements `IntoResponse` so Axum handlers can return `Result<Json<Value>, GatewayError>`.
///
/// Callers pick their retry strategy from the status code, so the upstream failure
/// classes never share one: 504 is safe to retry, an upstream 4xx is not, 500 is ambiguous.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream answered with a non-2xx status.
    /// `body` is `None` when the upstream body was empty or not JSON.
    #[error("Upstream rejected request with status {status}")]
    UpstreamRejection {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("Upstream did not respond within {}ms", .timeout.as_millis())]
    UpstreamTimeout {
        timeout: Duration,
        message: &'static str,
    },

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The inbound body could not be read (over the upload limit, client hung up).
    /// Raised before any upstream call.
    #[error("Request body rejected: {message}")]
    RequestBody { status: StatusCode, message: String },
}

impl From<BytesRejection> for GatewayError {
    fn from(rejection: BytesRejection) -> Self {
        GatewayError::RequestBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamRejection { status, .. } => *status,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::TransportFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RequestBody { status, .. } => *status,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            GatewayError::UpstreamRejection { body, .. } => {
                tracing::warn!("Upstream rejected request: {status}");
                body.unwrap_or_else(|| json!({ "error": BACKEND_FAILED_MESSAGE }))
            }
            GatewayError::UpstreamTimeout { timeout, message } => {
                tracing::warn!("Upstream timed out after {}ms", timeout.as_millis());
                json!({ "error": message })
            }
            GatewayError::TransportFailure(details) => {
                tracing::error!("Upstream transport failure: {details}");
                json!({
                    "error": INTERNAL_ERROR_MESSAGE,
                    "details": details
                })
            }
            GatewayError::RequestBody { message, .. } => {
                tracing::warn!("Rejected request body ({status}): {message}");
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
