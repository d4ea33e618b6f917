use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::GatewayError;
use crate::proxy::route::ProxyRoute;
use crate::proxy::upstream::{Payload, TransportError, Upstream, UpstreamResponse};

/// Forwards inbound payloads to the upstream and classifies what comes back.
///
/// Stateless per call: every `forward` runs its own
/// `Forwarding -> {Completed | TimedOut | Failed}` sequence, so one instance is
/// shared by all requests without locking.
#[derive(Clone)]
pub struct Gateway {
    upstream: Arc<dyn Upstream>,
    base_url: String,
}

impl Gateway {
    pub fn new(upstream: Arc<dyn Upstream>, base_url: impl Into<String>) -> Self {
        Self {
            upstream,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes exactly one upstream call for `route`, bounded by `route.timeout`.
    ///
    /// When the deadline wins the race the call future is dropped, which aborts
    /// the request. The timer itself is dropped on every path.
    #[instrument(skip(self, route, payload), fields(route = route.name))]
    pub async fn forward(
        &self,
        route: &ProxyRoute,
        payload: Payload,
    ) -> Result<Value, GatewayError> {
        let url = route.destination(&self.base_url);
        let started = Instant::now();

        let call = self.upstream.post(&url, payload);

        let outcome = match tokio::time::timeout(route.timeout, call).await {
            Ok(Ok(response)) => classify(response),
            Ok(Err(TransportError::TimedOut)) | Err(_) => Err(GatewayError::UpstreamTimeout {
                timeout: route.timeout,
                message: route.timeout_message,
            }),
            Ok(Err(e)) => Err(GatewayError::TransportFailure(e.to_string())),
        };

        let elapsed_ms = started.elapsed().as_millis();
        match &outcome {
            Ok(_) => info!("Forwarded to {url} in {elapsed_ms}ms"),
            Err(e) => info!("Forward to {url} ended with {} after {elapsed_ms}ms", e.status()),
        }

        outcome
    }
}

/// Maps a buffered upstream response onto the caller-facing outcome.
///
/// Non-2xx bodies are passed through when they parse as JSON and replaced by the
/// generic message otherwise (HTML error pages included). A 2xx body that is not
/// JSON is a transport failure.
pub fn classify(response: UpstreamResponse) -> Result<Value, GatewayError> {
    let status = StatusCode::from_u16(response.status).map_err(|e| {
        GatewayError::TransportFailure(format!("invalid upstream status {}: {e}", response.status))
    })?;

    if !status.is_success() {
        let body = serde_json::from_slice::<Value>(&response.body).ok();
        return Err(GatewayError::UpstreamRejection { status, body });
    }

    serde_json::from_slice(&response.body).map_err(|e| {
        GatewayError::TransportFailure(format!("upstream returned invalid JSON: {e}"))
    })
}
