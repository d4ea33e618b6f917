//! Axum route handlers for the proxied analyzer endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;

use crate::errors::GatewayError;
use crate::proxy::route::{ProxyRoute, ANALYZE, EXTRACT};
use crate::proxy::upstream::Payload;
use crate::state::AppState;

async fn proxy(
    state: &AppState,
    route: &ProxyRoute,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, GatewayError> {
    // Body rejections still go out in the JSON envelope
    let payload = Payload::from_parts(headers, body?);
    state.gateway.forward(route, payload).await.map(Json)
}

/// POST /api/extract
///
/// Forwards a multipart resume upload to the analyzer's extraction endpoint.
pub async fn handle_extract(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, GatewayError> {
    proxy(&state, &EXTRACT, &headers, body).await
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, GatewayError> {
    proxy(&state, &ANALYZE, &headers, body).await
}
