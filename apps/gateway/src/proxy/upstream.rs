//! Outbound side of the gateway.
//!
//! The gateway never talks to `reqwest` directly; it holds an `Arc<dyn Upstream>`
//! built once in `main`. Tests swap in scripted implementations.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client gave up waiting on its own.
    #[error("upstream request timed out")]
    TimedOut,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Failure detected by the gateway itself rather than the HTTP client,
    /// such as an oversized response. Non-`reqwest` upstreams report through it too.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::TimedOut
        } else {
            TransportError::Http(err)
        }
    }
}

/// The inbound body exactly as received, plus its content type.
/// Multipart boundaries live in the content type, so the two travel together.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Payload {
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Self {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self { content_type, body }
    }
}

/// A fully buffered upstream response. Nothing is streamed back to the caller
/// before the response is classified.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Sends one POST to `url`. Dropping the returned future aborts the call.
    async fn post(&self, url: &str, payload: Payload) -> Result<UpstreamResponse, TransportError>;
}

/// Production upstream backed by a shared `reqwest` connection pool.
#[derive(Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
    max_response_bytes: usize,
}

impl ReqwestUpstream {
    /// No overall request timeout is set here; each route enforces its own deadline.
    pub fn new(connect_timeout: Duration, max_response_bytes: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self::with_client(client, max_response_bytes))
    }

    pub fn with_client(client: reqwest::Client, max_response_bytes: usize) -> Self {
        Self {
            client,
            max_response_bytes,
        }
    }

    fn too_large(&self) -> TransportError {
        TransportError::Other(format!(
            "upstream response exceeded {} bytes",
            self.max_response_bytes
        ))
    }

    /// Buffers the whole body, refusing anything past `max_response_bytes`.
    async fn read_body(&self, mut response: reqwest::Response) -> Result<Bytes, TransportError> {
        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_bytes as u64)
        {
            return Err(self.too_large());
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn post(&self, url: &str, payload: Payload) -> Result<UpstreamResponse, TransportError> {
        let mut request = self.client.post(url).body(payload.body);
        if let Some(content_type) = payload.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await?;

        debug!("Upstream {url} answered {status} ({} bytes)", body.len());

        Ok(UpstreamResponse { status, body })
    }
}
