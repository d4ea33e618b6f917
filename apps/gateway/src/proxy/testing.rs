//! Test doubles shared by the gateway, handler and router tests.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;

use crate::proxy::upstream::{Payload, TransportError, Upstream, UpstreamResponse};

enum Behavior {
    Respond { status: u16, body: Bytes },
    Delay { delay: Duration, status: u16, body: Bytes },
    Hang,
    TimeOut,
    Fail(String),
}

/// Scripted upstream that records every call it receives.
pub struct MockUpstream {
    behavior: Behavior,
    pub calls: AtomicUsize,
    /// Set when a hanging call is dropped before completing.
    pub aborted: AtomicBool,
    last_url: Mutex<Option<String>>,
    last_payload: Mutex<Option<Payload>>,
}

impl MockUpstream {
    fn with(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            aborted: AtomicBool::new(false),
            last_url: Mutex::new(None),
            last_payload: Mutex::new(None),
        })
    }

    pub fn responding(status: u16, body: &str) -> Arc<Self> {
        Self::with(Behavior::Respond {
            status,
            body: Bytes::copy_from_slice(body.as_bytes()),
        })
    }

    pub fn delayed(delay: Duration, status: u16, body: &str) -> Arc<Self> {
        Self::with(Behavior::Delay {
            delay,
            status,
            body: Bytes::copy_from_slice(body.as_bytes()),
        })
    }

    pub fn hanging() -> Arc<Self> {
        Self::with(Behavior::Hang)
    }

    pub fn timing_out() -> Arc<Self> {
        Self::with(Behavior::TimeOut)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }

    pub fn last_payload(&self) -> Option<Payload> {
        self.last_payload.lock().unwrap().clone()
    }
}

struct AbortFlag<'a>(&'a AtomicBool);

impl Drop for AbortFlag<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn post(&self, url: &str, payload: Payload) -> Result<UpstreamResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());
        *self.last_payload.lock().unwrap() = Some(payload);

        match &self.behavior {
            Behavior::Respond { status, body } => Ok(UpstreamResponse {
                status: *status,
                body: body.clone(),
            }),
            Behavior::Delay {
                delay,
                status,
                body,
            } => {
                tokio::time::sleep(*delay).await;
                Ok(UpstreamResponse {
                    status: *status,
                    body: body.clone(),
                })
            }
            Behavior::Hang => {
                let _flag = AbortFlag(&self.aborted);
                let never: Infallible = std::future::pending().await;
                match never {}
            }
            Behavior::TimeOut => Err(TransportError::TimedOut),
            Behavior::Fail(message) => Err(TransportError::Other(message.clone())),
        }
    }
}

/// Serves `app` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
