use std::time::Duration;

/// One forwarding rule: where a proxied call goes and how long it may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyRoute {
    /// Short name used in logs.
    pub name: &'static str,
    /// Path appended to the upstream base URL.
    pub upstream_path: &'static str,
    pub timeout: Duration,
    /// Returned to the caller as `{"error": ...}` when `timeout` elapses.
    pub timeout_message: &'static str,
}

impl ProxyRoute {
    /// `{base_url}{upstream_path}`. The base URL is expected without a trailing slash.
    pub fn destination(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.upstream_path)
    }
}

/// POST /api/extract — multipart resume upload, text extraction on the analyzer.
pub const EXTRACT: ProxyRoute = ProxyRoute {
    name: "extract",
    upstream_path: "/api/v1/analyzer/extract",
    timeout: Duration::from_millis(30_000),
    timeout_message: "Request timeout - file extraction is taking too long.",
};

/// POST /api/analyze — JSON analysis request.
pub const ANALYZE: ProxyRoute = ProxyRoute {
    name: "analyze",
    upstream_path: "/api/v1/analyzer/analyze",
    timeout: Duration::from_millis(60_000),
    timeout_message: "Request timeout - analysis is taking too long.",
};
