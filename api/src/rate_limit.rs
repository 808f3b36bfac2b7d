//! Per-client fixed-window rate limiting.
//!
//! Each [`RateLimiter`] counts requests per client key inside a fixed window.
//! The window opens on a client's first request and resets once it has elapsed.
//! Counters live in process memory and are not shared between instances.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
static RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Windows are swept once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

/// Limit, window and rejection body of one limiter.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
    pub message: &'static str,
    pub code: &'static str,
}

impl RateLimitPolicy {
    /// 100 requests per 15 minutes, applied to every route.
    pub fn global() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            message: "Too many requests from this IP, please try again later.",
            code: "RATE_LIMIT_EXCEEDED",
        }
    }

    /// 10 requests per 5 minutes, applied to `/api/users`.
    pub fn strict() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(5 * 60),
            message: "Rate limit exceeded for this endpoint",
            code: "STRICT_RATE_LIMIT_EXCEEDED",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Whole seconds until the client's window resets.
    pub reset_secs: u64,
}

pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Counts a request from `key` and reports whether it fits the window.
    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Decision {
        let window_len = self.policy.window;
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < window_len);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                hits: 0,
            };
        }
        window.hits = window.hits.saturating_add(1);

        let elapsed = now.duration_since(window.started);
        let reset = window_len.saturating_sub(elapsed);
        Decision {
            allowed: window.hits <= self.policy.max_requests,
            limit: self.policy.max_requests,
            remaining: self.policy.max_requests.saturating_sub(window.hits),
            reset_secs: reset.as_secs() + u64::from(reset.subsec_nanos() > 0),
        }
    }
}

/// Identifies the caller: the peer address, else the first `x-forwarded-for`
/// entry, else `"unknown"`.
pub fn client_key(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn set_headers(response: &mut Response, decision: &Decision) {
    let headers = response.headers_mut();
    headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
    headers.insert(
        RATELIMIT_REMAINING.clone(),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(RATELIMIT_RESET.clone(), HeaderValue::from(decision.reset_secs));
}

/// Middleware that rejects requests over the limiter's window with 429.
///
/// ```ignore
/// let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::global()));
/// let app = Router::new().layer(from_fn_with_state(limiter, enforce_rate_limit));
/// ```
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        let policy = limiter.policy();
        tracing::warn!(
            client = %key,
            code = policy.code,
            path = %req.uri().path(),
            "Rate limit exceeded"
        );
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": policy.message, "code": policy.code })),
        )
            .into_response()
    };

    set_headers(&mut response, &decision);
    response
}
