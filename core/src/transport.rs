//! Session-aware request execution.
//!
//! # Design
//! `Transport` is the only seam that touches the network: it turns an
//! `HttpRequest` into an `HttpResponse` and nothing else. Cookie precedence,
//! status classification, and session-cookie extraction live in
//! [`exchange`], so every transport (the blocking `ureq` one, or a fake in
//! tests) gets identical semantics.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::{Session, SESSION_COOKIE};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes one HTTP POST round-trip.
///
/// Implementations must return non-200 responses as data, not as `Err`;
/// `Err` is reserved for failures where no response was received.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent with a global timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are interpreted by `exchange`, so ureq must not turn
        // 4xx/5xx into errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // Drain the whole body before the response is dropped, on every path.
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Outcome of a successful exchange: the raw body plus the session token to
/// keep (the renewed one if the server sent a cookie, otherwise the token the
/// request went out with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub body: String,
    pub session_token: String,
}

/// Perform one request/response cycle with cookie handling.
///
/// The stored session is attached as `cb-session-id`; `override_cookie`, when
/// given, replaces the whole `Cookie` header. Non-200 responses become
/// `ApiError::HttpError` and are never decoded.
pub fn exchange<T: Transport + ?Sized>(
    transport: &T,
    mut request: HttpRequest,
    session: &Session,
    override_cookie: Option<&str>,
) -> Result<Exchange, ApiError> {
    if let Some(cookie) = session.cookie_header() {
        request.set_header("cookie", &cookie);
    }
    if let Some(cookie) = override_cookie {
        request.set_header("cookie", cookie);
    }

    let response = transport.execute(&request)?;
    debug!(url = %request.url, status = response.status, "graphql exchange");

    if response.status != 200 {
        warn!(status = response.status, "non-200 response from admin API");
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body,
        });
    }

    let session_token =
        session_cookie(&response).unwrap_or_else(|| session.token().to_string());
    Ok(Exchange {
        body: response.body,
        session_token,
    })
}

/// Value of the first `cb-session-id` cookie in the response's `Set-Cookie`
/// headers.
pub fn session_cookie(response: &HttpResponse) -> Option<String> {
    response.headers_named("set-cookie").find_map(|header| {
        let pair = header.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        (name.trim() == SESSION_COOKIE).then(|| value.trim().trim_matches('"').to_string())
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned responses and records every request it receives.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, response: HttpResponse) -> &Self {
            self.responses.borrow_mut().push_back(Ok(response));
            self
        }

        pub fn fail(&self, err: ApiError) -> &Self {
            self.responses.borrow_mut().push_back(Err(err));
            self
        }

        pub fn request(&self, index: usize) -> HttpRequest {
            self.requests.borrow()[index].clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no canned response".to_string())))
        }
    }

    pub fn with_cookie(body: &str, token: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![(
                "set-cookie".to_string(),
                format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"),
            )],
            body: body.to_string(),
        }
    }
}
