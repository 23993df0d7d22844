use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header carrying the browsing session id
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Identifies one user's browsing session; pagination state is keyed by it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads a well-formed session id from request headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(SESSION_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(SessionId)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attaches a [`SessionId`] to every request and echoes it on the response
///
/// Clients that send no (or an unparseable) `x-session-id` are given a fresh
/// session; they keep it by sending the returned header back.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session_id = SessionId::from_headers(request.headers()).unwrap_or_default();
    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&session_id.to_string()) {
        response.headers_mut().insert(SESSION_ID_HEADER, value);
    }

    response
}

/// Request span tagged with the session id, for `TraceLayer`
pub fn make_span_with_session(request: &Request<Body>) -> tracing::Span {
    let session_id = request
        .extensions()
        .get::<SessionId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session_id = %session_id,
    )
}
