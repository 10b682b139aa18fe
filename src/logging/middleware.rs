//! Request ID middleware

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Correlation header set on every request and echoed on the response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use engine_twin::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert_eq!(request_id.len(), 36);
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reuse the caller's `x-request-id` or mint one, and run the request in a
/// span carrying it.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    let id = req
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let value = HeaderValue::from_str(&id).ok();
    if let Some(ref v) = value {
        req.headers_mut().insert(header.clone(), v.clone());
    }

    let span = tracing::info_span!("request", request_id = %id, path = %req.uri().path());
    let mut response = next.run(req).instrument(span).await;

    if let Some(v) = value {
        response.headers_mut().insert(header, v);
    }
    response
}
