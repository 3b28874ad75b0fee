//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` (Vercel's edge sets `x-vercel-id`,
//! which is used when no `x-request-id` is present) or generates a UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const VERCEL_ID_HEADER: &str = "x-vercel-id";

/// Middleware that ensures every request has a unique request ID.
///
/// The ID is recorded on the current tracing span, tagged on the Sentry
/// scope, and echoed in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = [REQUEST_ID_HEADER, VERCEL_ID_HEADER]
        .iter()
        .find_map(|name| request.headers().get(*name))
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
