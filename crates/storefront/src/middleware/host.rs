//! Request hostname extraction.
//!
//! The hostname the shopper's browser navigated to, taken from
//! `X-Forwarded-Host` (set by the edge proxy) or else `Host`, or else the
//! URI authority for HTTP/2 requests. The value is normalized through
//! [`Hostname::parse`].

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use shopforge_core::Hostname;

const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";

/// Extractor for the request's normalized hostname.
///
/// Never rejects: a missing or malformed host yields `RequestHost(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHost(pub Option<Hostname>);

impl<S> FromRequestParts<S> for RequestHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header_host(&parts.headers)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_owned()));

        let host = raw.and_then(|raw| match Hostname::parse(&raw) {
            Ok(host) => Some(host),
            Err(e) => {
                tracing::debug!(host = %raw, error = %e, "Ignoring malformed request host");
                None
            }
        });

        Ok(Self(host))
    }
}

fn header_host(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get(FORWARDED_HOST_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Option<String> {
        let (mut parts, ()) = request.into_parts();
        let RequestHost(host) = RequestHost::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        host.map(|h| h.as_str().to_owned())
    }

    #[tokio::test]
    async fn test_host_header_is_normalized() {
        let request = Request::builder()
            .uri("/")
            .header("host", "MyShop.com:8080")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("myshop.com"));
    }

    #[tokio::test]
    async fn test_forwarded_host_wins() {
        let request = Request::builder()
            .uri("/")
            .header("host", "storefront.vercel.app")
            .header("x-forwarded-host", "myshop.com, proxy.internal")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("myshop.com"));
    }

    #[tokio::test]
    async fn test_uri_authority_fallback() {
        let request = Request::builder()
            .uri("https://myshop.com/")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("myshop.com"));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_host() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(extract(request).await, None);

        let request = Request::builder()
            .uri("/")
            .header("host", "bad host")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, None);
    }
}
