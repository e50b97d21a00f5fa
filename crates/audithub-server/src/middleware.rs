use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS,
};
use axum::http::header::ALLOW;
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;

use crate::error::ApiError;

/// Answer every preflight with 200 and allow any origin on every response.
pub(crate) async fn cors(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::OK.into_response();
        let headers = resp.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        return resp;
    }

    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("ETag"));
    resp
}

/// Strip trailing slashes so `/api/audits/` routes like `/api/audits`.
pub(crate) async fn trim_trailing_slash(mut req: Request, next: Next) -> Response {
    if let Some(uri) = trimmed_uri(req.uri()) {
        *req.uri_mut() = uri;
    }
    next.run(req).await
}

fn trimmed_uri(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    if trimmed == path {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{trimmed}?{query}"),
        None => trimmed.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

/// Give 405 responses the same `{"error": ...}` body as every other error.
pub(crate) async fn json_method_not_allowed(req: Request, next: Next) -> Response {
    let resp = next.run(req).await;
    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return resp;
    }

    let allow = resp.headers().get(ALLOW).cloned();
    let mut json =
        ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(ALLOW, allow);
    }
    json
}

/// Log each request once it completes; failures at `warn`, the rest at `debug`.
pub(crate) async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let resp = next.run(req).await;

    let status = resp.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if resp.status().is_client_error() || resp.status().is_server_error() {
        tracing::warn!(%method, path = %path, status, elapsed_ms, "request failed");
    } else {
        tracing::debug!(%method, path = %path, status, elapsed_ms, "request served");
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trim(uri: &str) -> Option<String> {
        trimmed_uri(&uri.parse().unwrap()).map(|uri| uri.to_string())
    }

    #[test]
    fn test_trimmed_uri() {
        assert_eq!(trim("/api/audits/"), Some("/api/audits".to_string()));
        assert_eq!(
            trim("/api/audits/login/results//?x=1"),
            Some("/api/audits/login/results?x=1".to_string())
        );
        assert_eq!(trim("/index.html/"), Some("/index.html".to_string()));
        assert_eq!(trim("/"), None);
        assert_eq!(trim("/api/audits"), None);
    }
}
