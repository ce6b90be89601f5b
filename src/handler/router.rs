//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, dispatching and the access log.

use crate::config::AppState;
use crate::handler::stream;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry, PendingAccessLog};
use hyper::body::Body;
use hyper::header::{HeaderName, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let logging = &state.config.logging;
    let mut access = logging
        .access_log
        .then(|| PendingAccessLog::new(access_entry(&req, peer_addr), &logging.access_log_format));

    // Extract what routing needs, the request itself is not used past this point
    let ctx = RequestContext {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
        range_header: header_string(&req, &RANGE),
    };
    drop(req);

    let response = route_request(&ctx, &state, &mut access).await;

    // Streamed bodies write their own entry when they finish
    if let Some(access) = access {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        access.finish(response.status().as_u16(), body_bytes);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, allow_origin: &str) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(allow_origin)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path, then method
///
/// Only the stream route answers OPTIONS or 405; every other path is 404.
async fn route_request(
    ctx: &RequestContext,
    state: &AppState,
    access: &mut Option<PendingAccessLog>,
) -> Response<ResponseBody> {
    if ctx.path != state.config.stream.route {
        return http::build_404_response();
    }

    match check_http_method(&ctx.method, &state.config.http.allow_origin) {
        Some(response) => response,
        None => stream::serve_stream(ctx, state, access).await,
    }
}

fn header_string<B>(req: &Request<B>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_string(req, &REFERER);
    entry.user_agent = header_string(req, &USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW};
    use hyper::StatusCode;

    fn state_for(file: &str) -> Arc<AppState> {
        let mut cfg = Config::load_from("tests/no-such-config-file").expect("defaults load");
        cfg.stream.file = file.to_string();
        Arc::new(AppState::new(&cfg))
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Empty::new())
            .expect("valid request")
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().expect("valid addr")
    }

    #[tokio::test]
    async fn test_serves_configured_route() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.flv");
        std::fs::write(&path, b"FLV\x01 payload").expect("write fixture");
        let state = state_for(path.to_str().expect("utf-8 path"));

        let response = handle_request(request(Method::GET, "/live.flv?x=1"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(&body[..], b"FLV\x01 payload");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = state_for("does/not/matter.flv");
        let response = handle_request(request(Method::GET, "/other.flv"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let state = state_for("does/not/matter.flv");
        let response = handle_request(request(Method::OPTIONS, "/live.flv"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_options_on_other_path_is_404() {
        let state = state_for("does/not/matter.flv");
        let response = handle_request(request(Method::OPTIONS, "/nothing"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_post_to_other_path_is_404() {
        let state = state_for("does/not/matter.flv");
        let response = handle_request(request(Method::POST, "/upload"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let state = state_for("does/not/matter.flv");
        let response = handle_request(request(Method::POST, "/live.flv"), state, peer())
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/live.flv?token=abc")
            .header(USER_AGENT, "VLC/3.0.20")
            .body(())
            .expect("valid request");
        let entry = access_entry(&req, peer());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/live.flv");
        assert_eq!(entry.query.as_deref(), Some("token=abc"));
        assert_eq!(entry.http_version, "1.1");
        assert_eq!(entry.user_agent.as_deref(), Some("VLC/3.0.20"));
        assert_eq!(entry.referer, None);
    }
}
