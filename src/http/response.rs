//! HTTP response building module
//!
//! Builders for the fixed-body responses. Streamed media responses are built by
//! the stream handler and only share the [`ResponseBody`] type.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, HeaderValue,
};
use hyper::{Response, StatusCode};
use std::io;

/// Body type shared by every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Wrap an in-memory payload as a [`ResponseBody`]
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Empty [`ResponseBody`]
pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build a plain-text response with the given status
pub fn build_text_response(status: StatusCode, message: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, message.len())
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(full_body(message))
        })
}

/// Build 404 Not Found response for unknown paths
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 404 response for a media file that cannot be opened
pub fn build_file_not_found_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "file not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut response =
        build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build 500 Internal Server Error response for the media route
pub fn build_500_response(allow_origin: &str) -> Response<ResponseBody> {
    let mut response =
        build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error");
    match HeaderValue::from_str(allow_origin) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid allow_origin '{allow_origin}': {e}"
        )),
    }
    response
}

/// Build OPTIONS response (CORS preflight request)
pub fn build_options_response(allow_origin: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin)
        .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(ACCESS_CONTROL_ALLOW_HEADERS, "Range")
        .header(ACCESS_CONTROL_MAX_AGE, "86400")
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty_body())
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64, allow_origin: &str) -> Response<ResponseBody> {
    const MESSAGE: &str = "Range Not Satisfiable";
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin)
        .body(full_body(MESSAGE))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(full_body(MESSAGE))
        })
}

/// Log response build error
pub(crate) fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
