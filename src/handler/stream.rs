//! Media stream handler
//!
//! Opens the configured media file for every request, sets the media headers,
//! honors an open-ended `Range` request and hands the open file to the
//! response body.

use std::io::SeekFrom;

use hyper::header::{
    ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_RANGE, CONTENT_TYPE,
};
use hyper::{Method, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

use super::body::FileStream;
use super::router::RequestContext;
use crate::config::AppState;
use crate::error::StreamError;
use crate::http::{self, RangeParseResult, ResponseBody};
use crate::logger::{self, PendingAccessLog};

/// Serve the media file
///
/// When the body is streamed, `access` is moved into it and written once the
/// body finishes; otherwise it is left for the caller.
pub async fn serve_stream(
    ctx: &RequestContext,
    state: &AppState,
    access: &mut Option<PendingAccessLog>,
) -> Response<ResponseBody> {
    match open_stream(ctx, state, access).await {
        Ok(response) => response,
        Err(err) if err.is_not_found() => {
            logger::log_warning(&err.to_string());
            http::build_file_not_found_response()
        }
        Err(err) => {
            logger::log_error(&err.to_string());
            http::build_500_response(&state.config.http.allow_origin)
        }
    }
}

async fn open_stream(
    ctx: &RequestContext,
    state: &AppState,
    access: &mut Option<PendingAccessLog>,
) -> Result<Response<ResponseBody>, StreamError> {
    let path = &state.media_path;
    let mut file = File::open(path).await.map_err(|source| StreamError::Open {
        path: path.clone(),
        source,
    })?;

    let file_size = match file.metadata().await {
        Ok(metadata) => Some(metadata.len()),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read metadata of '{}', size unknown: {e}",
                path.display()
            ));
            None
        }
    };

    let http_config = &state.config.http;
    let mut builder = Response::builder()
        .header(CONTENT_TYPE, state.content_type.as_str())
        .header(ACCEPT_RANGES, "bytes")
        .header(CACHE_CONTROL, http_config.cache_control.as_str())
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, http_config.allow_origin.as_str());

    let mut status = StatusCode::OK;
    let mut start = 0;

    match (ctx.range_header.as_deref(), file_size) {
        (None, _) => {}
        (Some(range_header), None) => {
            logger::log_warning(&format!(
                "Ignoring Range '{range_header}': media file size unknown"
            ));
        }
        (Some(range_header), Some(size)) => {
            match http::parse_range_header(Some(range_header), size) {
                RangeParseResult::Valid(range) => {
                    file.seek(SeekFrom::Start(range.start))
                        .await
                        .map_err(|source| StreamError::Seek {
                            offset: range.start,
                            source,
                        })?;
                    builder = builder.header(CONTENT_RANGE, range.content_range(size));
                    status = StatusCode::PARTIAL_CONTENT;
                    start = range.start;
                }
                RangeParseResult::NotSatisfiable => {
                    return Ok(http::build_416_response(size, &http_config.allow_origin));
                }
                RangeParseResult::None => logger::log_range_ignored(range_header),
            }
        }
    }

    logger::log_stream_opened(path, file_size, start);

    // No Content-Length: the body runs to whatever end of file is at read time
    let body = if ctx.method == Method::HEAD {
        http::empty_body()
    } else {
        FileStream::new(file, state.config.stream.chunk_size, status, access.take()).into_body()
    };

    Ok(builder.status(status).body(body).unwrap_or_else(|e| {
        http::response::log_build_error(status.as_str(), &e);
        http::build_500_response(&http_config.allow_origin)
    }))
}
