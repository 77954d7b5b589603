//! Byte-range streaming of the configured media resource.
//!
//! The responder resolves the resource, parses any `Range` header, and
//! pipes bytes to the client incrementally — the file is never buffered in
//! memory, whatever its size. Authorization happens in the HTTP layer
//! before this module is reached, so a rejected token never touches the
//! filesystem.
//!
//! Cancellation: when a client disconnects mid-stream, axum drops the
//! response body, which drops the `ReaderStream` and closes the file
//! handle. No token-store lock is held anywhere on the streaming path.

mod range;

pub use range::{parse_range, ByteRange, RangeError};

use std::io::SeekFrom;

use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::config::check_media_file;
use crate::server::ApiError;

/// The single configured resource is always served as MP4.
pub const MEDIA_CONTENT_TYPE: &str = "video/mp4";

/// Serve the media file at `path`, honoring an optional `Range` header.
///
/// Responds 200 with the whole file when no range is given, 206 with the
/// requested span otherwise. Missing or non-regular files yield 404 with a
/// diagnostic; unsatisfiable ranges yield 416.
pub async fn stream_media(
    path: &str,
    range_header: Option<&str>,
) -> Result<Response<Body>, ApiError> {
    let path = check_media_file(path)
        .await
        .map_err(|details| ApiError::NotFound { details })?;

    let file = File::open(path).await?;
    let size = file.metadata().await?.len();

    match range_header {
        Some(header) => {
            let range = parse_range(header, size)
                .map_err(|RangeError::Unsatisfiable { size }| ApiError::RangeNotSatisfiable {
                    size,
                })?;
            partial_response(file, range, size).await
        }
        None => full_response(file, size),
    }
}

fn full_response(file: File, size: u64) -> Result<Response<Body>, ApiError> {
    let body = Body::from_stream(ReaderStream::new(file));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, MEDIA_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, size)
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn partial_response(
    mut file: File,
    range: ByteRange,
    size: u64,
) -> Result<Response<Body>, ApiError> {
    file.seek(SeekFrom::Start(range.start)).await?;
    let body = Body::from_stream(ReaderStream::new(file.take(range.content_length())));
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_RANGE, range.content_range(size))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, range.content_length())
        .header(header::CONTENT_TYPE, MEDIA_CONTENT_TYPE)
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
