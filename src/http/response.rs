//! HTTP response building module
//!
//! Provides builders for the status codes the OTA routes produce, decoupled from handler logic.

use super::body::{self, ResponseBody};
use super::range::ByteRange;
use hyper::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Characters kept verbatim in an RFC 5987 `filename*` value
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Validator and presentation headers shared by full and partial file responses
#[derive(Debug, Clone)]
pub struct FileHeaders {
    pub content_type: &'static str,
    pub etag: String,
    pub last_modified: Option<String>,
    /// `Content-Disposition` value, set for download routes
    pub disposition: Option<String>,
}

/// Result of building a response; header values are validated by the builder
pub type ResponseResult = Result<Response<ResponseBody>, hyper::http::Error>;

/// Build plain-text response with the given status
pub fn build_text_response(status: StatusCode, text: &'static str) -> ResponseResult {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, text.len())
        .body(body::full(text))
}

/// Build 404 Not Found response
pub fn build_404_response() -> ResponseResult {
    build_text_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Build 403 Forbidden response
pub fn build_403_response() -> ResponseResult {
    build_text_response(StatusCode::FORBIDDEN, "Forbidden")
}

/// Build 400 Bad Request response
pub fn build_400_response() -> ResponseResult {
    build_text_response(StatusCode::BAD_REQUEST, "Bad Request")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> ResponseResult {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Bare 500 used when a response could not be built at all
pub fn fallback_500_response() -> Response<ResponseBody> {
    let mut response = Response::new(body::full("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// Build 200 text response whose body may be omitted for HEAD
pub fn build_version_response(version: String, is_head: bool) -> ResponseResult {
    let content_length = version.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(version)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, content_length)
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
}

/// Build redirect response with a specific status code
pub fn build_redirect_response_with_code(target: &str, code: StatusCode) -> ResponseResult {
    Response::builder()
        .status(code)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(body::full("Redirecting..."))
}

/// Build 304 Not Modified response
pub fn build_304_response(headers: &FileHeaders) -> ResponseResult {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, &headers.etag)
        .header(CACHE_CONTROL, "public, max-age=0");
    if let Some(ref last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(body::empty())
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> ResponseResult {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(body::full("Range Not Satisfiable"))
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: ResponseBody,
    headers: &FileHeaders,
    content_length: u64,
) -> ResponseResult {
    file_builder(headers)
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, content_length)
        .body(data)
}

/// Build 206 Partial Content response for `range` of a `total_size` byte file
pub fn build_partial_response(
    data: ResponseBody,
    headers: &FileHeaders,
    range: ByteRange,
    total_size: u64,
) -> ResponseResult {
    file_builder(headers)
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_LENGTH, range.byte_count())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .body(data)
}

fn file_builder(headers: &FileHeaders) -> hyper::http::response::Builder {
    let mut builder = Response::builder()
        .header(CONTENT_TYPE, headers.content_type)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, &headers.etag)
        .header(CACHE_CONTROL, "public, max-age=0");
    if let Some(ref last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }
    if let Some(ref disposition) = headers.disposition {
        builder = builder.header(CONTENT_DISPOSITION, disposition);
    }
    builder
}

/// `Content-Disposition` value prompting a download under `filename`
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
pub fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect();

    if filename.is_ascii() && fallback == filename {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            utf8_percent_encode(filename, ATTR_CHAR)
        )
    }
}
