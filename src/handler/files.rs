//! File response module
//!
//! Turns an opened artifact into a full, partial, or not-modified response,
//! streaming the body from disk.

use crate::handler::router::RequestContext;
use crate::http::{self, body, cache, FileHeaders, ResponseResult, ResumeRange};
use crate::logger::SharedLogger;
use crate::store::Artifact;
use std::io::SeekFrom;
use tokio::io::AsyncSeekExt;

/// Serve an opened artifact honoring conditional, Range and HEAD semantics
pub async fn serve_artifact(
    ctx: &RequestContext<'_>,
    artifact: Artifact,
    content_type: &'static str,
    disposition: Option<String>,
    logger: &SharedLogger,
) -> ResponseResult {
    let Artifact {
        path,
        mut file,
        len,
        modified,
    } = artifact;

    let headers = FileHeaders {
        content_type,
        etag: cache::generate_etag(len, modified),
        last_modified: modified.map(cache::format_http_date),
        disposition,
    };

    // If-None-Match takes precedence over If-Modified-Since
    let not_modified = if ctx.if_none_match.is_some() {
        cache::check_etag_match(ctx.if_none_match.as_deref(), &headers.etag)
    } else {
        cache::not_modified_since(ctx.if_modified_since.as_deref(), modified)
    };
    if not_modified {
        return http::build_304_response(&headers);
    }

    match http::parse_range(ctx.range_header.as_deref(), len) {
        ResumeRange::Partial(range) => {
            let data = if ctx.is_head {
                body::empty()
            } else {
                if let Err(e) = file.seek(SeekFrom::Start(range.start)).await {
                    logger.error(&format!(
                        "Failed to seek to byte {} in {}: {e}",
                        range.start,
                        path.display()
                    ));
                    return http::build_500_response();
                }
                body::file_stream(file, range.byte_count(), path, logger.clone())
            };

            http::response::build_partial_response(data, &headers, range, len)
        }
        ResumeRange::Unsatisfiable => http::build_416_response(len),
        ResumeRange::Full => {
            let data = if ctx.is_head {
                body::empty()
            } else {
                body::file_stream(file, len, path, logger.clone())
            };
            http::response::build_file_response(data, &headers, len)
        }
    }
}
