//! Version lookup handler
//!
//! `GET /version/{filename}` answers with the trimmed version record. A
//! missing or unreadable record is reported as `unknown` unless strict
//! lookups are configured, in which case it gets a real error status.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, ResponseResult};
use crate::store::{path, StoreError};
use hyper::StatusCode;

pub const UNKNOWN_VERSION: &str = "unknown";
pub const VERSION_NOT_FOUND: &str = "Version file not found.";

pub async fn serve_version(
    ctx: &RequestContext<'_>,
    raw_name: &str,
    state: &AppState,
) -> ResponseResult {
    let logger = &state.logger;
    let strict = state.config.http.strict_version_lookup;

    let name = match path::decode_param(raw_name) {
        Ok(name) => name,
        Err(e) => {
            logger.warn(&format!("Rejected version request: {e}"));
            return http::build_400_response();
        }
    };

    logger.info(&format!(
        "Requested version file: {}",
        state.store.display_path(&name).display()
    ));

    match state.store.read_version(&name).await {
        Ok(version) => {
            logger.info(&format!("Firmware version: {version}"));
            http::build_version_response(version, ctx.is_head)
        }
        Err(e @ StoreError::Forbidden(_)) => {
            logger.warn(&format!("Path traversal attempt blocked: {e}"));
            http::build_403_response()
        }
        Err(e) if e.is_not_found() => {
            logger.warn(&format!("Version file not found: {e}"));
            if strict {
                http::build_text_response(StatusCode::NOT_FOUND, VERSION_NOT_FOUND)
            } else {
                http::build_version_response(UNKNOWN_VERSION.to_string(), ctx.is_head)
            }
        }
        Err(e) => {
            logger.error(&format!("Error reading version file: {e}"));
            if strict {
                http::build_500_response()
            } else {
                http::build_version_response(UNKNOWN_VERSION.to_string(), ctx.is_head)
            }
        }
    }
}
