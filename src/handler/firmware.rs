//! Firmware download handler
//!
//! `GET /firmware/{filename}` streams the named artifact as an attachment.

use crate::config::AppState;
use crate::handler::files;
use crate::handler::router::RequestContext;
use crate::http::{self, response::attachment_disposition, ResponseResult};
use crate::store::{path, StoreError};
use hyper::StatusCode;

pub const FIRMWARE_CONTENT_TYPE: &str = "application/octet-stream";
pub const FIRMWARE_NOT_FOUND: &str = "Firmware file not found.";

pub async fn serve_firmware(
    ctx: &RequestContext<'_>,
    raw_name: &str,
    state: &AppState,
) -> ResponseResult {
    let logger = &state.logger;

    let name = match path::decode_param(raw_name) {
        Ok(name) => name,
        Err(e) => {
            logger.warn(&format!("Rejected firmware request: {e}"));
            return http::build_400_response();
        }
    };

    logger.info(&format!(
        "Requested firmware file: {}",
        state.store.display_path(&name).display()
    ));

    match state.store.open(&name).await {
        Ok(artifact) => {
            logger.info(&format!(
                "Serving firmware file: {}",
                artifact.path.display()
            ));
            let filename = artifact
                .path
                .file_name()
                .map_or_else(|| name.clone(), |f| f.to_string_lossy().into_owned());
            files::serve_artifact(
                ctx,
                artifact,
                FIRMWARE_CONTENT_TYPE,
                Some(attachment_disposition(&filename)),
                logger,
            )
            .await
        }
        Err(e @ StoreError::Forbidden(_)) => {
            logger.warn(&format!("Path traversal attempt blocked: {e}"));
            http::build_403_response()
        }
        Err(e) if e.is_not_found() => {
            logger.warn(&format!("Firmware file not found: {e}"));
            http::build_text_response(StatusCode::NOT_FOUND, FIRMWARE_NOT_FOUND)
        }
        Err(e) => {
            logger.error(&format!("Error opening firmware file: {e}"));
            http::build_500_response()
        }
    }
}
