//! Static browsing of the artifact directory
//!
//! `GET /updates/*` serves any file below the base directory by relative
//! path. Dotfiles stay hidden and directories resolve to an index file.

use crate::config::AppState;
use crate::handler::files;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, ResponseResult};
use crate::store::{path, Artifact, StoreError};
use hyper::StatusCode;

pub async fn serve_updates(
    ctx: &RequestContext<'_>,
    raw_rest: &str,
    state: &AppState,
) -> ResponseResult {
    let logger = &state.logger;

    let relative = match path::decode_param(raw_rest) {
        Ok(relative) => relative,
        Err(e) => {
            logger.warn(&format!("Rejected updates request: {e}"));
            return http::build_400_response();
        }
    };

    if path::has_hidden_segment(&relative) {
        logger.info(&format!("Ignoring dotfile request: {}", ctx.path));
        return http::build_404_response();
    }

    if relative.ends_with('/') {
        return serve_index(ctx, &relative, state).await;
    }

    // Only existing directories redirect; a missing base dir falls through to 404
    if state.store.is_dir(&relative).await {
        return redirect_to_slash(ctx);
    }

    match state.store.open(&relative).await {
        Ok(artifact) => serve(ctx, artifact, state).await,
        Err(e) => store_error_response(&e, state),
    }
}

/// 301 to the trailing-slash form, keeping the query string
fn redirect_to_slash(ctx: &RequestContext<'_>) -> ResponseResult {
    let target = match ctx.query {
        Some(query) => format!("{}/?{query}", ctx.path),
        None => format!("{}/", ctx.path),
    };
    http::build_redirect_response_with_code(&target, StatusCode::MOVED_PERMANENTLY)
}

/// Try the configured index files of a directory
async fn serve_index(ctx: &RequestContext<'_>, relative: &str, state: &AppState) -> ResponseResult {
    for index in &state.config.storage.index_files {
        let candidate = format!("{relative}{index}");
        match state.store.open(&candidate).await {
            Ok(artifact) => return serve(ctx, artifact, state).await,
            Err(e) if e.is_not_found() => {}
            Err(e) => return store_error_response(&e, state),
        }
    }

    state
        .logger
        .info(&format!("No index file in directory: {}", ctx.path));
    http::build_404_response()
}

async fn serve(ctx: &RequestContext<'_>, artifact: Artifact, state: &AppState) -> ResponseResult {
    state
        .logger
        .info(&format!("Serving static file: {}", artifact.path.display()));
    let content_type =
        mime::get_content_type(artifact.path.extension().and_then(|e| e.to_str()));
    files::serve_artifact(ctx, artifact, content_type, None, &state.logger).await
}

fn store_error_response(err: &StoreError, state: &AppState) -> ResponseResult {
    match err {
        StoreError::Forbidden(_) => {
            state
                .logger
                .warn(&format!("Path traversal attempt blocked: {err}"));
            http::build_403_response()
        }
        StoreError::InvalidEncoding(_) => http::build_400_response(),
        e if e.is_not_found() => {
            state.logger.info(&format!("Static file not found: {e}"));
            http::build_404_response()
        }
        e => {
            state.logger.error(&format!("Error opening static file: {e}"));
            http::build_500_response()
        }
    }
}
