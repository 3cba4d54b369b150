//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: request logging, route matching and dispatching.

use crate::config::AppState;
use crate::handler::{firmware, updates, version};
use crate::http::{self, ResponseBody, ResponseResult};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Route};
use hyper::header::{
    HeaderName, HeaderValue, CONTENT_LENGTH, IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE, SERVER,
};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: req.method().clone(),
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
            range_header: header(RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();

    // 1. Request line, before any routing
    logger::log_request(state.logger.as_ref(), req.method(), req.uri());

    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(remote_addr, &req));

    // 2. Route and dispatch
    let ctx = RequestContext::from_request(&req);
    let mut response = match route_request(&ctx, &state).await {
        Ok(response) => response,
        Err(e) => {
            state.logger.error(&format!(
                "Failed to build response for {} {}: {e}",
                ctx.method, ctx.path
            ));
            http::fallback_500_response()
        }
    };

    // 3. Common response headers
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    // 4. Access log
    if let Some(mut entry) = access_entry {
        let body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.complete(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(
            state.logger.as_ref(),
            &entry,
            &state.config.logging.access_log_format,
        );
    }

    Ok(response)
}

/// Route request to the matching OTA handler
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> ResponseResult {
    match routing::match_route(&ctx.method, ctx.path) {
        Some(Route::Firmware(name)) => firmware::serve_firmware(ctx, name, state).await,
        Some(Route::Version(name)) => version::serve_version(ctx, name, state).await,
        Some(Route::Updates(rest)) => updates::serve_updates(ctx, rest, state).await,
        None => {
            state
                .logger
                .warn(&format!("No route for {} {}", ctx.method, ctx.path));
            http::build_404_response()
        }
    }
}
