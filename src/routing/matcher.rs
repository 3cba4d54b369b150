//! Route matching module
//!
//! Maps request paths onto the three OTA routes. Parameters are returned raw
//! (still percent-encoded); decoding happens in the handlers.

use hyper::Method;

pub const FIRMWARE_PREFIX: &str = "/firmware/";
pub const VERSION_PREFIX: &str = "/version/";
pub const UPDATES_MOUNT: &str = "/updates";

/// Matched route with its raw path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /firmware/{filename}`
    Firmware(&'a str),
    /// `GET /version/{filename}`
    Version(&'a str),
    /// `GET /updates/*`, relative path below the mount (may be empty)
    Updates(&'a str),
}

/// Find the route for a method and path; `None` falls through to 404
///
/// `HEAD` is routed like `GET`.
pub fn match_route<'a>(method: &Method, path: &'a str) -> Option<Route<'a>> {
    if method != Method::GET && method != Method::HEAD {
        return None;
    }

    if let Some(name) = match_single_segment(path, FIRMWARE_PREFIX) {
        return Some(Route::Firmware(name));
    }

    if let Some(name) = match_single_segment(path, VERSION_PREFIX) {
        return Some(Route::Version(name));
    }

    match_mount(path, UPDATES_MOUNT).map(Route::Updates)
}

/// `/prefix/{name}` where `name` is one non-empty segment
fn match_single_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let name = path.strip_prefix(prefix)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

/// `/mount` or `/mount/...`, returning everything after the mount
fn match_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
