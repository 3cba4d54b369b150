//! OTA firmware distribution server
//!
//! Serves firmware images and their version records from a single base
//! directory over HTTP:
//! - `GET /firmware/{filename}` streams a firmware image as an attachment
//! - `GET /version/{filename}` returns the trimmed contents of a version file
//! - `GET /updates/*` exposes the directory as static files

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
