//! Request handler module
//!
//! Routes OTA requests and serves firmware, version records and the static
//! update directory.

mod files;
pub mod firmware;
pub mod router;
pub mod updates;
pub mod version;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
