//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the OTA routes.

pub mod body;
pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use range::{parse_range, ByteRange, ResumeRange};
pub use response::{
    build_304_response, build_400_response, build_403_response, build_404_response,
    build_416_response, build_500_response, build_redirect_response_with_code,
    build_text_response, build_version_response, fallback_500_response, FileHeaders,
    ResponseResult,
};
