//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use ota_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("bin")), "application/octet-stream");
/// assert_eq!(get_content_type(Some("version")), "text/plain; charset=utf-8");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Version records and other text
        Some("version" | "txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("xml") => "application/xml",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",

        // Firmware images and packaging
        Some("hex" | "ihex") => "text/x-hex",
        Some("elf") => "application/x-elf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",

        // bin, uf2, img, and anything unknown
        _ => "application/octet-stream",
    }
}
