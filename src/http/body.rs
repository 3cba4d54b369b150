//! Response body types
//!
//! Small bodies are buffered, file bodies are streamed from disk in chunks.

use crate::logger::SharedLogger;
use futures::StreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream `len` bytes from the current position of `file`
///
/// Read errors are logged and end the body with an error, which aborts the
/// connection; whatever was already sent stays sent. Completion is logged
/// once the last byte has been handed to the connection.
pub fn file_stream(file: File, len: u64, path: PathBuf, logger: SharedLogger) -> ResponseBody {
    if len == 0 {
        logger.info(&format!("File sent successfully: {} (0 bytes)", path.display()));
        return empty();
    }

    let mut sent: u64 = 0;
    let stream = ReaderStream::new(file.take(len)).map(move |chunk| match chunk {
        Ok(bytes) => {
            sent += bytes.len() as u64;
            if sent >= len {
                logger.info(&format!(
                    "File sent successfully: {} ({sent} bytes)",
                    path.display()
                ));
            }
            Ok(Frame::data(bytes))
        }
        Err(e) => {
            logger.error(&format!(
                "Error sending file {} after {sent} bytes: {e}",
                path.display()
            ));
            Err(e)
        }
    });

    StreamBody::new(stream).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use crate::logger::MemoryLogger;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_full_body_collects() {
        let body = full("unknown");
        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"unknown");
    }

    #[tokio::test]
    async fn test_file_stream_respects_length_and_logs_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firmware.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let logger = Arc::new(MemoryLogger::new());
        let file = File::open(&path).await.unwrap();
        let body = file_stream(file, 4, path, logger.clone());
        let bytes = body.collect().await.unwrap().to_bytes();

        assert_eq!(&bytes[..], b"0123");
        assert!(logger.contains_at(LogLevel::Info, "File sent successfully"));
    }
}
