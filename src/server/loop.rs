// Server loop module
// Accepts connections until shutdown is signalled, then drains active ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop for the OTA server
///
/// Must run inside a `LocalSet`; connections are spawned with `spawn_local`.
/// Accept errors are logged and never end the loop.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        state.logger.error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(
        state.logger.as_ref(),
        active_connections.load(Ordering::SeqCst),
    );

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_secs);
    let drained = drain_connections(&active_connections, grace).await;
    if drained {
        state.logger.info("[Shutdown] All connections closed");
    } else {
        state.logger.warn(&format!(
            "[Shutdown] Grace period of {}s elapsed with {} connection(s) still open",
            grace.as_secs(),
            active_connections.load(Ordering::SeqCst)
        ));
    }

    Ok(())
}

/// Wait until the counter reaches zero or the grace period elapses
async fn drain_connections(active: &AtomicUsize, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;
    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_with_no_connections() {
        let active = AtomicUsize::new(0);
        assert!(drain_connections(&active, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_drain_times_out() {
        let active = AtomicUsize::new(2);
        assert!(!drain_connections(&active, Duration::from_millis(120)).await);
    }
}
