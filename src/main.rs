use std::sync::Arc;

use ota_server::config::{AppState, Config};
use ota_server::logger::{self, LogWriter, SharedLogger};
use ota_server::server::{self, SignalHandler};

const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    // Single-threaded event loop; every connection runs on the LocalSet
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let logger: SharedLogger = Arc::new(LogWriter::from_config(&cfg.logging)?);

    let addr = cfg.socket_addr()?;
    let listener = match server::create_reusable_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            logger.error(&format!("Failed to bind {addr}: {e}"));
            return Err(e.into());
        }
    };

    let state = Arc::new(AppState::new(cfg, Arc::clone(&logger)));
    logger::log_server_start(
        logger.as_ref(),
        &addr,
        &state.config,
        state.store.base_dir(),
    );

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals), Arc::clone(&logger))?;

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            Arc::clone(&signals.shutdown),
        ))
        .await
}
