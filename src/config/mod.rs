// Configuration module entry point
// Loads the startup configuration and holds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LogLevel, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig,
    DEFAULT_BASE_DIR, DEFAULT_HOST, DEFAULT_PORT, FIRMWARE_FILE, VERSION_FILE,
};

/// Environment variable prefix, e.g. `OTA_SERVER__PORT=8080`
const ENV_PREFIX: &str = "OTA";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", types::DEFAULT_HOST)?
            .set_default("server.port", i64::from(types::DEFAULT_PORT))?
            .set_default("storage.base_dir", types::DEFAULT_BASE_DIR)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.server_name", types::DEFAULT_SERVER_NAME)?
            .set_default("http.strict_version_lookup", false)?
            .set_default("performance.keep_alive", true)?
            .set_default(
                "performance.shutdown_grace_secs",
                types::DEFAULT_SHUTDOWN_GRACE_SECS,
            )?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_conventions() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.base_dir, std::path::PathBuf::from("updates"));
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert!(!cfg.logging.access_log);
        assert!(!cfg.http.strict_version_lookup);
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = Config::load_from("/nonexistent/ota-server-config").unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.server.host, DEFAULT_HOST);
        assert_eq!(
            cfg.storage.base_dir,
            std::path::PathBuf::from(DEFAULT_BASE_DIR)
        );
        assert_eq!(cfg.storage.index_files, vec!["index.html", "index.htm"]);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ota.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        let contents = r#"
[server]
port = 8081

[storage]
base_dir = "/srv/firmware"

[logging]
level = "warn"

[http]
strict_version_lookup = true
"#;
        file.write_all(contents.as_bytes()).unwrap();

        let stem = dir.path().join("ota");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.host, DEFAULT_HOST);
        assert_eq!(cfg.storage.base_dir, std::path::PathBuf::from("/srv/firmware"));
        assert_eq!(cfg.logging.level, LogLevel::Warn);
        assert!(cfg.http.strict_version_lookup);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        assert_eq!(cfg.socket_addr().unwrap().port(), 3000);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
