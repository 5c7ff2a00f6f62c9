//! Configuration loading.
//!
//! Layers, later wins:
//! 1. defaults in code
//! 2. optional `stockroom.toml` in the working directory
//! 3. `STOCKROOM_*` environment variables (a `.env` file is read first)

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StockroomConfig {
    /// Deadline for the load phase of one reconciliation, in milliseconds.
    pub load_timeout_ms: u64,

    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl StockroomConfig {
    pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 5_000;

    /// Load configuration from defaults, file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .set_default("load_timeout_ms", Self::DEFAULT_LOAD_TIMEOUT_MS)?
            .set_default("log_filter", "info")?
            .add_source(File::with_name("stockroom").required(false))
            .add_source(Environment::with_prefix("STOCKROOM").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl Default for StockroomConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: Self::DEFAULT_LOAD_TIMEOUT_MS,
            log_filter: "info".to_string(),
        }
    }
}
