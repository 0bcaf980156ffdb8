use crate::decoder::PayloadFormat;
use crate::server;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    log_level: String,
    server: Server,
    location_log: LocationLog,
    decoder: Decoder,
    display: Display,
}

impl AppConfig {
    /// Loads the configuration from `config.toml`, `config_local.toml` and `LOCATOR__*` environment variables, each
    /// optional and each overriding the previous one.
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("LOCATOR").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("server.bind_address", "0.0.0.0")?
            .set_default("server.port", 2222_i64)?
            .set_default("server.retry_ms", 500_i64)?
            .set_default("server.retry_max_delay_ms", 30_000_i64)?
            .set_default("location_log.path", "location.json")?
            .set_default("decoder.format", "legacy")?
            .set_default("display.interval", "1s")
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|e| ConfigError::Message(format!("invalid log_level '{}': {}", self.log_level, e)))
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn location_log(&self) -> &LocationLog {
        &self.location_log
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn display(&self) -> &Display {
        &self.display
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    bind_address: String,
    port: u16,
    retry_ms: u64,
    retry_max_delay_ms: u64,
    max_restarts: Option<usize>,
}

impl Server {
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.bind_address, self.port)
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay_ms(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn max_restarts(&self) -> Option<usize> {
        self.max_restarts
    }

    pub fn listen_config(&self) -> server::Config {
        server::Config {
            endpoint: self.endpoint(),
            retry_ms: self.retry_ms(),
            retry_max_delay: self.retry_max_delay_ms(),
            max_restarts: self.max_restarts(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationLog {
    path: String,
}

impl LocationLog {
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
pub struct Decoder {
    format: PayloadFormat,
}

impl Decoder {
    pub fn format(&self) -> PayloadFormat {
        self.format
    }
}

#[derive(Debug, Deserialize)]
pub struct Display {
    #[serde(with = "humantime_serde")]
    interval: Duration,
}

impl Display {
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
