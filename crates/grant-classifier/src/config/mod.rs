use crate::classification::{RuleSet, RuleSetLoadError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service and the batch pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub classification: ClassificationConfig,
    pub pipeline: PipelineConfig,
    pub review: ReviewConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rules_path = optional("GRANT_RULES_PATH").map(PathBuf::from);

        let pipeline = PipelineConfig {
            workers: positive("ETL_WORKERS", 10)?,
            max_attempts: positive("ETL_MAX_ATTEMPTS", 3)?,
            backoff_ms: number("ETL_BACKOFF_MS", 500)?,
            review_batch_size: positive("REVIEW_BATCH_SIZE", 20)?,
        };

        let review = ReviewConfig {
            api_key: optional("ANTHROPIC_API_KEY"),
            model: env::var("REVIEW_MODEL")
                .unwrap_or_else(|_| ReviewConfig::DEFAULT_MODEL.to_string()),
        };

        let storage = StorageConfig {
            base_url: optional("SUPABASE_URL"),
            service_key: optional("SUPABASE_SERVICE_KEY"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            classification: ClassificationConfig { rules_path },
            pipeline,
            review,
            storage,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(key) {
        None => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

fn positive(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let parsed = number(key, default as u64)?;
    if parsed == 0 {
        return Err(ConfigError::InvalidNumber {
            key,
            value: parsed.to_string(),
        });
    }
    usize::try_from(parsed).map_err(|_| ConfigError::InvalidNumber {
        key,
        value: parsed.to_string(),
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the classification rule set comes from.
#[derive(Debug, Clone, Default)]
pub struct ClassificationConfig {
    pub rules_path: Option<PathBuf>,
}

impl ClassificationConfig {
    /// Rules file when configured, otherwise the built-in tables.
    pub fn rule_set(&self) -> Result<RuleSet, RuleSetLoadError> {
        match &self.rules_path {
            Some(path) => RuleSet::from_path(path),
            None => Ok(RuleSet::standard()),
        }
    }
}

/// Batch sizing and retry behavior for external calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub workers: usize,
    pub max_attempts: usize,
    pub backoff_ms: u64,
    pub review_batch_size: usize,
}

impl PipelineConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            max_attempts: 3,
            backoff_ms: 500,
            review_batch_size: 20,
        }
    }
}

/// Secondary (language model) review pass.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl ReviewConfig {
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-latest";

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// PostgREST-style datastore receiving classification updates.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: Option<String>,
    pub service_key: Option<String>,
}

impl StorageConfig {
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some() && self.service_key.is_some()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "GRANT_RULES_PATH",
            "ETL_WORKERS",
            "ETL_MAX_ATTEMPTS",
            "ETL_BACKOFF_MS",
            "REVIEW_BATCH_SIZE",
            "ANTHROPIC_API_KEY",
            "REVIEW_MODEL",
            "SUPABASE_URL",
            "SUPABASE_SERVICE_KEY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.review.model, ReviewConfig::DEFAULT_MODEL);
        assert!(!config.review.is_enabled());
        assert!(!config.storage.is_enabled());
        assert!(config.classification.rules_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_pipeline_and_credentials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ETL_WORKERS", "4");
        env::set_var("ETL_BACKOFF_MS", "0");
        env::set_var("ANTHROPIC_API_KEY", "sk-test");
        env::set_var("SUPABASE_URL", "https://example.supabase.co");
        env::set_var("SUPABASE_SERVICE_KEY", "service");

        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.pipeline.base_delay(), Duration::ZERO);
        assert!(config.review.is_enabled());
        assert!(config.storage.is_enabled());
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_and_zero_workers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ETL_WORKERS", "many");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key, .. }) => assert_eq!(key, "ETL_WORKERS"),
            other => panic!("expected invalid number, got {other:?}"),
        }

        env::set_var("ETL_WORKERS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber { .. })
        ));
        reset_env();
    }

    #[test]
    fn rule_set_defaults_to_standard_tables() {
        let config = ClassificationConfig::default();
        assert_eq!(config.rule_set().expect("standard rules"), RuleSet::standard());
    }
}
