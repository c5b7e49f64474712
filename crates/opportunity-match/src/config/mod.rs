use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::{ConfigurationError, FactorWeights, MatchingConfig, PoolPolicy};

const DEFAULT_CACHE_CAPACITY: usize = 256;

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

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingSettings,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::from_label(&value).ok_or(ConfigError::InvalidValue {
                key: "APP_LOG_FORMAT",
                value,
            })?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            matching: MatchingSettings::from_env()?,
        })
    }
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
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Weight table, pool policy, and cache sizing for the matching engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingSettings {
    pub engine: MatchingConfig,
    pub cache_capacity: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            engine: MatchingConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl MatchingSettings {
    /// Read overrides from `MATCH_*` variables. The weight table is validated here so a broken
    /// table stops startup instead of surfacing per request.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = FactorWeights::default();
        let weights = FactorWeights {
            skill: weight_var("MATCH_WEIGHT_SKILL", defaults.skill)?,
            credential: weight_var("MATCH_WEIGHT_CREDENTIAL", defaults.credential)?,
            level: weight_var("MATCH_WEIGHT_LEVEL", defaults.level)?,
            location: weight_var("MATCH_WEIGHT_LOCATION", defaults.location)?,
        };

        let pool_policy = match env::var("MATCH_POOL_POLICY") {
            Ok(value) => PoolPolicy::from_label(&value).ok_or(ConfigError::InvalidValue {
                key: "MATCH_POOL_POLICY",
                value,
            })?,
            Err(_) => PoolPolicy::default(),
        };

        let cache_capacity = match env::var("MATCH_CACHE_CAPACITY") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "MATCH_CACHE_CAPACITY",
                    value,
                })?,
            Err(_) => DEFAULT_CACHE_CAPACITY,
        };

        let engine = MatchingConfig {
            weights,
            pool_policy,
        };
        engine.validate()?;

        Ok(Self {
            engine,
            cache_capacity,
        })
    }
}

fn weight_var(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
    Matching(ConfigurationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
            ConfigError::Matching(err) => write!(f, "matching weights rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Matching(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for ConfigError {
    fn from(value: ConfigurationError) -> Self {
        Self::Matching(value)
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
            "APP_LOG_FORMAT",
            "MATCH_WEIGHT_SKILL",
            "MATCH_WEIGHT_CREDENTIAL",
            "MATCH_WEIGHT_LEVEL",
            "MATCH_WEIGHT_LOCATION",
            "MATCH_POOL_POLICY",
            "MATCH_CACHE_CAPACITY",
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
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.matching, MatchingSettings::default());
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
    fn reads_matching_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_WEIGHT_SKILL", "50");
        env::set_var("MATCH_WEIGHT_CREDENTIAL", "20");
        env::set_var("MATCH_POOL_POLICY", "penalize-empty");
        env::set_var("MATCH_CACHE_CAPACITY", "8");

        let settings = MatchingSettings::from_env().expect("overrides load");
        reset_env();

        assert_eq!(settings.engine.weights.skill, 50.0);
        assert_eq!(settings.engine.weights.credential, 20.0);
        assert_eq!(settings.engine.pool_policy, PoolPolicy::PenalizeEmpty);
        assert_eq!(settings.cache_capacity, 8);
    }

    #[test]
    fn rejects_weight_table_off_the_documented_total() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_WEIGHT_LOCATION", "25");

        let result = MatchingSettings::from_env();
        reset_env();

        match result {
            Err(ConfigError::Matching(ConfigurationError::WeightTotal { actual, .. })) => {
                assert_eq!(actual, 115.0);
            }
            other => panic!("expected weight total rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_pool_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_POOL_POLICY", "renormalize");

        let result = MatchingSettings::from_env();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "MATCH_POOL_POLICY",
                ..
            })
        ));
    }
}
