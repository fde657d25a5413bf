use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::ranking::CriterionTypeId;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
    pub catalog: CatalogConfig,
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

        let ranking = RankingConfig::from_env()?;
        let snapshot_path = env::var("CATALOG_SNAPSHOT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            ranking,
            catalog: CatalogConfig { snapshot_path },
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
    /// Colored output; only enabled for local development.
    pub ansi: bool,
}

/// Host-supplied constants the ranking engine depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    /// PFR evaluations a course needs before it is admitted to ranking.
    pub minimum_evaluation_count: usize,
    /// Criterion type that never takes part in ranking, whatever its flag.
    pub excluded_criterion_type_id: CriterionTypeId,
    pub default_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            minimum_evaluation_count: 5,
            excluded_criterion_type_id: CriterionTypeId(3),
            default_limit: 6,
        }
    }
}

impl RankingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let minimum_evaluation_count = parse_var(
            "RANKING_MIN_EVALUATIONS",
            defaults.minimum_evaluation_count,
        )?;
        let excluded_criterion_type_id = CriterionTypeId(parse_var(
            "RANKING_EXCLUDED_TYPE_ID",
            defaults.excluded_criterion_type_id.0,
        )?);
        let default_limit = parse_var("RANKING_DEFAULT_LIMIT", defaults.default_limit)?;
        if default_limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }

        Ok(Self {
            minimum_evaluation_count,
            excluded_criterion_type_id,
            default_limit,
        })
    }
}

/// Where the served catalog snapshot comes from.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub snapshot_path: Option<PathBuf>,
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    ZeroLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer (got '{value}')")
            }
            ConfigError::ZeroLimit => write!(f, "RANKING_DEFAULT_LIMIT must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::ZeroLimit => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
