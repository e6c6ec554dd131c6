use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub billing: BillingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("RENTBOOK_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("RENTBOOK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("RENTBOOK_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("RENTBOOK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_due_day = env::var("RENTBOOK_DEFAULT_DUE_DAY")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidDueDay)?;
        if !(1..=31).contains(&default_due_day) {
            return Err(ConfigError::InvalidDueDay);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            billing: BillingConfig { default_due_day },
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
}

/// Billing defaults applied when tenant onboarding omits a due day.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub default_due_day: u8,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidDueDay,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "RENTBOOK_PORT must be a valid u16"),
            ConfigError::InvalidDueDay => {
                write!(f, "RENTBOOK_DEFAULT_DUE_DAY must be a day of month (1-31)")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "RENTBOOK_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDueDay => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
