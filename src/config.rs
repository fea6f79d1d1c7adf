//! Server configuration from environment variables

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_IDLE_SECS: u64 = 600;

/// Deployment environment, reported by `/health`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            "test" => Some(Environment::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where sessions are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub db: DbLocation,
    pub environment: Environment,
    /// Fallback filter level when `RUST_LOG` is unset
    pub log_level: String,
    pub provider_timeout: Duration,
    /// How long a session's runtime task lingers without turns
    pub session_idle_timeout: Duration,
    /// Allowed CORS origin; any origin when unset
    pub frontend_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            db: DbLocation::InMemory,
            environment: Environment::Development,
            log_level: "info".to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            frontend_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let secs = |name: &str| {
            var(name)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
        };

        let db = match var("TRIP_PLANNER_DB_PATH") {
            Some(path) if path.trim() == ":memory:" => DbLocation::InMemory,
            Some(path) => DbLocation::File(PathBuf::from(path)),
            None => {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                DbLocation::File(PathBuf::from(home).join(".trip-planner").join("sessions.db"))
            }
        };

        Self {
            host: var("TRIP_PLANNER_HOST")
                .and_then(|h| h.trim().parse().ok())
                .unwrap_or(defaults.host),
            port: var("TRIP_PLANNER_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            db,
            environment: var("TRIP_PLANNER_ENV")
                .and_then(|e| Environment::parse(&e))
                .unwrap_or(defaults.environment),
            log_level: var("TRIP_PLANNER_LOG_LEVEL")
                .map_or(defaults.log_level, |l| l.trim().to_ascii_lowercase()),
            provider_timeout: secs("TRIP_PLANNER_PROVIDER_TIMEOUT_SECS")
                .unwrap_or(defaults.provider_timeout),
            session_idle_timeout: secs("TRIP_PLANNER_SESSION_IDLE_SECS")
                .unwrap_or(defaults.session_idle_timeout),
            frontend_url: var("TRIP_PLANNER_FRONTEND_URL").map(|u| u.trim().to_string()),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
