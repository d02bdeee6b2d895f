use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_TABLE: &str = "applications";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Distinguishes runtime behavior for different stages of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Log presentation for this stage.
    pub fn log_style(self) -> LogStyle {
        match self {
            Self::Development => LogStyle::Readable,
            Self::Test | Self::Production => LogStyle::Plain,
        }
    }

    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the tracker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    /// `None` when no remote store is configured; offline commands still work.
    pub store: Option<StoreConfig>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("TRACKER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("TRACKER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store = match non_empty_var("SUPABASE_URL") {
            Some(base_url) => Some(StoreConfig::from_env(base_url)?),
            None => None,
        };

        Ok(Self {
            environment,
            store,
            telemetry: TelemetryConfig {
                log_level,
                style: environment.log_style(),
            },
        })
    }

    /// Remote store settings, or an error naming the missing variable.
    pub fn require_store(&self) -> Result<&StoreConfig, ConfigError> {
        self.store.as_ref().ok_or(ConfigError::StoreNotConfigured)
    }
}

/// Connection settings for the remote applications table.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub request_timeout: Duration,
}

impl StoreConfig {
    fn from_env(base_url: String) -> Result<Self, ConfigError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl { value: base_url });
        }

        let api_key =
            non_empty_var("SUPABASE_ANON_KEY").ok_or(ConfigError::MissingVar("SUPABASE_ANON_KEY"))?;
        let table = non_empty_var("TRACKER_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let timeout_secs = match non_empty_var("TRACKER_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout { value: raw }),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// Coloured, with event targets.
    Readable,
    /// Compact, no colours or targets; suited to captured output.
    Plain,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub style: LogStyle,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidTimeout { value: String },
    InvalidUrl { value: String },
    StoreNotConfigured,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(key) => write!(f, "{key} must be set"),
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "TRACKER_HTTP_TIMEOUT_SECS must be a positive integer (found '{value}')"
            ),
            ConfigError::InvalidUrl { value } => {
                write!(f, "SUPABASE_URL must be an http(s) URL (found '{value}')")
            }
            ConfigError::StoreNotConfigured => {
                write!(f, "no remote store configured; set SUPABASE_URL and SUPABASE_ANON_KEY")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
