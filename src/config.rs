use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Characters allowed per item of a `romanize_batch` call.
pub const MAX_BATCH_ITEM_LENGTH: usize = 1000;

/// Characters allowed in a `detect_script` call.
pub const MAX_DETECT_LENGTH: usize = 5000;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UROMAN_COMMAND: &str = "uroman";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Http,
    Lambda,
    Stdio,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Lambda => "lambda",
            Self::Stdio => "stdio",
        }
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" | "server" => Ok(Self::Http),
            "lambda" | "aws" => Ok(Self::Lambda),
            "stdio" => Ok(Self::Stdio),
            _ => Err(ConfigError::Invalid {
                name: "PLATFORM",
                value: s.to_string(),
                expected: "one of http, lambda, stdio",
            }),
        }
    }
}

/// Resource limits in force for one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub cache_size: usize,
    pub max_text_length: usize,
    pub max_batch_size: usize,
    pub max_batch_item_length: usize,
    pub max_detect_length: usize,
    pub max_body_bytes: usize,
}

impl Limits {
    /// The platform's ceilings, which are also its defaults.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Http | Platform::Stdio => Self {
                cache_size: 10_000,
                max_text_length: 10_000,
                max_batch_size: 100,
                max_batch_item_length: MAX_BATCH_ITEM_LENGTH,
                max_detect_length: MAX_DETECT_LENGTH,
                max_body_bytes: 1024 * 1024,
            },
            // Lambda: small memory tier and 6 MB synchronous payload cap.
            Platform::Lambda => Self {
                cache_size: 1_000,
                max_text_length: 10_000,
                max_batch_size: 50,
                max_batch_item_length: MAX_BATCH_ITEM_LENGTH,
                max_detect_length: MAX_DETECT_LENGTH,
                max_body_bytes: 6 * 1000 * 1000,
            },
        }
    }

    /// Apply operator overrides, clamped to these limits as ceilings.
    pub fn with_overrides(self, overrides: &LimitOverrides) -> Self {
        let clamp = |value: Option<usize>, ceiling: usize| value.map_or(ceiling, |v| v.min(ceiling));
        Self {
            cache_size: clamp(overrides.cache_size, self.cache_size),
            max_text_length: clamp(overrides.max_text_length, self.max_text_length),
            max_batch_size: clamp(overrides.max_batch_size, self.max_batch_size),
            ..self
        }
    }
}

/// Limits requested through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitOverrides {
    pub cache_size: Option<usize>,
    pub max_text_length: Option<usize>,
    pub max_batch_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::Invalid {
                name: "LOG_LEVEL",
                value: s.to_string(),
                expected: "one of debug, info, warn, error",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                value: s.to_string(),
                expected: "compact or json",
            }),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub platform: Platform,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub uroman_command: String,
    pub prewarm: bool,
    pub overrides: LimitOverrides,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Http,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            uroman_command: DEFAULT_UROMAN_COMMAND.to_string(),
            prewarm: false,
            overrides: LimitOverrides::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `PLATFORM` (optional, default `http`): `http`, `stdio` or `lambda`
    /// - `HOST` / `PORT` (optional, default `0.0.0.0:8080`): HTTP bind address
    /// - `CACHE_SIZE` (optional): result cache capacity, clamped to the platform ceiling
    /// - `MAX_TEXT_LENGTH` (optional, default 10000): characters per `romanize` call
    /// - `MAX_BATCH_SIZE` (optional, default 100): items per `romanize_batch` call
    /// - `LOG_LEVEL` (optional, default `info`): `debug|info|warn|error`
    /// - `LOG_FORMAT` (optional, default `compact`): `compact|json`
    /// - `UROMAN_COMMAND` (optional, default `uroman`): engine command line
    /// - `PREWARM` (optional, default `false`): initialize the engine and seed
    ///   the cache at startup instead of on the first request
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let platform = match lookup("PLATFORM") {
            Some(v) => v.parse()?,
            None => defaults.platform,
        };

        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
                expected: "a port number",
            })?,
            None => defaults.port,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(v) => v.parse()?,
            None => defaults.log_level,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => defaults.log_format,
        };

        let prewarm = match lookup("PREWARM") {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid {
                name: "PREWARM",
                value: v,
                expected: "true or false",
            })?,
            None => defaults.prewarm,
        };

        let overrides = LimitOverrides {
            cache_size: parse_count(&lookup, "CACHE_SIZE", true)?,
            max_text_length: parse_count(&lookup, "MAX_TEXT_LENGTH", false)?,
            max_batch_size: parse_count(&lookup, "MAX_BATCH_SIZE", false)?,
        };

        Ok(Self {
            platform,
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level,
            log_format,
            uroman_command: lookup("UROMAN_COMMAND")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.uroman_command),
            prewarm,
            overrides,
        })
    }

    /// Effective limits for an adapter running on `platform`.
    pub fn limits(&self, platform: Platform) -> Limits {
        Limits::for_platform(platform).with_overrides(&self.overrides)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_count<F>(lookup: &F, name: &'static str, allow_zero: bool) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    match raw.trim().parse::<usize>() {
        Ok(0) if !allow_zero => Err(ConfigError::Invalid {
            name,
            value: raw,
            expected: "a positive integer",
        }),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ConfigError::Invalid {
            name,
            value: raw,
            expected: if allow_zero { "a non-negative integer" } else { "a positive integer" },
        }),
    }
}
