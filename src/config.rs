//! Server configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_TEMPLATE_PATH: &str = "Your paragraph text.png";
const DEFAULT_FONT_PATH: &str = "fonts/arial.ttf";
const DEFAULT_FONT_SIZE: f32 = 30.0;
const DEFAULT_COUNTER_FILE: &str = "counter.txt";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JSON_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub template_path: PathBuf,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub counter_file: PathBuf,
    pub debug_grid: bool,
    pub host: String,
    pub port: u16,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
    pub json_payload_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            counter_file: PathBuf::from(DEFAULT_COUNTER_FILE),
            debug_grid: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: Vec::new(),
            json_payload_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    /// for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let font_size = match get("INVOICE_FONT_SIZE") {
            Some(raw) => {
                let size: f32 = parse("INVOICE_FONT_SIZE", &raw)?;
                if !(size.is_finite() && size > 0.0) {
                    return Err(ConfigError::Invalid {
                        name: "INVOICE_FONT_SIZE",
                        value: raw,
                        reason: "must be a positive number".to_string(),
                    });
                }
                size
            }
            None => defaults.font_size,
        };

        let debug_grid = match get("INVOICE_DEBUG_GRID") {
            Some(raw) => parse_bool("INVOICE_DEBUG_GRID", &raw)?,
            None => defaults.debug_grid,
        };

        let port = match get("PORT") {
            Some(raw) => parse("PORT", &raw)?,
            None => defaults.port,
        };

        let json_payload_limit = match get("JSON_PAYLOAD_LIMIT") {
            Some(raw) => parse("JSON_PAYLOAD_LIMIT", &raw)?,
            None => defaults.json_payload_limit,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            template_path: get("INVOICE_TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_path),
            font_path: get("INVOICE_FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.font_path),
            font_size,
            counter_file: get("INVOICE_COUNTER_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.counter_file),
            debug_grid,
            host: get("HOST").unwrap_or(defaults.host),
            port,
            cors_allowed_origins,
            json_payload_limit,
        })
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
