use std::str::FromStr;

use marches_auth::BackendConfig;

/// A server variable that is set but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{key} has an invalid value '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// HTTP server settings.
///
/// | Env Var                 | Default                 |
/// |-------------------------|-------------------------|
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `45`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
///
/// Backend variables are read by [`BackendConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Must stay above the market creation deadline so that race answers
    /// first.
    pub request_timeout_secs: u64,
    /// Upper bound on closing the pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub backend: BackendConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.backend = BackendConfig::from_env();
        Ok(config)
    }

    /// Server settings from an arbitrary lookup. The backend section is
    /// left at its default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: raw("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed(&lookup, "PORT", 3000)?,
            cors_origins: parse_origins(
                raw("CORS_ORIGINS")
                    .as_deref()
                    .unwrap_or("http://localhost:5173"),
            ),
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", 45)?,
            shutdown_timeout_secs: parsed(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            backend: BackendConfig::default(),
        })
    }
}

fn parsed<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { key, value }),
        _ => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
