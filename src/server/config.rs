use crate::server::error::config::ConfigError;

/// Database name used when `DATABASE_NAME` is not set.
pub static DEFAULT_DATABASE_NAME: &str = "stc-db";

/// Pool size used when `DATABASE_MAX_CONNECTIONS` is not set.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Application settings.
///
/// Loaded once at startup and passed explicitly to the components that need it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub database_max_connections: u32,
}

impl Config {
    /// Load settings from process environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError::MissingEnvVar)` - `DATABASE_URL` is not set
    /// - `Err(ConfigError::InvalidEnvValue)` - `DATABASE_MAX_CONNECTIONS` is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Used by [`Config::from_env`] and by tests which must not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let database_name = lookup("DATABASE_NAME")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_max_connections(&value)?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            database_name,
            database_max_connections,
        })
    }
}

fn parse_max_connections(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvValue {
        var: "DATABASE_MAX_CONNECTIONS".to_string(),
        reason,
    };

    match value.trim().parse::<u32>() {
        Ok(0) => Err(invalid("must be greater than 0".to_string())),
        Ok(max_connections) => Ok(max_connections),
        Err(e) => Err(invalid(e.to_string())),
    }
}
