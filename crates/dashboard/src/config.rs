use std::time::Duration;

use jobwatch_client::reconnect::ReconnectConfig;
use jobwatch_core::log_feed::DEFAULT_LOG_CAPACITY;

/// Dashboard configuration loaded from environment variables.
///
/// All fields have defaults suitable for a service running locally.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Origin of the ingestion service, e.g. `https://ingest.example.com`.
    /// The socket URL is derived from it.
    pub origin: String,
    pub reconnect: ReconnectConfig,
    /// Log lines kept in the feed.
    pub log_capacity: usize,
}

impl DashboardConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `JOBWATCH_ORIGIN`               | `http://localhost:8000` |
    /// | `JOBWATCH_RECONNECT_INITIAL_MS` | `3000`                  |
    /// | `JOBWATCH_RECONNECT_MAX_MS`     | `30000`                 |
    /// | `JOBWATCH_RECONNECT_MULTIPLIER` | `2.0`                   |
    /// | `JOBWATCH_RECONNECT_JITTER`     | `0.2`                   |
    /// | `JOBWATCH_LOG_CAPACITY`         | `500`                   |
    ///
    /// Setting the multiplier to `1` and jitter to `0` gives a fixed
    /// retry interval.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = lookup("JOBWATCH_ORIGIN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:8000".into());

        let defaults = ReconnectConfig::default();
        let initial_ms: u64 = parse_var(&lookup, "JOBWATCH_RECONNECT_INITIAL_MS", 3000)?;
        let max_ms: u64 = parse_var(&lookup, "JOBWATCH_RECONNECT_MAX_MS", 30_000)?;
        let multiplier: f64 = parse_var(&lookup, "JOBWATCH_RECONNECT_MULTIPLIER", defaults.multiplier)?;
        let jitter: f64 = parse_var(&lookup, "JOBWATCH_RECONNECT_JITTER", defaults.jitter)?;
        let log_capacity: usize = parse_var(&lookup, "JOBWATCH_LOG_CAPACITY", DEFAULT_LOG_CAPACITY)?;

        if initial_ms == 0 {
            return Err(invalid("JOBWATCH_RECONNECT_INITIAL_MS", initial_ms, "must be positive"));
        }
        if max_ms < initial_ms {
            return Err(invalid(
                "JOBWATCH_RECONNECT_MAX_MS",
                max_ms,
                "must not be below JOBWATCH_RECONNECT_INITIAL_MS",
            ));
        }
        if !(multiplier.is_finite() && multiplier >= 1.0) {
            return Err(invalid("JOBWATCH_RECONNECT_MULTIPLIER", multiplier, "must be at least 1.0"));
        }
        if !(0.0..=1.0).contains(&jitter) {
            return Err(invalid("JOBWATCH_RECONNECT_JITTER", jitter, "must be between 0 and 1"));
        }
        if log_capacity == 0 {
            return Err(invalid("JOBWATCH_LOG_CAPACITY", log_capacity, "must be positive"));
        }

        Ok(Self {
            origin,
            reconnect: ReconnectConfig {
                initial_delay: Duration::from_millis(initial_ms),
                max_delay: Duration::from_millis(max_ms),
                multiplier,
                jitter,
            },
            log_capacity,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn invalid(var: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Errors from loading [`DashboardConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
