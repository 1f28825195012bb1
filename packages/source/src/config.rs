//! Fetch configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CPS_API_URL` | [`DEFAULT_API_URL`] |
//! | `CPS_TIMEOUT_SECS` | `30` |
//! | `CPS_MAX_RETRIES` | `2` |
//! | `CPS_SUMMARY_LIMIT` | `500` |
//! | `CPS_LIST_LIMIT` | `100` |

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Socrata API endpoint for the CPS school progress report dataset.
pub const DEFAULT_API_URL: &str = "https://data.cityofchicago.org/resource/9xs2-f89t.json";

/// Record cap for the landing dashboard.
pub const DEFAULT_SUMMARY_LIMIT: u64 = 500;

/// Record cap for the list view.
pub const DEFAULT_LIST_LIMIT: u64 = 100;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while building configuration or the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held an unusable value.
    #[error("invalid value {value:?} for {var}: {message}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Everything a [`crate::socrata::SocrataSchoolSource`] and the views need
/// to know about the upstream dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Dataset endpoint.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry behaviour for transient failures.
    pub retry: RetryPolicy,
    /// Record cap for the landing dashboard.
    pub summary_limit: u64,
    /// Record cap for the list view.
    pub list_limit: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl SourceConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse
    /// or a limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse
    /// or a limit is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CPS_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let timeout = parse_var::<u64>(&lookup, "CPS_TIMEOUT_SECS")?
            .map_or(defaults.timeout, Duration::from_secs);

        let retry = RetryPolicy {
            max_retries: parse_var::<u32>(&lookup, "CPS_MAX_RETRIES")?
                .unwrap_or(defaults.retry.max_retries),
            ..defaults.retry
        };

        let summary_limit = non_zero(
            "CPS_SUMMARY_LIMIT",
            parse_var::<u64>(&lookup, "CPS_SUMMARY_LIMIT")?.unwrap_or(defaults.summary_limit),
        )?;
        let list_limit = non_zero(
            "CPS_LIST_LIMIT",
            parse_var::<u64>(&lookup, "CPS_LIST_LIMIT")?.unwrap_or(defaults.list_limit),
        )?;

        Ok(Self {
            api_url,
            timeout,
            retry,
            summary_limit,
            list_limit,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            var,
            message: e.to_string(),
            value,
        })
}

fn non_zero(var: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = SourceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SourceConfig::default());
        assert_eq!(config.summary_limit, 500);
        assert_eq!(config.list_limit, 100);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn reads_overrides() {
        let config = SourceConfig::from_lookup(lookup_from(&[
            ("CPS_API_URL", "http://localhost:9000/schools.json"),
            ("CPS_TIMEOUT_SECS", "5"),
            ("CPS_MAX_RETRIES", "0"),
            ("CPS_LIST_LIMIT", "25"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000/schools.json");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.list_limit, 25);
        assert_eq!(config.summary_limit, DEFAULT_SUMMARY_LIMIT);
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = SourceConfig::from_lookup(lookup_from(&[("CPS_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "CPS_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_limit() {
        assert!(SourceConfig::from_lookup(lookup_from(&[("CPS_SUMMARY_LIMIT", "0")])).is_err());
    }
}
