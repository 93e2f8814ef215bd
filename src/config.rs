//! Run-time configuration
//!
//! Defaults come from `constants`; each field can be overridden through a
//! `MARKET_DATA_*` environment variable. The binary applies its flags on top.

use crate::{
    constants::{COINGECKO_API_URL, DEFAULT_VS_CURRENCY, REQUEST_TIMEOUT_SECS},
    error::DashboardError,
    types::FailurePolicy,
};
use std::time::Duration;

pub const ENV_API_URL: &str = "MARKET_DATA_API_URL";
pub const ENV_VS_CURRENCY: &str = "MARKET_DATA_VS_CURRENCY";
pub const ENV_FAILURE_POLICY: &str = "MARKET_DATA_FAILURE_POLICY";
pub const ENV_TIMEOUT_SECS: &str = "MARKET_DATA_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "MARKET_DATA_CACHE_TTL_SECS";
pub const ENV_OFFLINE: &str = "MARKET_DATA_OFFLINE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the market data API
    pub api_url: String,
    /// Quote currency, lower-case
    pub vs_currency: String,
    pub failure_policy: FailurePolicy,
    pub request_timeout: Duration,
    /// Shared response cache lifetime; `None` disables caching
    pub cache_ttl: Option<Duration>,
    /// Serve the built-in datasets without touching the network
    pub offline: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: COINGECKO_API_URL.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            failure_policy: FailurePolicy::default(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_ttl: None,
            offline: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let failure_policy = match get(ENV_FAILURE_POLICY) {
            None => defaults.failure_policy,
            Some(v) => v.parse().map_err(|e| {
                DashboardError::invalid_config(format!("{ENV_FAILURE_POLICY}: {e}"))
            })?,
        };

        let config = Self {
            api_url: get(ENV_API_URL).unwrap_or(defaults.api_url),
            vs_currency: get(ENV_VS_CURRENCY)
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.vs_currency),
            failure_policy,
            request_timeout: match get(ENV_TIMEOUT_SECS) {
                None => defaults.request_timeout,
                Some(v) => Duration::from_secs(parse_secs(ENV_TIMEOUT_SECS, &v)?),
            },
            cache_ttl: match get(ENV_CACHE_TTL_SECS) {
                None => defaults.cache_ttl,
                Some(v) => Some(Duration::from_secs(parse_secs(ENV_CACHE_TTL_SECS, &v)?))
                    .filter(|ttl| !ttl.is_zero()),
            },
            offline: get(ENV_OFFLINE)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(defaults.offline),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(DashboardError::invalid_config(format!(
                "api url must be http(s), got {}",
                self.api_url
            )));
        }
        if self.vs_currency.is_empty()
            || !self.vs_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(DashboardError::invalid_config(format!(
                "quote currency must be alphabetic, got '{}'",
                self.vs_currency
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(DashboardError::invalid_config("request timeout must be > 0"));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, DashboardError> {
    value
        .parse::<u64>()
        .map_err(|e| DashboardError::invalid_config(format!("{key} invalid seconds: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.failure_policy, FailurePolicy::UseFallback);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:8080/api/v3"),
            (ENV_VS_CURRENCY, " EUR "),
            (ENV_FAILURE_POLICY, "surface"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_CACHE_TTL_SECS, "30"),
            (ENV_OFFLINE, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080/api/v3");
        assert_eq!(config.vs_currency, "eur");
        assert_eq!(config.failure_policy, FailurePolicy::SurfaceError);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(30)));
        assert!(config.offline);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = DashboardConfig::from_lookup(lookup(&[(ENV_CACHE_TTL_SECS, "0")])).unwrap();
        assert_eq!(config.cache_ttl, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            DashboardConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])),
            Err(DashboardError::InvalidConfig(_))
        ));
        assert!(DashboardConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup(&[(ENV_FAILURE_POLICY, "retry")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup(&[(ENV_API_URL, "ftp://x")])).is_err());
    }
}
