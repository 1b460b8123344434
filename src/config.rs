//! Console configuration, read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `CIVIC_API_BASE` | `http://localhost:5000/api` |
//! | `CIVIC_STATE_DIR` | `.civic` |
//! | `CIVIC_HTTP_TIMEOUT_SECS` | `30` |

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_STATE_DIR: &str = ".civic";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base: Url,
    pub state_dir: PathBuf,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable lookup; lets tests avoid the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> AppResult<Self> {
        let base = get("CIVIC_API_BASE").filter(|s| !s.trim().is_empty()).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(base.trim())
            .map_err(|e| AppError::user("invalid_api_base".to_string(), format!("CIVIC_API_BASE '{}': {}", base, e)))?;
        let state_dir = get("CIVIC_STATE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
        let timeout_secs = match get("CIVIC_HTTP_TIMEOUT_SECS") {
            None => DEFAULT_HTTP_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(target: "civic::config", "CIVIC_HTTP_TIMEOUT_SECS='{}' is not a positive integer; using {}", raw, DEFAULT_HTTP_TIMEOUT_SECS);
                    DEFAULT_HTTP_TIMEOUT_SECS
                }
            },
        };
        Ok(Self { api_base, state_dir, http_timeout: Duration::from_secs(timeout_secs) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| m.get(k).cloned()
    }

    #[test]
    fn defaults_apply() {
        let c = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c.api_base.as_str(), "http://localhost:5000/api");
        assert_eq!(c.state_dir, PathBuf::from(".civic"));
        assert_eq!(c.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_and_bad_timeout_fallback() {
        let c = ConsoleConfig::from_lookup(lookup(&[
            ("CIVIC_API_BASE", "https://civic.example.org/api"),
            ("CIVIC_STATE_DIR", "/var/lib/civic"),
            ("CIVIC_HTTP_TIMEOUT_SECS", "zero"),
        ])).unwrap();
        assert_eq!(c.api_base.host_str(), Some("civic.example.org"));
        assert_eq!(c.state_dir, PathBuf::from("/var/lib/civic"));
        assert_eq!(c.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_base_is_user_error() {
        let err = ConsoleConfig::from_lookup(lookup(&[("CIVIC_API_BASE", "not a url")])).unwrap_err();
        assert_eq!(err.code_str(), "invalid_api_base");
        assert_eq!(err.http_status(), 400);
    }
}
