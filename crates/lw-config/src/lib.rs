//! lw-config
//!
//! Runtime configuration: a YAML file, environment overrides on top, and a
//! stable hash of the effective document so the active config can be logged
//! and compared across restarts.
//!
//! The database URL is deliberately not part of the config document; lw-db
//! reads it from `LW_DATABASE_URL` so credentials never land in a file that
//! gets hashed and logged.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Production attention-list endpoint.
pub const DEFAULT_ATTENTION_URL: &str = "https://openapi.twse.com.tw/v1/announcement/notice";

/// Production disposition-list endpoint.
pub const DEFAULT_DISPOSITION_URL: &str = "https://www.twse.com.tw/rwd/zh/announcement/punish";

pub const ENV_BIND_ADDR: &str = "LW_BIND_ADDR";
pub const ENV_ATTENTION_URL: &str = "LW_ATTENTION_URL";
pub const ENV_DISPOSITION_URL: &str = "LW_DISPOSITION_URL";
pub const ENV_FETCH_INTERVAL_SECS: &str = "LW_FETCH_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Daemon listen address.
    pub bind_addr: String,

    /// Attention-list feed endpoint.
    pub attention_url: String,

    /// Disposition-list feed endpoint.
    pub disposition_url: String,

    /// Seconds between scheduled ingestion passes. The upstream lists change
    /// once per trading day after close, so an hourly cadence is already
    /// generous.
    pub fetch_interval_secs: u64,

    /// Securities with at least one attention event in this many days are
    /// candidates for the risk report.
    pub risk_candidate_window_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".to_string(),
            attention_url: DEFAULT_ATTENTION_URL.to_string(),
            disposition_url: DEFAULT_DISPOSITION_URL.to_string(),
            fetch_interval_secs: 3600,
            risk_candidate_window_days: 10,
        }
    }
}

impl Config {
    /// Parse a YAML config file. Unknown keys are an error so a typo cannot
    /// silently fall back to a default.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config failed: {}", path.display()))?;
        serde_yaml::from_str(&raw).context("parse config yaml failed")
    }

    /// Load `path` when given, defaults otherwise, then apply env overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Environment variables override the file for deploy-time wiring.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_BIND_ADDR) {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var(ENV_ATTENTION_URL) {
            self.attention_url = v;
        }
        if let Ok(v) = std::env::var(ENV_DISPOSITION_URL) {
            self.disposition_url = v;
        }
        if let Ok(v) = std::env::var(ENV_FETCH_INTERVAL_SECS) {
            self.fetch_interval_secs = v
                .parse()
                .with_context(|| format!("{ENV_FETCH_INTERVAL_SECS} must be an integer: '{v}'"))?;
        }
        Ok(())
    }

    /// SHA-256 over the canonical JSON rendering of the effective config.
    ///
    /// serde_json's default map is ordered, so the rendering is stable for
    /// equal configs regardless of field declaration or file order.
    pub fn config_hash(&self) -> Result<String> {
        let value = serde_json::to_value(self).context("config to json failed")?;
        let canonical = serde_json::to_string(&value).context("config canonicalize failed")?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_production_endpoints() {
        let cfg = Config::default();
        assert_eq!(cfg.attention_url, DEFAULT_ATTENTION_URL);
        assert_eq!(cfg.disposition_url, DEFAULT_DISPOSITION_URL);
        assert!(cfg.fetch_interval_secs > 0);
    }

    #[test]
    fn load_reads_yaml_and_fills_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "bind_addr: \"0.0.0.0:9000\"").unwrap();
        writeln!(f, "fetch_interval_secs: 600").unwrap();

        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.fetch_interval_secs, 600);
        // Unset keys come from defaults.
        assert_eq!(cfg.attention_url, DEFAULT_ATTENTION_URL);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "bind_adr: \"0.0.0.0:9000\"").unwrap();
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn hash_is_stable_and_sensitive() {
        let a = Config::default();
        let b = Config::default();
        assert_eq!(a.config_hash().unwrap(), b.config_hash().unwrap());

        let mut c = Config::default();
        c.fetch_interval_secs += 1;
        assert_ne!(a.config_hash().unwrap(), c.config_hash().unwrap());
    }

    #[test]
    fn env_overrides_apply_on_top_of_file_values() {
        // One test mutates the process environment; keep all env coverage
        // here so parallel tests cannot race on it.
        std::env::set_var(ENV_BIND_ADDR, "127.0.0.1:9999");
        std::env::set_var(ENV_FETCH_INTERVAL_SECS, "120");

        let cfg = Config::load_or_default(None).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.fetch_interval_secs, 120);

        std::env::set_var(ENV_FETCH_INTERVAL_SECS, "not-a-number");
        assert!(Config::load_or_default(None).is_err());

        std::env::remove_var(ENV_BIND_ADDR);
        std::env::remove_var(ENV_FETCH_INTERVAL_SECS);
    }
}
