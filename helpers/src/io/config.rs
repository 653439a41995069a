//! CLI configuration stored in `helpers.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "helpers.toml";

/// Helpers configuration (TOML).
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HelpersConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    pub output: OutputConfig,

    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON results.
    pub pretty: bool,
    /// Print results as `{"value": ..., "type": ...}` envelopes.
    pub typed: bool,
}

/// Values used when an optional trailing argument is omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// `object_contains_keys`: require every key (true) or any key (false).
    pub strict_keys: bool,
    /// `os_check_env`: treat an empty variable as unset.
    pub strict_env: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            typed: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            strict_keys: true,
            strict_env: true,
        }
    }
}

impl Default for HelpersConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            output: OutputConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl HelpersConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(anyhow!("log_filter must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HelpersConfig::default()`.
pub fn load_config(path: &Path) -> Result<HelpersConfig> {
    if !path.exists() {
        let cfg = HelpersConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HelpersConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &HelpersConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
