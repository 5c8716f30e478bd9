//! Sync configuration helpers.
//!
//! The config is a small JSON document; every key is optional and falls back
//! to the values the Gene Wiki bot has always used.
use crate::model::RejectPolicy;
use crate::wikitext::{ParseOptions, PAGE_PREFIX, TEMPLATE_NAME};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_BOT_NAME: &str = "ProteinBoxBot";
const CONFIG_REL: &str = "pbb/config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_template_name")]
    pub template_name: String,
    #[serde(default = "default_page_prefix")]
    pub page_prefix: String,
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default)]
    pub reject_policy: RejectPolicy,
}

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn default_template_name() -> String {
    TEMPLATE_NAME.to_string()
}

fn default_page_prefix() -> String {
    PAGE_PREFIX.to_string()
}

fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        default_config()
    }
}

impl SyncConfig {
    pub fn parse_options(&self) -> ParseOptions<'_> {
        ParseOptions {
            template_name: &self.template_name,
            policy: self.reject_policy,
        }
    }
}

pub fn default_config() -> SyncConfig {
    SyncConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        template_name: default_template_name(),
        page_prefix: default_page_prefix(),
        bot_name: default_bot_name(),
        reject_policy: RejectPolicy::Keep,
    }
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> String {
    serde_json::to_string_pretty(&default_config()).expect("serialize config stub")
}

pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: SyncConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SyncConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.template_name.trim().is_empty() {
        return Err(anyhow!("config template_name must not be empty"));
    }
    if config.bot_name.trim().is_empty() {
        return Err(anyhow!("config bot_name must not be empty"));
    }
    Ok(())
}

/// `<config dir>/pbb/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_REL))
}

/// Explicit path first, then the per-user config, then built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<SyncConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path().filter(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading user config");
            load_config(&path)
        }
        None => Ok(default_config()),
    }
}
