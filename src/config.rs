use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{InsertFmtError, Result};
use crate::ignore::IgnoreRules;

/// Configuration of one invocation, read once and never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Path patterns exempting files from formatting.
    #[serde(rename = "regexToIgnore", default)]
    pub regex_to_ignore: Vec<String>,

    /// Checkout root the change-set paths are relative to (review mode).
    #[serde(default)]
    pub path_source: Option<PathBuf>,

    /// The merge under review (review mode).
    #[serde(default)]
    pub merge: Option<Merge>,

    /// Comment template with `${FILE_PATH}` and `${FORMATTED}` placeholders (review mode).
    #[serde(default)]
    pub message: Option<String>,

    #[serde(skip)]
    ignore: IgnoreRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Merge {
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

/// One file-level entry of a change-set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeRecord {
    pub new_path: String,
    #[serde(default)]
    pub deleted_file: bool,
}

/// The review-mode view of a [`Config`], with every required key present.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSettings<'a> {
    pub path_source: &'a Path,
    pub changes: &'a [ChangeRecord],
    pub message: &'a str,
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// TOML for `.toml` files, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl Config {
    /// Compiled form of `regex_to_ignore`.
    pub fn ignore_rules(&self) -> &IgnoreRules {
        &self.ignore
    }

    /// Check that the review-mode keys are present.
    pub fn review_settings(&self) -> Result<ReviewSettings<'_>> {
        let path_source = self
            .path_source
            .as_deref()
            .ok_or_else(|| missing_key("path_source"))?;
        let merge = self.merge.as_ref().ok_or_else(|| missing_key("merge"))?;
        let message = self
            .message
            .as_deref()
            .ok_or_else(|| missing_key("message"))?;
        Ok(ReviewSettings {
            path_source,
            changes: &merge.changes,
            message,
        })
    }
}

fn missing_key(key: &str) -> InsertFmtError {
    InsertFmtError::Config(format!("missing required key '{}' for review mode", key))
}

/// Parse config text and compile its ignore patterns.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config> {
    let mut config: Config = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    config.ignore = IgnoreRules::new(&config.regex_to_ignore)?;
    Ok(config)
}

/// Load a config file; the format follows the file extension.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.is_file() {
        return Err(InsertFmtError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| InsertFmtError::io_at(path, e))?;
    let config = parse_config(&content, ConfigFormat::from_path(path))?;
    tracing::debug!(
        path = %path.display(),
        ignore_patterns = config.ignore_rules().len(),
        "loaded config"
    );
    Ok(config)
}
