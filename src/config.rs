use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use tracing::warn;

use crate::{CONFIG_KEY, TOOL_KEY};

/// Settings read from `[tool.requirements-filter]` (or a root level
/// `[requirements-filter]` table) of a TOML file.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Package names to drop, merged with `--exclude`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl FilterConfig {
    /// Load the config table from `path`. A file without our table yields the
    /// default (empty) config.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading config {path}"))?;
        Self::parse(&contents).with_context(|| format!("Parsing config {path}"))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let doc: toml::Table = contents.parse()?;
        let table = doc
            .get(TOOL_KEY)
            .and_then(|tool| tool.get(CONFIG_KEY))
            .or_else(|| doc.get(CONFIG_KEY));
        let Some(table) = table else {
            return Ok(Self::default());
        };
        let config = serde_ignored::deserialize(table.clone(), |path| {
            warn!("Ignoring unknown config key {CONFIG_KEY}.{path}");
        })?;
        Ok(config)
    }
}
