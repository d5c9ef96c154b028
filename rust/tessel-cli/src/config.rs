//! Configuration file parsing for `tessel.toml`.
//!
//! Searches the starting directory then its ancestors. Every section is
//! optional.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tessel_core::FqName;
use tessel_incremental::{SourceUnit, StaticPackagePartProvider};
use thiserror::Error;

pub const CONFIG_FILE: &str = "tessel.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid toml in '{path}': {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
    #[error("no tessel.toml found in '{0}' or any parent directory")]
    NotFound(PathBuf),
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct TesselConfig {
    #[serde(default)]
    pub session: SessionSection,
    /// Absent means no incremental caches: lookups go to the delegate only.
    #[serde(default)]
    pub incremental: Option<IncrementalSection>,
    /// Package → parts known to the non-incremental provider.
    #[serde(default)]
    pub delegate: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct SessionSection {
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub package: FqName,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IncrementalSection {
    #[serde(default)]
    pub module_ids: Vec<String>,
    /// Directory of `<module-id>.json` snapshots, relative to the config file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".tessel/caches")
}

impl TesselConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&content, path)
    }

    /// Nearest `tessel.toml` at or above `start`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Find and load the nearest config, returning its path too.
    pub fn discover(start: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let path = Self::find(start).ok_or_else(|| ConfigError::NotFound(start.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "using config");
        let config = Self::load_from(&path)?;
        Ok((path, config))
    }

    pub fn source_units(&self) -> Vec<SourceUnit> {
        self.session
            .sources
            .iter()
            .map(|entry| SourceUnit::new(entry.path.clone(), entry.package.clone()))
            .collect()
    }

    pub fn delegate_provider(&self) -> StaticPackagePartProvider {
        self.delegate.iter().map(|(package, parts)| (package.clone(), parts.clone())).collect()
    }

    /// Cache directory resolved against the directory holding `config_path`.
    pub fn cache_dir(&self, config_path: &Path) -> Option<PathBuf> {
        let section = self.incremental.as_ref()?;
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        Some(base.join(&section.cache_dir))
    }
}
