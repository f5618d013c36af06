//! Configuration.
//!
//! TOML file, every field optional with sensible defaults.
//! Lookup order: explicit `--config` path, then
//! `~/.config/voxtab/config.toml`, then defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxConfig {
    /// Input dataset, loaded once at startup.
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,

    /// Directory for export artifacts and chart specs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Column whose distinct values are the entity names used for
    /// utterance matching.
    #[serde(default = "default_name_column")]
    pub name_column: String,
}

fn default_dataset() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_name_column() -> String {
    "name".to_string()
}

impl Default for VoxConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            output_dir: default_output_dir(),
            name_column: default_name_column(),
        }
    }
}

impl VoxConfig {
    /// User config path: ~/.config/voxtab/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        let home = std::env::var("HOME").ok()?;
        Some(
            Path::new(&home)
                .join(".config")
                .join("voxtab")
                .join("config.toml"),
        )
    }

    /// Load from an explicit path, or the user config, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
