use std::path::{Path, PathBuf};

use anyhow::Context;
use engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::resize::ResizePolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHAPES_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "shapes.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub engine: EngineConfig,
    /// Directory holding `<shape>.png` images.
    pub asset_dir: PathBuf,
    pub resize_policy: ResizePolicy,
    /// Fixed seed for reproducible rounds; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                title: "Shapes".into(),
                log_filter: "info".into(),
                ..EngineConfig::default()
            },
            asset_dir: PathBuf::from("assets"),
            resize_policy: ResizePolicy::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("invalid game config")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Reads `$SHAPES_CONFIG` if set, else `shapes.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config.engine.title, "Shapes");
        assert_eq!(config.engine.width, 800);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
        assert_eq!(config.resize_policy, ResizePolicy::Absolute);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn nested_engine_table_is_read() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 1234
            resize_policy = "compounding"

            [engine]
            width = 1024
            height = 768
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.resize_policy, ResizePolicy::Compounding);
        assert_eq!(config.engine.width, 1024);
        assert_eq!(config.engine.height, 768);
        // Fields missing from [engine] come from EngineConfig's defaults.
        assert_eq!(config.engine.log_filter, "error");
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(GameConfig::from_toml_str("resize_policy = \"stretchy\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(GameConfig::from_file(Path::new("no/such/shapes.toml")).is_err());
    }
}
