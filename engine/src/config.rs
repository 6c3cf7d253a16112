use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Background color as `0xRRGGBB`.
    pub clear_color: u32,
    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "engine".into(),
            width: 800,
            height: 600,
            clear_color: 0xffffff,
            log_filter: "error".into(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = EngineConfig::from_toml_str("title = \"demo\"\nwidth = 1024\n").unwrap();
        assert_eq!(config.title, "demo");
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.log_filter, "error");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(EngineConfig::from_toml_str("width = \"wide\"").is_err());
    }
}
