use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::board::{DEFAULT_LIST_WIDTH, clamp_width};

/// Configuration from config.toml in the store directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSection {
    /// Width given to new lists
    #[serde(default = "default_list_width")]
    pub default_list_width: u32,
}

impl Default for BoardSection {
    fn default() -> Self {
        BoardSection {
            default_list_width: DEFAULT_LIST_WIDTH,
        }
    }
}

impl BoardSection {
    /// Configured width, clamped to the supported range
    pub fn list_width(&self) -> u32 {
        clamp_width(self.default_list_width)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Page that share links point at
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        ShareConfig {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_totals: bool,
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_totals: true,
            colors: HashMap::new(),
        }
    }
}

fn default_list_width() -> u32 {
    DEFAULT_LIST_WIDTH
}

fn default_base_url() -> String {
    "https://stickerboard.app/".to_string()
}

fn default_true() -> bool {
    true
}
