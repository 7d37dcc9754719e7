use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const STATE_FILE: &str = ".state.json";

/// Persisted TUI state (written to .state.json in the store directory)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Item under the cursor, in drag-target form (`sticker-<id>`, ...)
    #[serde(default)]
    pub focus: Option<String>,
    /// Index of the first list column on screen
    #[serde(default)]
    pub first_list: usize,
}

/// Read .state.json; missing or malformed files give None
pub fn read_ui_state(store_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(store_dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(store_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(store_dir.join(STATE_FILE), content)
}
