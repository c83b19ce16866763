use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::export::ExportFormat;

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE_NAME: &str = "data_sweeper.json";

// ---------------------------------------------------------------------------
// Application settings
// ---------------------------------------------------------------------------

/// Read-only settings. Every field is optional in the file:
///
/// ```json
/// { "preview_rows": 10, "default_format": "xlsx", "window_size": [1400, 900] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Rows shown in each file's preview table.
    pub preview_rows: usize,
    /// Preselected conversion target for newly loaded files.
    pub default_format: ExportFormat,
    pub window_size: [f32; 2],
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            default_format: ExportFormat::Csv,
            window_size: [1200.0, 800.0],
        }
    }
}

impl SweeperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load [`CONFIG_FILE_NAME`] if it exists; fall back to defaults otherwise
    /// or when it cannot be parsed.
    pub fn discover() -> Self {
        Self::load_or_default(Path::new(CONFIG_FILE_NAME))
    }

    fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}
