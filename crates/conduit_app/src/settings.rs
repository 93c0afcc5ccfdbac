// SPDX-License-Identifier: MIT OR Apache-2.0
//! Settings file handling.

use conduit_canvas::CanvasConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Settings file name, looked up in the current directory.
const SETTINGS_FILE: &str = "conduit.json";

/// Settings load/save failures.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written.
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    /// File contents are not valid settings JSON.
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

fn settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

fn read(path: &Path) -> Result<CanvasConfig, SettingsError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load settings, falling back to defaults when the file is missing or
/// malformed. A malformed file is logged and left untouched.
pub fn load() -> CanvasConfig {
    let path = settings_path();
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return CanvasConfig::default();
    }
    match read(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            CanvasConfig::default()
        }
    }
}

/// Persist settings next to the executable's working directory.
pub fn save(config: &CanvasConfig) -> Result<(), SettingsError> {
    let text = serde_json::to_string_pretty(config)?;
    std::fs::write(settings_path(), text)?;
    Ok(())
}
