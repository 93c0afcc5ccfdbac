// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor behavior settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-tunable editor behavior.
///
/// Deserialized from the application's settings file; unknown fields are
/// ignored and missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Mirror the canvas selection into the host's active object.
    pub update_active_object: bool,
    /// Hover delay before port tooltips appear, in milliseconds.
    pub tooltip_delay_ms: u64,
    /// Swap to the editor view on startup.
    pub swap_on_startup: bool,
    /// Write a graph screenshot alongside saved state.
    pub autosave_screenshot: bool,
    /// Filename suffix for autosaved screenshots.
    pub screenshot_suffix: String,
    /// Render autosaved screenshots with a transparent background.
    pub screenshot_transparency: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            update_active_object: true,
            tooltip_delay_ms: 700,
            swap_on_startup: false,
            autosave_screenshot: true,
            screenshot_suffix: "_graph".to_owned(),
            screenshot_transparency: false,
        }
    }
}

impl CanvasConfig {
    /// Tooltip hover delay as a [`Duration`].
    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.tooltip_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: CanvasConfig = serde_json::from_str(r#"{"update_active_object": false}"#)
            .expect("valid config json");
        assert!(!cfg.update_active_object);
        assert_eq!(cfg.tooltip_delay(), Duration::from_millis(700));
        assert!(cfg.autosave_screenshot);
    }
}
