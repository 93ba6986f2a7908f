//! Tunable window-manager constants.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{error::DesktopError, keybindings::KeyBindings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Desktop session configuration. Every field has a default, so partial JSON documents load.
pub struct DesktopConfig {
    /// Smallest width a resize may produce.
    pub min_window_width: i32,
    /// Smallest height a resize may produce.
    pub min_window_height: i32,
    /// Width used when neither the caller nor the template gives one.
    pub default_window_width: i32,
    /// Height used when neither the caller nor the template gives one.
    pub default_window_height: i32,
    /// Gap kept around a maximized window on every side.
    pub maximize_margin: i32,
    /// Upper bound on how much of a dragged window must stay inside the viewport.
    pub drag_visible_margin: i32,
    /// Delay between a close request and removal.
    pub close_delay_ms: u64,
    /// Length of the open animation.
    pub appear_delay_ms: u64,
    /// Length of the maximize/restore animation.
    pub maximize_transition_ms: u64,
    /// Z-index counter value before the first window is raised.
    pub initial_z_index: u64,
    /// Range new windows pick their top edge from.
    pub spawn_top: Range<i32>,
    /// Range new windows pick their left edge from.
    pub spawn_left: Range<i32>,
    /// Seed for spawn scattering.
    pub spawn_seed: u64,
    /// Global shortcuts.
    pub keybindings: KeyBindings,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            min_window_width: 200,
            min_window_height: 150,
            default_window_width: 300,
            default_window_height: 200,
            maximize_margin: 20,
            drag_visible_margin: 100,
            close_delay_ms: 200,
            appear_delay_ms: 10,
            maximize_transition_ms: 300,
            initial_z_index: 100,
            spawn_top: 50..150,
            spawn_left: 50..300,
            spawn_seed: 0x5eed,
            keybindings: KeyBindings::default(),
        }
    }
}

impl DesktopConfig {
    /// Parses a (possibly partial) JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`DesktopError::Config`] when the document is malformed or a field has the wrong type.
    pub fn from_json_str(raw: &str) -> Result<Self, DesktopError> {
        serde_json::from_str(raw).map_err(|e| DesktopError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config = DesktopConfig::from_json_str(r#"{"close_delay_ms": 0, "min_window_width": 320}"#)
            .expect("config");
        assert_eq!(config.close_delay_ms, 0);
        assert_eq!(config.min_window_width, 320);
        assert_eq!(config.min_window_height, 150);
        assert_eq!(config.spawn_left, 50..300);
        assert_eq!(config.keybindings, KeyBindings::default());
    }

    #[test]
    fn ranges_load_as_start_end_objects() {
        let config =
            DesktopConfig::from_json_str(r#"{"spawn_top": {"start": 10, "end": 20}}"#).expect("config");
        assert_eq!(config.spawn_top, 10..20);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = DesktopConfig::from_json_str(r#"{"close_delay_ms": "soon"}"#)
            .expect_err("string delay");
        assert!(matches!(err, DesktopError::Config(_)));
    }
}
