//! Global keyboard shortcuts for the desktop.
//!
//! Bindings are plain data so hosts can load them from [`crate::DesktopConfig`]. Matching is
//! case-insensitive on the key and exact on the `ctrl`/`alt`/`meta` modifiers; `shift` is ignored
//! so a binding fires whether the host reports `t` or `T`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Key plus modifier state a binding fires on.
pub struct KeyChord {
    /// `KeyboardEvent.key` value, compared case-insensitively.
    pub key: String,
    /// Control modifier.
    pub ctrl: bool,
    /// Alt/Option modifier.
    pub alt: bool,
    /// Meta/Command modifier.
    pub meta: bool,
}

impl KeyChord {
    /// Chord for a bare key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Adds the control modifier.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Adds the alt modifier.
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    fn matches(&self, input: &KeyInput) -> bool {
        self.key.eq_ignore_ascii_case(&input.key)
            && self.ctrl == input.ctrl
            && self.alt == input.alt
            && self.meta == input.meta
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// A key event as delivered by the host.
pub struct KeyInput {
    /// `KeyboardEvent.key` value.
    pub key: String,
    /// Control modifier.
    pub ctrl: bool,
    /// Alt/Option modifier.
    pub alt: bool,
    /// Shift modifier.
    pub shift: bool,
    /// Meta/Command modifier.
    pub meta: bool,
    /// Whether the event target is an input, textarea, or editable region.
    pub target_is_text_input: bool,
}

impl KeyInput {
    /// Key event with no modifiers outside any text input.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the control modifier.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Sets the alt modifier.
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Marks the event as targeting a text input.
    pub fn in_text_input(mut self) -> Self {
        self.target_is_text_input = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "app_type", rename_all = "kebab-case")]
/// Desktop operation a shortcut triggers.
pub enum ShortcutAction {
    /// Focus the next window in creation order.
    CycleWindows,
    /// Open a new window of the given app type.
    OpenApp(String),
    /// Close the focused window.
    CloseFocusedWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One chord-to-action mapping.
pub struct KeyBinding {
    /// Chord that triggers the action.
    pub chord: KeyChord,
    /// Action to run.
    pub action: ShortcutAction,
    /// Fire even when the event targets a text input.
    #[serde(default)]
    pub allow_in_text_input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered binding table; the first match wins.
pub struct KeyBindings {
    /// Bindings in priority order.
    pub bindings: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                KeyBinding {
                    chord: KeyChord::key("k").ctrl().alt(),
                    action: ShortcutAction::CycleWindows,
                    allow_in_text_input: false,
                },
                KeyBinding {
                    chord: KeyChord::key("e").ctrl(),
                    action: ShortcutAction::OpenApp("code-editor".to_string()),
                    allow_in_text_input: false,
                },
                KeyBinding {
                    chord: KeyChord::key("t").ctrl().alt(),
                    action: ShortcutAction::OpenApp("terminal".to_string()),
                    allow_in_text_input: false,
                },
                KeyBinding {
                    chord: KeyChord::key("Escape"),
                    action: ShortcutAction::CloseFocusedWindow,
                    allow_in_text_input: true,
                },
            ],
        }
    }
}

impl KeyBindings {
    /// Returns the action bound to `input`, if any.
    pub fn resolve(&self, input: &KeyInput) -> Option<&ShortcutAction> {
        self.bindings
            .iter()
            .filter(|binding| binding.allow_in_text_input || !input.target_is_text_input)
            .find(|binding| binding.chord.matches(input))
            .map(|binding| &binding.action)
    }
}
