//! Shared contract types between the desktop window manager runtime and managed apps.
//!
//! An app is a [`AppTemplate`]: it names its windows, declares a default size, and fills a
//! [`ContentMount`] once per window. The runtime owns window geometry, focus, and lifecycle;
//! apps only see the mount, the merged creation options, and the injected [`AppServices`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use platform_host::VirtualFileSystem;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Caller-supplied window creation options.
///
/// Geometry fields left as `None` fall back to the template default size and the runtime's
/// spawn placement. App-specific keys (`filePath`, `code`, `imageSrc`, `content`, ...) live in
/// `params`.
pub struct WindowOptions {
    /// Top edge in pixels.
    pub top: Option<i32>,
    /// Left edge in pixels.
    pub left: Option<i32>,
    /// Width in pixels.
    pub width: Option<i32>,
    /// Height in pixels.
    pub height: Option<i32>,
    /// Explicit title overriding the template's title.
    pub title: Option<String>,
    /// App-specific parameters.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl WindowOptions {
    /// Adds an app-specific parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets an explicit position.
    pub fn at(mut self, left: i32, top: i32) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// Sets an explicit size.
    pub fn sized(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns a string parameter when present.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Creation options after defaults have been applied.
pub struct MergedWindowOptions {
    /// Top edge in pixels.
    pub top: i32,
    /// Left edge in pixels.
    pub left: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Resolved window title.
    pub title: String,
    /// App-specific parameters.
    pub params: Map<String, Value>,
}

impl MergedWindowOptions {
    /// Returns a string parameter when present.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    /// Returns a required string parameter.
    ///
    /// # Errors
    ///
    /// [`AppInitError::MissingParam`] when absent, [`AppInitError::InvalidParam`] when the value
    /// is not a string.
    pub fn require_str(&self, key: &str) -> Result<&str, AppInitError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Err(AppInitError::MissingParam(key.to_string())),
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(AppInitError::InvalidParam {
                param: key.to_string(),
                reason: "expected a string".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Content area of a single window, owned by the runtime and filled by the app.
///
/// `state` is the app's serialized per-window state; `body` is the rendered text a surface
/// shows inside the window.
pub struct ContentMount {
    /// Window that owns this mount.
    pub window_id: WindowRuntimeId,
    /// Registry key of the app that filled it.
    pub app_type: String,
    /// App-owned state.
    pub state: Value,
    /// Rendered content.
    pub body: String,
}

impl ContentMount {
    /// Creates an empty mount for a window.
    pub fn new(window_id: WindowRuntimeId, app_type: impl Into<String>) -> Self {
        Self {
            window_id,
            app_type: app_type.into(),
            state: Value::Null,
            body: String::new(),
        }
    }

    /// Deserializes the app state, returning `None` when unset or of another shape.
    pub fn load_state<T: DeserializeOwned>(&self) -> Option<T> {
        if self.state.is_null() {
            return None;
        }
        serde_json::from_value(self.state.clone()).ok()
    }

    /// Serializes and stores the app state.
    ///
    /// # Errors
    ///
    /// [`AppInitError::Failed`] when the value cannot be serialized.
    pub fn save_state<T: Serialize>(&mut self, state: &T) -> Result<(), AppInitError> {
        self.state =
            serde_json::to_value(state).map_err(|e| AppInitError::Failed(e.to_string()))?;
        Ok(())
    }

    /// Replaces the rendered content.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }
}

/// Capability-scoped services injected into app content initializers.
pub struct AppServices<'a> {
    /// Shared virtual file system.
    pub vfs: &'a mut VirtualFileSystem,
    /// Current time in unix milliseconds.
    pub now_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Read-only view of an open window handed to apps that list windows.
pub struct WindowSummary {
    /// Window id.
    pub id: WindowRuntimeId,
    /// Registry key of the app.
    pub app_type: String,
    /// Current title.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures reported by [`AppTemplate::init_content`].
pub enum AppInitError {
    /// A required creation parameter was not supplied.
    #[error("missing parameter `{0}`")]
    MissingParam(String),
    /// A creation parameter had an unusable value.
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParam {
        /// Parameter name.
        param: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Any other initialization failure.
    #[error("{0}")]
    Failed(String),
}

/// Factory for one kind of window content.
///
/// Templates are registered once under an app type and shared by every window of that type.
pub trait AppTemplate {
    /// Window title, possibly derived from the creation options.
    fn title(&self, options: &WindowOptions) -> String;

    /// Default `(width, height)` used when the caller supplies no size.
    fn default_size(&self) -> (i32, i32);

    /// Fills the window content. Called exactly once per window.
    ///
    /// # Errors
    ///
    /// Returns an error when the window cannot be initialized; the runtime keeps the window
    /// open and records the failure.
    fn init_content(
        &self,
        mount: &mut ContentMount,
        options: &MergedWindowOptions,
        services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError>;

    /// Current source text for editor-like apps.
    fn code(&self, _mount: &ContentMount) -> Option<String> {
        None
    }
}
