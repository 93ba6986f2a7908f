//! Session-level error taxonomy.

use platform_host::VfsError;
use thiserror::Error;

use crate::{model::WindowId, reducer::ReducerError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by [`crate::DesktopSession`] operations.
pub enum DesktopError {
    /// No template is registered under the requested app type.
    #[error("no window template registered for `{0}`")]
    TemplateNotFound(String),
    /// A template's content initializer failed or panicked.
    #[error("content init failed for `{app_type}`: {message}")]
    ContentInit {
        /// App type of the failing template.
        app_type: String,
        /// Failure description.
        message: String,
    },
    /// A window's content state could not be stored after an update.
    #[error("content state update failed for `{app_type}`: {message}")]
    ContentState {
        /// App type of the window.
        app_type: String,
        /// Failure description.
        message: String,
    },
    /// The window does not exist (or was already removed).
    #[error("{0} not found")]
    WindowNotFound(WindowId),
    /// Terminal operation addressed to a window of another app type.
    #[error("{0} is not a terminal")]
    NotATerminal(WindowId),
    /// Editor operation addressed to a window of another app type.
    #[error("{0} is not a code editor")]
    NotAnEditor(WindowId),
    /// The editor buffer has no file to save to.
    #[error("{0} has no file path")]
    NoFilePath(WindowId),
    /// File system failure.
    #[error(transparent)]
    Vfs(#[from] VfsError),
    /// Configuration document could not be parsed.
    #[error("invalid desktop config: {0}")]
    Config(String),
}

impl From<ReducerError> for DesktopError {
    fn from(err: ReducerError) -> Self {
        match err {
            ReducerError::WindowNotFound(window_id) => Self::WindowNotFound(window_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn state_failures_are_told_apart_from_init_failures() {
        let init = DesktopError::ContentInit {
            app_type: "terminal".to_string(),
            message: "boom".to_string(),
        };
        let state = DesktopError::ContentState {
            app_type: "terminal".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(init.to_string(), "content init failed for `terminal`: boom");
        assert_eq!(
            state.to_string(),
            "content state update failed for `terminal`: boom"
        );
    }

    #[test]
    fn reducer_errors_map_to_window_not_found() {
        assert_eq!(
            DesktopError::from(ReducerError::WindowNotFound(WindowId(4))),
            DesktopError::WindowNotFound(WindowId(4))
        );
    }
}
