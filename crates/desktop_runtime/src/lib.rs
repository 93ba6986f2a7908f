//! Headless desktop window manager.
//!
//! [`DesktopSession`] owns everything one desktop needs: the window records and their z-order,
//! the app template registry, per-window content mounts, the shared virtual file system, and a
//! [`WindowSurface`] it reports visual changes to. State transitions go through
//! [`reduce_desktop`]; animated transitions complete on a virtual clock.

pub mod apps;
pub mod config;
pub mod error;
pub mod keybindings;
pub mod model;
pub mod reducer;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod window_manager;

pub use config::DesktopConfig;
pub use error::DesktopError;
pub use keybindings::{KeyBinding, KeyBindings, KeyChord, KeyInput, ShortcutAction};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerEnv, ReducerError, RuntimeEffect};
pub use registry::WindowRegistry;
pub use session::DesktopSession;
pub use surface::{NoopSurface, RecordingSurface, SurfaceOp, WindowSurface};
