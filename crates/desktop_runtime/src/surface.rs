//! Rendering seam between the window manager and a UI host.
//!
//! The runtime never touches a DOM; it tells a [`WindowSurface`] what changed. Browser hosts map
//! these calls to elements, tests use [`RecordingSurface`].

use desktop_app_contract::ContentMount;

use crate::model::{WindowId, WindowRecord, WindowRect, WindowTransition};

/// Host-side window rendering operations.
pub trait WindowSurface {
    /// A window was created. Called before its content is mounted.
    fn create_window(&mut self, window: &WindowRecord);
    /// A window moved or resized.
    fn set_geometry(&mut self, window_id: WindowId, rect: WindowRect);
    /// A window's stacking order or focus changed.
    fn set_stack(&mut self, window_id: WindowId, z_index: u64, focused: bool);
    /// A window entered or left an animated transition.
    fn set_transition(&mut self, window_id: WindowId, transition: Option<WindowTransition>);
    /// A window's title changed.
    fn set_title(&mut self, window_id: WindowId, title: &str);
    /// A window's content was (re)rendered.
    fn mount_content(&mut self, window_id: WindowId, mount: &ContentMount);
    /// A window was removed for good.
    fn destroy_window(&mut self, window_id: WindowId);
}

#[derive(Debug, Clone, Copy, Default)]
/// Surface that discards every call.
pub struct NoopSurface;

impl WindowSurface for NoopSurface {
    fn create_window(&mut self, _window: &WindowRecord) {}
    fn set_geometry(&mut self, _window_id: WindowId, _rect: WindowRect) {}
    fn set_stack(&mut self, _window_id: WindowId, _z_index: u64, _focused: bool) {}
    fn set_transition(&mut self, _window_id: WindowId, _transition: Option<WindowTransition>) {}
    fn set_title(&mut self, _window_id: WindowId, _title: &str) {}
    fn mount_content(&mut self, _window_id: WindowId, _mount: &ContentMount) {}
    fn destroy_window(&mut self, _window_id: WindowId) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One call received by a [`RecordingSurface`].
pub enum SurfaceOp {
    /// `create_window` with the initial title and geometry.
    Create {
        /// Window id.
        window_id: WindowId,
        /// Initial title.
        title: String,
        /// Initial geometry.
        rect: WindowRect,
    },
    /// `set_geometry`.
    Geometry {
        /// Window id.
        window_id: WindowId,
        /// New geometry.
        rect: WindowRect,
    },
    /// `set_stack`.
    Stack {
        /// Window id.
        window_id: WindowId,
        /// Z-index.
        z_index: u64,
        /// Focus flag.
        focused: bool,
    },
    /// `set_transition`.
    Transition {
        /// Window id.
        window_id: WindowId,
        /// Active transition.
        transition: Option<WindowTransition>,
    },
    /// `set_title`.
    Title {
        /// Window id.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// `mount_content` with the rendered body.
    Mount {
        /// Window id.
        window_id: WindowId,
        /// Rendered content.
        body: String,
    },
    /// `destroy_window`.
    Destroy {
        /// Window id.
        window_id: WindowId,
    },
}

impl SurfaceOp {
    /// Window the call addressed.
    pub fn window_id(&self) -> WindowId {
        match self {
            Self::Create { window_id, .. }
            | Self::Geometry { window_id, .. }
            | Self::Stack { window_id, .. }
            | Self::Transition { window_id, .. }
            | Self::Title { window_id, .. }
            | Self::Mount { window_id, .. }
            | Self::Destroy { window_id } => *window_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Surface that logs every call, for assertions.
pub struct RecordingSurface {
    /// Calls in arrival order.
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Calls addressed to one window.
    pub fn ops_for(&self, window_id: WindowId) -> Vec<&SurfaceOp> {
        self.ops
            .iter()
            .filter(|op| op.window_id() == window_id)
            .collect()
    }

    /// Drops the log.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl WindowSurface for RecordingSurface {
    fn create_window(&mut self, window: &WindowRecord) {
        self.ops.push(SurfaceOp::Create {
            window_id: window.id,
            title: window.title.clone(),
            rect: window.rect,
        });
    }

    fn set_geometry(&mut self, window_id: WindowId, rect: WindowRect) {
        self.ops.push(SurfaceOp::Geometry { window_id, rect });
    }

    fn set_stack(&mut self, window_id: WindowId, z_index: u64, focused: bool) {
        self.ops.push(SurfaceOp::Stack {
            window_id,
            z_index,
            focused,
        });
    }

    fn set_transition(&mut self, window_id: WindowId, transition: Option<WindowTransition>) {
        self.ops.push(SurfaceOp::Transition {
            window_id,
            transition,
        });
    }

    fn set_title(&mut self, window_id: WindowId, title: &str) {
        self.ops.push(SurfaceOp::Title {
            window_id,
            title: title.to_string(),
        });
    }

    fn mount_content(&mut self, window_id: WindowId, mount: &ContentMount) {
        self.ops.push(SurfaceOp::Mount {
            window_id,
            body: mount.body.clone(),
        });
    }

    fn destroy_window(&mut self, window_id: WindowId) {
        self.ops.push(SurfaceOp::Destroy { window_id });
    }
}
