//! Owned desktop context: state, registry, surface, VFS, and virtual clock for one session.

use std::{
    collections::BTreeMap,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use desktop_app_contract::{
    AppServices, AppTemplate, ContentMount, MergedWindowOptions, WindowOptions, WindowSummary,
};
use desktop_app_terminal::{
    CommandContext, Completion, HistoryDirection, TerminalApp, TerminalEffect, TERMINAL_APP_TYPE,
};
use platform_host::{
    resolve_virtual_path, Clock, SaveStatus, SystemClock, VfsError, VirtualFileSystem,
};

use crate::{
    apps::{register_builtin_apps, CodeEditorState, CODE_EDITOR_APP_TYPE},
    config::DesktopConfig,
    error::DesktopError,
    keybindings::{KeyInput, ShortcutAction},
    model::{
        DesktopState, Gesture, InteractionState, PointerPosition, PointerTarget, Viewport, WindowId,
        WindowRect, WindowTransition,
    },
    reducer::{reduce_desktop, DesktopAction, ReducerEnv, RuntimeEffect},
    registry::WindowRegistry,
    scheduler::TransitionScheduler,
    surface::{NoopSurface, WindowSurface},
    window_manager::spawn_position,
};

/// One desktop: windows, their content, the shared VFS, and the surface they render to.
///
/// All timing is virtual; call [`DesktopSession::advance_time`] to let transitions finish.
pub struct DesktopSession<S: WindowSurface = NoopSurface> {
    config: DesktopConfig,
    viewport: Viewport,
    registry: WindowRegistry,
    state: DesktopState,
    interaction: InteractionState,
    scheduler: TransitionScheduler,
    mounts: BTreeMap<WindowId, ContentMount>,
    vfs: VirtualFileSystem,
    clock: Rc<dyn Clock>,
    surface: S,
}

impl DesktopSession<NoopSurface> {
    /// Session with default config, an in-memory VFS, and no surface.
    pub fn headless() -> Self {
        Self::new(
            DesktopConfig::default(),
            VirtualFileSystem::in_memory(),
            NoopSurface,
        )
    }
}

impl<S: WindowSurface> DesktopSession<S> {
    /// Creates a session with the built-in apps registered.
    pub fn new(config: DesktopConfig, vfs: VirtualFileSystem, surface: S) -> Self {
        let mut registry = WindowRegistry::default();
        register_builtin_apps(&mut registry);
        Self {
            state: DesktopState::with_initial_z(config.initial_z_index),
            config,
            viewport: Viewport::default(),
            registry,
            interaction: InteractionState::default(),
            scheduler: TransitionScheduler::default(),
            mounts: BTreeMap::new(),
            vfs,
            clock: Rc::new(SystemClock),
            surface,
        }
    }

    /// Replaces the wall clock apps see (`date`, timestamps handed to templates).
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// Window records, z counter, and next id.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// The active drag or resize, if any.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Desktop area windows are clamped and maximized against.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the desktop area after a host resize. Existing windows keep their geometry.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Registered templates.
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Registers (or replaces) a template.
    pub fn register_app(&mut self, app_type: impl Into<String>, template: Rc<dyn AppTemplate>) {
        self.registry.register(app_type, template);
    }

    /// Shared file system.
    pub fn vfs(&self) -> &VirtualFileSystem {
        &self.vfs
    }

    /// Shared file system, for host-side edits outside any window.
    pub fn vfs_mut(&mut self) -> &mut VirtualFileSystem {
        &mut self.vfs
    }

    /// Surface the session renders to.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface, e.g. to clear a recording.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Rendered content of a window; `None` once the window is removed.
    pub fn mount(&self, window_id: WindowId) -> Option<&ContentMount> {
        self.mounts.get(&window_id)
    }

    /// Whether an appear, maximize, or close transition is still waiting for virtual time.
    pub fn has_pending_transitions(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Live (not closing) windows in creation order.
    pub fn windows(&self) -> Vec<WindowSummary> {
        self.state.live_windows().map(|w| w.summary()).collect()
    }

    /// Opens a window, logging and swallowing a template miss.
    pub fn create_window(&mut self, app_type: &str, options: WindowOptions) -> Option<WindowId> {
        match self.try_create_window(app_type, options) {
            Ok(window_id) => Some(window_id),
            Err(err) => {
                tracing::warn!(%app_type, error = %err, "window not created");
                None
            }
        }
    }

    /// Opens a window of `app_type`.
    ///
    /// Geometry comes from `options`, then the template's default size, then the config; sizes
    /// below the configured minimum are raised to it. The position is scattered inside the
    /// configured spawn ranges. The template's content
    /// initializer runs exactly once; its failure (or panic) is recorded on the window, which
    /// stays open.
    ///
    /// # Errors
    ///
    /// [`DesktopError::TemplateNotFound`] when no template is registered; nothing is created.
    pub fn try_create_window(
        &mut self,
        app_type: &str,
        options: WindowOptions,
    ) -> Result<WindowId, DesktopError> {
        let template = self.registry.lookup(app_type)?;

        let (default_w, default_h) = match template.default_size() {
            (w, h) if w > 0 && h > 0 => (w, h),
            _ => (
                self.config.default_window_width,
                self.config.default_window_height,
            ),
        };
        let (spawn_left, spawn_top) = spawn_position(
            self.config.spawn_seed,
            WindowId(self.state.next_window_id),
            &self.config.spawn_left,
            &self.config.spawn_top,
        );
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| template.title(&options));
        let rect = WindowRect {
            x: options.left.unwrap_or(spawn_left),
            y: options.top.unwrap_or(spawn_top),
            w: options.width.unwrap_or(default_w),
            h: options.height.unwrap_or(default_h),
        }
        .clamped_min(
            self.config.min_window_width,
            self.config.min_window_height,
        );
        let merged = MergedWindowOptions {
            top: rect.y,
            left: rect.x,
            width: rect.w,
            height: rect.h,
            title: title.clone(),
            params: options.params,
        };

        let window_id = WindowId(self.state.next_window_id);
        self.dispatch(DesktopAction::OpenWindow {
            app_type: app_type.to_string(),
            title,
            rect,
        })?;
        tracing::debug!(%window_id, %app_type, "window created");

        let mut mount = ContentMount::new(window_id.0, app_type);
        if let Err(err) = self.init_content(template.as_ref(), &mut mount, &merged) {
            tracing::warn!(%window_id, error = %err, "window content failed to initialize");
            if let Some(window) = self.state.windows.iter_mut().find(|w| w.id == window_id) {
                window.content_error = Some(err.to_string());
            }
        }
        self.surface.mount_content(window_id, &mount);
        self.mounts.insert(window_id, mount);
        Ok(window_id)
    }

    fn init_content(
        &mut self,
        template: &dyn AppTemplate,
        mount: &mut ContentMount,
        merged: &MergedWindowOptions,
    ) -> Result<(), DesktopError> {
        let mut services = AppServices {
            vfs: &mut self.vfs,
            now_ms: self.clock.now_ms(),
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            template.init_content(mount, merged, &mut services)
        }));
        let message = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "content initializer panicked".to_string()),
        };
        Err(DesktopError::ContentInit {
            app_type: mount.app_type.clone(),
            message,
        })
    }

    /// Starts closing a window. Closing an already-closing window does nothing.
    ///
    /// The record, its content, and its surface window are removed once
    /// `close_delay_ms` of virtual time has passed.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] for an unknown or already removed window.
    pub fn close_window(&mut self, window_id: WindowId) -> Result<(), DesktopError> {
        self.dispatch(DesktopAction::BeginClose { window_id })?;
        Ok(())
    }

    /// Focuses and raises a window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] for an unknown window.
    pub fn bring_to_front(&mut self, window_id: WindowId) -> Result<(), DesktopError> {
        self.dispatch(DesktopAction::FocusWindow { window_id })?;
        Ok(())
    }

    /// Focuses the next window in creation order, wrapping around.
    pub fn cycle_windows(&mut self) {
        if let Err(err) = self.dispatch(DesktopAction::CycleWindows) {
            tracing::warn!(error = %err, "cycle windows failed");
        }
    }

    /// Maximizes or restores a window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] for an unknown window.
    pub fn toggle_maximize(&mut self, window_id: WindowId) -> Result<(), DesktopError> {
        self.dispatch(DesktopAction::ToggleMaximize { window_id })?;
        Ok(())
    }

    /// Routes a pointer-down on part of a window's chrome.
    ///
    /// Title bars start a drag, resize handles start a resize, the body focuses, and control
    /// buttons are left to the host.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] for an unknown window.
    pub fn pointer_down(
        &mut self,
        window_id: WindowId,
        target: PointerTarget,
        pointer: PointerPosition,
    ) -> Result<(), DesktopError> {
        let action = match target {
            PointerTarget::TitleBar => DesktopAction::BeginMove { window_id, pointer },
            PointerTarget::ResizeHandle(edge) => DesktopAction::BeginResize {
                window_id,
                edge,
                pointer,
            },
            PointerTarget::Body => DesktopAction::FocusWindow { window_id },
            PointerTarget::ControlButton => return Ok(()),
        };
        self.dispatch(action)?;
        Ok(())
    }

    /// Feeds a pointer move to the active gesture, if any.
    pub fn pointer_move(&mut self, pointer: PointerPosition) {
        let action = match self.interaction.gesture {
            Some(Gesture::Drag(_)) => DesktopAction::UpdateMove { pointer },
            Some(Gesture::Resize(_)) => DesktopAction::UpdateResize { pointer },
            None => return,
        };
        if let Err(err) = self.dispatch(action) {
            tracing::warn!(error = %err, "pointer move dropped");
        }
    }

    /// Ends the active gesture, if any.
    pub fn pointer_up(&mut self) {
        let action = match self.interaction.gesture {
            Some(Gesture::Drag(_)) => DesktopAction::EndMove,
            Some(Gesture::Resize(_)) => DesktopAction::EndResize,
            None => return,
        };
        if let Err(err) = self.dispatch(action) {
            tracing::warn!(error = %err, "pointer up dropped");
        }
    }

    /// Double-click on a title bar.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] for an unknown window.
    pub fn double_click_title(&mut self, window_id: WindowId) -> Result<(), DesktopError> {
        self.toggle_maximize(window_id)
    }

    /// Runs the shortcut bound to `input`. Returns whether a binding matched.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        let Some(action) = self.config.keybindings.resolve(input).cloned() else {
            return false;
        };
        match action {
            ShortcutAction::CycleWindows => self.cycle_windows(),
            ShortcutAction::OpenApp(app_type) => {
                self.create_window(&app_type, WindowOptions::default());
            }
            ShortcutAction::CloseFocusedWindow => {
                if let Some(window_id) = self.state.focused_window_id() {
                    if let Err(err) = self.close_window(window_id) {
                        tracing::warn!(error = %err, "close shortcut failed");
                    }
                }
            }
        }
        true
    }

    /// Advances virtual time and completes every transition that became due.
    pub fn advance_time(&mut self, delta_ms: u64) {
        for due in self.scheduler.advance(delta_ms) {
            let action = match due.transition {
                WindowTransition::Closing => DesktopAction::FinishClose {
                    window_id: due.window_id,
                },
                transition => DesktopAction::CompleteTransition {
                    window_id: due.window_id,
                    transition,
                },
            };
            if let Err(err) = self.dispatch(action) {
                tracing::debug!(window_id = %due.window_id, error = %err, "stale transition");
            }
        }
    }

    /// Runs one line in a terminal window and opens any windows it asks for.
    ///
    /// Returns the ids of windows opened by the command.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NotATerminal`] when `window_id` is not a terminal,
    /// [`DesktopError::ContentState`] when the terminal state cannot be stored.
    pub fn run_terminal_command(
        &mut self,
        window_id: WindowId,
        line: &str,
    ) -> Result<Vec<WindowId>, DesktopError> {
        let windows = self.windows();
        let now_ms = self.clock.now_ms();
        let mount = terminal_mount(&mut self.mounts, window_id)?;
        let mut ctx = CommandContext {
            vfs: &mut self.vfs,
            windows: &windows,
            now_ms,
        };
        let effects =
            TerminalApp::submit(mount, line, &mut ctx).map_err(|e| DesktopError::ContentState {
                app_type: TERMINAL_APP_TYPE.to_string(),
                message: e.to_string(),
            })?;
        self.surface.mount_content(window_id, mount);

        let mut opened = Vec::new();
        for effect in effects {
            if let TerminalEffect::OpenWindow { app_type, options } = effect {
                opened.extend(self.create_window(&app_type, options));
            }
        }
        Ok(opened)
    }

    /// Moves a terminal's history cursor; returns the line to place in its input.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NotATerminal`] when `window_id` is not a terminal.
    pub fn terminal_recall(
        &mut self,
        window_id: WindowId,
        direction: HistoryDirection,
    ) -> Result<Option<String>, DesktopError> {
        let mount = terminal_mount(&mut self.mounts, window_id)?;
        TerminalApp::recall(mount, direction).map_err(|e| DesktopError::ContentState {
            app_type: TERMINAL_APP_TYPE.to_string(),
            message: e.to_string(),
        })
    }

    /// Tab-completes `input` in a terminal window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NotATerminal`] when `window_id` is not a terminal.
    pub fn terminal_complete(
        &mut self,
        window_id: WindowId,
        input: &str,
    ) -> Result<Completion, DesktopError> {
        let mount = terminal_mount(&mut self.mounts, window_id)?;
        Ok(TerminalApp::complete(mount, input, &self.vfs))
    }

    /// Source text of an editor-like window.
    pub fn code_for(&self, window_id: WindowId) -> Option<String> {
        let mount = self.mounts.get(&window_id)?;
        self.registry.lookup(&mount.app_type).ok()?.code(mount)
    }

    /// Replaces a code editor's buffer and writes it to the editor's file.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NotAnEditor`] for other windows, [`DesktopError::NoFilePath`] for an
    /// untitled buffer (use [`DesktopSession::save_editor_buffer_as`]), [`DesktopError::Vfs`]
    /// when the write fails.
    pub fn save_editor_buffer(
        &mut self,
        window_id: WindowId,
        code: &str,
    ) -> Result<SaveStatus, DesktopError> {
        let state = self.editor_state(window_id)?;
        let path = state.file_path.ok_or(DesktopError::NoFilePath(window_id))?;
        self.write_editor_buffer(window_id, path, code)
    }

    /// Writes a code editor's buffer to `path` and makes it the editor's file.
    ///
    /// `path` is resolved against `/`. The window title becomes the file name. An existing file
    /// other than the editor's own is only replaced when `overwrite` is set.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NotAnEditor`] for other windows, [`DesktopError::Vfs`] with
    /// [`VfsError::AlreadyExists`] when `path` names another existing file and `overwrite` is
    /// false, or with the write failure.
    pub fn save_editor_buffer_as(
        &mut self,
        window_id: WindowId,
        path: &str,
        code: &str,
        overwrite: bool,
    ) -> Result<SaveStatus, DesktopError> {
        let state = self.editor_state(window_id)?;
        let path = resolve_virtual_path(path, "/");
        let is_own_file = state.file_path.as_deref() == Some(path.as_str());
        if !overwrite && !is_own_file && self.vfs.exists(&path) {
            return Err(VfsError::AlreadyExists { path }.into());
        }
        self.write_editor_buffer(window_id, path, code)
    }

    fn editor_state(&self, window_id: WindowId) -> Result<CodeEditorState, DesktopError> {
        self.mounts
            .get(&window_id)
            .filter(|mount| mount.app_type == CODE_EDITOR_APP_TYPE)
            .map(|mount| mount.load_state().unwrap_or_default())
            .ok_or(DesktopError::NotAnEditor(window_id))
    }

    fn write_editor_buffer(
        &mut self,
        window_id: WindowId,
        path: String,
        code: &str,
    ) -> Result<SaveStatus, DesktopError> {
        let status = self.vfs.write_file(&path, code)?;
        tracing::debug!(%window_id, %path, ?status, "editor buffer saved");

        let title = path.rsplit('/').next().unwrap_or_default().to_string();
        let state = CodeEditorState {
            file_path: Some(path),
            code: code.to_string(),
        };
        let mount = self
            .mounts
            .get_mut(&window_id)
            .ok_or(DesktopError::NotAnEditor(window_id))?;
        mount
            .save_state(&state)
            .map_err(|e| DesktopError::ContentState {
                app_type: CODE_EDITOR_APP_TYPE.to_string(),
                message: e.to_string(),
            })?;
        mount.set_body(code);
        self.surface.mount_content(window_id, mount);
        self.dispatch(DesktopAction::SetTitle { window_id, title })?;
        Ok(status)
    }

    fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, DesktopError> {
        let env = ReducerEnv {
            config: &self.config,
            viewport: self.viewport,
        };
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, &env, action)?;
        self.apply_effects(&effects);
        Ok(effects)
    }

    fn apply_effects(&mut self, effects: &[RuntimeEffect]) {
        for effect in effects {
            match effect {
                RuntimeEffect::WindowOpened(window_id) => {
                    if let Some(window) = self.state.window(*window_id) {
                        self.surface.create_window(window);
                        self.surface
                            .set_transition(*window_id, window.transition);
                    }
                }
                RuntimeEffect::GeometryChanged(window_id) => {
                    if let Some(window) = self.state.window(*window_id) {
                        self.surface.set_geometry(*window_id, window.rect);
                    }
                }
                RuntimeEffect::StackChanged => {
                    for window in &self.state.windows {
                        self.surface
                            .set_stack(window.id, window.z_index, window.is_focused);
                    }
                }
                RuntimeEffect::TransitionChanged(window_id) => {
                    if let Some(window) = self.state.window(*window_id) {
                        self.surface.set_transition(*window_id, window.transition);
                    }
                }
                RuntimeEffect::TitleChanged(window_id) => {
                    if let Some(window) = self.state.window(*window_id) {
                        self.surface.set_title(*window_id, &window.title);
                    }
                }
                RuntimeEffect::ScheduleTransition {
                    window_id,
                    transition,
                    delay_ms,
                } => self.scheduler.schedule(*window_id, *transition, *delay_ms),
                RuntimeEffect::WindowRemoved(window_id) => {
                    self.scheduler.cancel_window(*window_id);
                    self.mounts.remove(window_id);
                    self.surface.destroy_window(*window_id);
                    tracing::debug!(%window_id, "window removed");
                }
            }
        }
    }
}

fn terminal_mount(
    mounts: &mut BTreeMap<WindowId, ContentMount>,
    window_id: WindowId,
) -> Result<&mut ContentMount, DesktopError> {
    mounts
        .get_mut(&window_id)
        .filter(|mount| mount.app_type == TERMINAL_APP_TYPE)
        .ok_or(DesktopError::NotATerminal(window_id))
}
