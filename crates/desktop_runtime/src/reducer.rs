//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use thiserror::Error;

use crate::{
    config::DesktopConfig,
    model::{
        DesktopState, DragSession, Gesture, InteractionState, PointerPosition, ResizeEdge,
        ResizeSession, Viewport, WindowId, WindowRecord, WindowRect, WindowTransition,
    },
    window_manager::{
        bring_to_front, clamp_drag, maximized_rect, next_in_cycle, release_focus, resize_rect,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Add a window record and bring it to front.
    OpenWindow {
        /// Registry key of the producing template.
        app_type: String,
        /// Resolved title.
        title: String,
        /// Initial geometry.
        rect: WindowRect,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Focus the next live window in creation order.
    CycleWindows,
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Maximize a window, or restore it when already maximized.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Start the close transition of a window.
    BeginClose {
        /// Window to close.
        window_id: WindowId,
    },
    /// Replace a window's title (e.g. after an editor saves under a new name).
    SetTitle {
        /// Window to rename.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// Remove a window whose close transition finished.
    FinishClose {
        /// Window to remove.
        window_id: WindowId,
    },
    /// Clear a finished appear/maximize transition.
    CompleteTransition {
        /// Window whose transition finished.
        window_id: WindowId,
        /// Transition that finished.
        transition: WindowTransition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the session to apply to its surface.
pub enum RuntimeEffect {
    /// A window record was added.
    WindowOpened(WindowId),
    /// A window's geometry changed.
    GeometryChanged(WindowId),
    /// Z-order or focus changed on one or more windows.
    StackChanged,
    /// A window's transition flag changed.
    TransitionChanged(WindowId),
    /// A window's title changed.
    TitleChanged(WindowId),
    /// Complete `transition` on `window_id` after `delay_ms` of virtual time.
    ScheduleTransition {
        /// Window to notify.
        window_id: WindowId,
        /// Transition to complete.
        transition: WindowTransition,
        /// Delay in virtual milliseconds.
        delay_ms: u64,
    },
    /// A window record was removed.
    WindowRemoved(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("{0} not found")]
    WindowNotFound(WindowId),
}

#[derive(Debug, Clone, Copy)]
/// Read-only inputs a transition may need besides the state itself.
pub struct ReducerEnv<'a> {
    /// Session configuration.
    pub config: &'a DesktopConfig,
    /// Current desktop viewport.
    pub viewport: Viewport,
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// Actions on a closing window, and pointer-downs that would start a second gesture, are ignored
/// and produce no effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    env: &ReducerEnv<'_>,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let config = env.config;
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow {
            app_type,
            title,
            rect,
        } => {
            let window_id = next_window_id(state);
            state.windows.push(WindowRecord {
                id: window_id,
                app_type,
                title,
                rect,
                restore_rect: None,
                z_index: 0,
                is_focused: false,
                transition: Some(WindowTransition::Appearing),
                content_error: None,
            });
            bring_to_front(state, window_id);
            effects.push(RuntimeEffect::WindowOpened(window_id));
            effects.push(RuntimeEffect::StackChanged);
            effects.push(RuntimeEffect::ScheduleTransition {
                window_id,
                transition: WindowTransition::Appearing,
                delay_ms: config.appear_delay_ms,
            });
        }
        DesktopAction::FocusWindow { window_id } => {
            if bring_to_front(state, existing_window(state, window_id)?).is_some() {
                effects.push(RuntimeEffect::StackChanged);
            }
        }
        DesktopAction::CycleWindows => {
            if let Some(window_id) = next_in_cycle(state) {
                bring_to_front(state, window_id);
                effects.push(RuntimeEffect::StackChanged);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window_id = existing_window(state, window_id)?;
            if interaction.is_idle() && bring_to_front(state, window_id).is_some() {
                interaction.gesture = Some(Gesture::Drag(DragSession {
                    window_id,
                    last_pointer: pointer,
                }));
                effects.push(RuntimeEffect::StackChanged);
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(Gesture::Drag(session)) = interaction.gesture.as_mut() {
                let dx = pointer.x.saturating_sub(session.last_pointer.x);
                let dy = pointer.y.saturating_sub(session.last_pointer.y);
                session.last_pointer = pointer;
                let window_id = session.window_id;
                let window = find_window_mut(state, window_id)?;
                if !window.is_maximized() {
                    let moved = clamp_drag(
                        window.rect.offset(dx, dy),
                        env.viewport,
                        config.drag_visible_margin,
                    );
                    if moved != window.rect {
                        window.rect = moved;
                        effects.push(RuntimeEffect::GeometryChanged(window_id));
                    }
                }
            }
        }
        DesktopAction::EndMove => {
            if matches!(interaction.gesture, Some(Gesture::Drag(_))) {
                interaction.gesture = None;
            }
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window_id = existing_window(state, window_id)?;
            let rect_start = find_window_mut(state, window_id)?.rect;
            if interaction.is_idle() && bring_to_front(state, window_id).is_some() {
                interaction.gesture = Some(Gesture::Resize(ResizeSession {
                    window_id,
                    edge,
                    pointer_start: pointer,
                    rect_start,
                }));
                effects.push(RuntimeEffect::StackChanged);
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(Gesture::Resize(session)) = interaction.gesture {
                let dx = pointer.x.saturating_sub(session.pointer_start.x);
                let dy = pointer.y.saturating_sub(session.pointer_start.y);
                let window = find_window_mut(state, session.window_id)?;
                if !window.is_maximized() {
                    let resized = resize_rect(
                        session.rect_start,
                        window.rect,
                        session.edge,
                        dx,
                        dy,
                        config.min_window_width,
                        config.min_window_height,
                    );
                    if resized != window.rect {
                        window.rect = resized;
                        effects.push(RuntimeEffect::GeometryChanged(session.window_id));
                    }
                }
            }
        }
        DesktopAction::EndResize => {
            if matches!(interaction.gesture, Some(Gesture::Resize(_))) {
                interaction.gesture = None;
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.is_closing() {
                return Ok(effects);
            }
            match window.restore_rect.take() {
                Some(restore_rect) => window.rect = restore_rect,
                None => {
                    window.restore_rect = Some(window.rect);
                    window.rect = maximized_rect(
                        env.viewport,
                        config.maximize_margin,
                        config.min_window_width,
                        config.min_window_height,
                    );
                }
            }
            window.transition = Some(WindowTransition::Maximizing);
            bring_to_front(state, window_id);
            effects.push(RuntimeEffect::GeometryChanged(window_id));
            effects.push(RuntimeEffect::StackChanged);
            effects.push(RuntimeEffect::TransitionChanged(window_id));
            effects.push(RuntimeEffect::ScheduleTransition {
                window_id,
                transition: WindowTransition::Maximizing,
                delay_ms: config.maximize_transition_ms,
            });
        }
        DesktopAction::BeginClose { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.is_closing() {
                return Ok(effects);
            }
            window.transition = Some(WindowTransition::Closing);
            if interaction.gesture.is_some_and(|g| g.window_id() == window_id) {
                interaction.gesture = None;
            }
            release_focus(state, window_id);
            effects.push(RuntimeEffect::TransitionChanged(window_id));
            effects.push(RuntimeEffect::StackChanged);
            effects.push(RuntimeEffect::ScheduleTransition {
                window_id,
                transition: WindowTransition::Closing,
                delay_ms: config.close_delay_ms,
            });
        }
        DesktopAction::SetTitle { window_id, title } => {
            let window = find_window_mut(state, window_id)?;
            if window.title != title {
                window.title = title;
                effects.push(RuntimeEffect::TitleChanged(window_id));
            }
        }
        DesktopAction::FinishClose { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            effects.push(RuntimeEffect::WindowRemoved(window_id));
        }
        DesktopAction::CompleteTransition {
            window_id,
            transition,
        } => {
            let window = find_window_mut(state, window_id)?;
            if window.transition == Some(transition) {
                window.transition = None;
                effects.push(RuntimeEffect::TransitionChanged(window_id));
            }
        }
    }

    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn existing_window(state: &DesktopState, window_id: WindowId) -> Result<WindowId, ReducerError> {
    state
        .window(window_id)
        .map(|w| w.id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}
