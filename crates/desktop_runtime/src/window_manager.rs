//! Shared window-manager transition helpers used by the desktop reducer.

use std::ops::Range;

use crate::model::{DesktopState, ResizeEdge, Viewport, WindowId, WindowRect};

/// Focuses and raises `window_id`, assigning it the next z-index.
///
/// Returns the assigned z-index, or `None` when the window is missing or closing.
pub fn bring_to_front(state: &mut DesktopState, window_id: WindowId) -> Option<u64> {
    if !state
        .windows
        .iter()
        .any(|w| w.id == window_id && !w.is_closing())
    {
        return None;
    }

    state.z_counter = state.z_counter.saturating_add(1);
    let z_index = state.z_counter;
    for window in &mut state.windows {
        window.is_focused = window.id == window_id;
        if window.is_focused {
            window.z_index = z_index;
        }
    }
    Some(z_index)
}

/// Moves focus away from a window that is closing.
///
/// The live window with the highest z-index inherits focus without being re-stacked. Returns the
/// newly focused window.
pub fn release_focus(state: &mut DesktopState, closing: WindowId) -> Option<WindowId> {
    let mut was_focused = false;
    for window in &mut state.windows {
        if window.id == closing {
            was_focused = window.is_focused;
            window.is_focused = false;
        }
    }
    if !was_focused {
        return None;
    }

    let next = state
        .windows
        .iter_mut()
        .filter(|w| !w.is_closing() && w.id != closing)
        .max_by_key(|w| w.z_index)?;
    next.is_focused = true;
    Some(next.id)
}

/// Picks the window `cycle_windows` should focus next, in creation order.
///
/// `None` means the cycle is a no-op (fewer than two live windows).
pub fn next_in_cycle(state: &DesktopState) -> Option<WindowId> {
    let live: Vec<_> = state.live_windows().collect();
    if live.len() <= 1 {
        return None;
    }
    let Some(current) = live.iter().position(|w| w.is_focused) else {
        return live.first().map(|w| w.id);
    };
    live.get((current + 1) % live.len()).map(|w| w.id)
}

/// Keeps a dragged window on screen.
///
/// `left`/`top` never go negative, and at least `min(visible_margin, size / 2)` pixels of the
/// window stay inside the viewport on the right and bottom.
pub fn clamp_drag(rect: WindowRect, viewport: Viewport, visible_margin: i32) -> WindowRect {
    let max_x = viewport.w.saturating_sub(visible_margin.min(rect.w / 2)).max(0);
    let max_y = viewport.h.saturating_sub(visible_margin.min(rect.h / 2)).max(0);
    WindowRect {
        x: rect.x.clamp(0, max_x),
        y: rect.y.clamp(0, max_y),
        ..rect
    }
}

/// Applies resize deltas for a given edge/corner drag.
///
/// `dx`/`dy` are measured from the gesture start. An axis whose new size would fall under the
/// minimum, or whose anchored edge would cross the viewport origin, keeps its `current` value.
pub fn resize_rect(
    start: WindowRect,
    current: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let candidate = match edge {
        ResizeEdge::East => WindowRect {
            w: start.w.saturating_add(dx),
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x.saturating_add(dx),
            w: start.w.saturating_sub(dx),
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h.saturating_add(dy),
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y.saturating_add(dy),
            h: start.h.saturating_sub(dy),
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y.saturating_add(dy),
            h: start.h.saturating_sub(dy),
            w: start.w.saturating_add(dx),
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x.saturating_add(dx),
            y: start.y.saturating_add(dy),
            w: start.w.saturating_sub(dx),
            h: start.h.saturating_sub(dy),
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w.saturating_add(dx),
            h: start.h.saturating_add(dy),
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x.saturating_add(dx),
            w: start.w.saturating_sub(dx),
            h: start.h.saturating_add(dy),
            ..start
        },
    };

    let mut next = current;
    if edge.changes_width() && candidate.w >= min_w && candidate.x >= 0 {
        next.x = candidate.x;
        next.w = candidate.w;
    }
    if edge.changes_height() && candidate.h >= min_h && candidate.y >= 0 {
        next.y = candidate.y;
        next.h = candidate.h;
    }
    next
}

/// Geometry of a maximized window: the viewport inset by `margin` on every side.
pub fn maximized_rect(viewport: Viewport, margin: i32, min_w: i32, min_h: i32) -> WindowRect {
    WindowRect {
        x: margin,
        y: margin,
        w: viewport.w.saturating_sub(margin.saturating_mul(2)),
        h: viewport.h.saturating_sub(margin.saturating_mul(2)),
    }
    .clamped_min(min_w, min_h)
}

/// Scattered `(left, top)` for a new window so consecutive windows do not stack exactly.
///
/// Deterministic in `seed` and `window_id`.
pub fn spawn_position(
    seed: u64,
    window_id: WindowId,
    left: &Range<i32>,
    top: &Range<i32>,
) -> (i32, i32) {
    let mixed = splitmix64(seed ^ window_id.0);
    (
        pick_in(left, mixed & 0xffff_ffff),
        pick_in(top, mixed >> 32),
    )
}

fn pick_in(range: &Range<i32>, bits: u64) -> i32 {
    let span = i64::from(range.end) - i64::from(range.start);
    if span <= 0 {
        return range.start;
    }
    let offset = (bits % span as u64) as i64;
    (i64::from(range.start) + offset) as i32
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}
