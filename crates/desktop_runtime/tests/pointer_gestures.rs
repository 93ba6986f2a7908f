use desktop_app_contract::WindowOptions;
use desktop_runtime::{
    DesktopSession, PointerPosition, PointerTarget, ResizeEdge, Viewport, WindowId, WindowRect,
};
use pretty_assertions::assert_eq;

const VIEWPORT: Viewport = Viewport { w: 1024, h: 768 };

fn at(x: i32, y: i32) -> PointerPosition {
    PointerPosition { x, y }
}

fn desktop_with_window(rect: WindowRect) -> (DesktopSession, WindowId) {
    let mut desktop = DesktopSession::headless();
    desktop.set_viewport(VIEWPORT);
    let id = desktop
        .create_window(
            "notepad",
            WindowOptions::default().at(rect.x, rect.y).sized(rect.w, rect.h),
        )
        .expect("window");
    (desktop, id)
}

fn rect_of(desktop: &DesktopSession, id: WindowId) -> WindowRect {
    desktop.state().window(id).expect("window").rect
}

#[test]
fn drag_never_leaves_the_viewport() {
    let targets = [
        at(-10_000, -10_000),
        at(10_000, 10_000),
        at(-3, 900),
        at(2_000, -50),
        at(500, 400),
    ];
    for target in targets {
        let (mut desktop, id) = desktop_with_window(WindowRect {
            x: 200,
            y: 150,
            w: 300,
            h: 200,
        });
        desktop
            .pointer_down(id, PointerTarget::TitleBar, at(250, 160))
            .expect("begin drag");
        desktop.pointer_move(at(250 + target.x / 2, 160 + target.y / 2));
        desktop.pointer_move(target);
        desktop.pointer_up();

        let rect = rect_of(&desktop, id);
        assert!(rect.x >= 0 && rect.y >= 0, "{rect:?}");
        assert!(rect.x <= VIEWPORT.w - 100, "{rect:?}");
        assert!(rect.y <= VIEWPORT.h - 100, "{rect:?}");
        assert_eq!((rect.w, rect.h), (300, 200));
    }
}

#[test]
fn drag_follows_pointer_deltas() {
    let (mut desktop, id) = desktop_with_window(WindowRect {
        x: 100,
        y: 100,
        w: 300,
        h: 200,
    });
    desktop
        .pointer_down(id, PointerTarget::TitleBar, at(110, 105))
        .expect("begin drag");
    desktop.pointer_move(at(130, 125));
    desktop.pointer_move(at(160, 115));
    desktop.pointer_up();
    desktop.pointer_move(at(900, 700));

    assert_eq!(
        rect_of(&desktop, id),
        WindowRect {
            x: 150,
            y: 110,
            w: 300,
            h: 200
        }
    );
    assert!(desktop.interaction().is_idle());
}

#[test]
fn shrinking_from_any_handle_respects_minimum_size() {
    for edge in ResizeEdge::ALL {
        let start = WindowRect {
            x: 300,
            y: 250,
            w: 320,
            h: 240,
        };
        let (mut desktop, id) = desktop_with_window(start);
        desktop
            .pointer_down(id, PointerTarget::ResizeHandle(edge), at(500, 400))
            .expect("begin resize");

        let (sx, sy) = match edge {
            ResizeEdge::North => (0, 1),
            ResizeEdge::South => (0, -1),
            ResizeEdge::East => (-1, 0),
            ResizeEdge::West => (1, 0),
            ResizeEdge::NorthEast => (-1, 1),
            ResizeEdge::NorthWest => (1, 1),
            ResizeEdge::SouthEast => (-1, -1),
            ResizeEdge::SouthWest => (1, -1),
        };
        for step in 1..=40 {
            desktop.pointer_move(at(500 + sx * step * 10, 400 + sy * step * 10));
            let rect = rect_of(&desktop, id);
            assert!(rect.w >= 200 && rect.h >= 150, "{edge:?} {rect:?}");
        }
        desktop.pointer_up();

        let rect = rect_of(&desktop, id);
        if edge.moves_left() {
            assert_eq!(rect.x + rect.w, start.x + start.w, "{edge:?} right edge anchored");
        }
        if edge.moves_top() {
            assert_eq!(rect.y + rect.h, start.y + start.h, "{edge:?} bottom edge anchored");
        }
    }
}

#[test]
fn growing_resize_tracks_start_snapshot() {
    let (mut desktop, id) = desktop_with_window(WindowRect {
        x: 100,
        y: 100,
        w: 300,
        h: 200,
    });
    desktop
        .pointer_down(
            id,
            PointerTarget::ResizeHandle(ResizeEdge::SouthEast),
            at(400, 300),
        )
        .expect("begin resize");
    desktop.pointer_move(at(450, 320));
    desktop.pointer_move(at(460, 330));
    desktop.pointer_up();

    assert_eq!(
        rect_of(&desktop, id),
        WindowRect {
            x: 100,
            y: 100,
            w: 360,
            h: 230
        }
    );
}

#[test]
fn only_one_gesture_runs_at_a_time() {
    let mut desktop = DesktopSession::headless();
    desktop.set_viewport(VIEWPORT);
    let dragged = desktop
        .create_window("notepad", WindowOptions::default().at(100, 100))
        .expect("first");
    let other = desktop
        .create_window("notepad", WindowOptions::default().at(400, 300))
        .expect("second");
    let other_rect = rect_of(&desktop, other);

    desktop
        .pointer_down(dragged, PointerTarget::TitleBar, at(0, 0))
        .expect("drag");
    desktop
        .pointer_down(
            other,
            PointerTarget::ResizeHandle(ResizeEdge::East),
            at(0, 0),
        )
        .expect("ignored resize");
    desktop.pointer_move(at(30, 40));
    desktop.pointer_up();

    assert_eq!(rect_of(&desktop, other), other_rect);
    assert_eq!(rect_of(&desktop, dragged).x, 130);
    assert_eq!(desktop.state().focused_window_id(), Some(dragged));
}

#[test]
fn closing_the_dragged_window_ends_the_drag() {
    let (mut desktop, id) = desktop_with_window(WindowRect {
        x: 100,
        y: 100,
        w: 300,
        h: 200,
    });
    desktop
        .pointer_down(id, PointerTarget::TitleBar, at(0, 0))
        .expect("drag");
    desktop.close_window(id).expect("close");
    assert!(desktop.interaction().is_idle());
    desktop.pointer_move(at(50, 50));
    assert_eq!(rect_of(&desktop, id).x, 100);
}

#[test]
fn undersized_window_is_raised_to_minimum_and_stays_resizable() {
    let (mut desktop, id) = desktop_with_window(WindowRect {
        x: 150,
        y: 100,
        w: 100,
        h: 100,
    });
    assert_eq!(
        rect_of(&desktop, id),
        WindowRect {
            x: 150,
            y: 100,
            w: 200,
            h: 150
        }
    );
    assert_eq!(desktop.mount(id).map(|m| m.app_type.as_str()), Some("notepad"));

    desktop
        .pointer_down(
            id,
            PointerTarget::ResizeHandle(ResizeEdge::SouthEast),
            at(350, 250),
        )
        .expect("begin resize");
    desktop.pointer_move(at(400, 280));
    desktop.pointer_up();

    assert_eq!(
        rect_of(&desktop, id),
        WindowRect {
            x: 150,
            y: 100,
            w: 250,
            h: 180
        }
    );
}

#[test]
fn extreme_pointer_coordinates_do_not_overflow() {
    let (mut desktop, id) = desktop_with_window(WindowRect {
        x: 100,
        y: 100,
        w: 300,
        h: 200,
    });
    desktop
        .pointer_down(id, PointerTarget::TitleBar, at(i32::MIN, i32::MIN))
        .expect("begin drag");
    desktop.pointer_move(at(i32::MAX, i32::MAX));
    desktop.pointer_up();
    let rect = rect_of(&desktop, id);
    assert_eq!((rect.x, rect.y), (VIEWPORT.w - 100, VIEWPORT.h - 100));

    desktop
        .pointer_down(
            id,
            PointerTarget::ResizeHandle(ResizeEdge::NorthWest),
            at(i32::MAX, i32::MAX),
        )
        .expect("begin resize");
    desktop.pointer_move(at(i32::MIN, i32::MIN));
    desktop.pointer_up();
    assert_eq!(rect_of(&desktop, id), rect);
}
