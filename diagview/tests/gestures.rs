mod common;

use common::fitted;
use diagview::{Frame, GestureState, Vec2};

// 600x2000 at actual size in an 800px frame under a 1600px strict cap:
// scrolled to the top with 400px of vertical room.
fn tall_at_top() -> diagview::Viewport<common::MockFrame> {
    let mut vp = fitted(600.0, 2000.0, 800.0, 1000.0);
    vp.actual_size();
    assert_eq!(vp.frame().max_scroll().y, 400.0);
    vp
}

#[test]
fn downward_drag_at_top_scrolls_the_page() {
    let mut vp = tall_at_top();
    assert!(!vp.touch_start(&[Vec2::new(100.0, 100.0)]));
    assert!(!vp.touch_move(&[Vec2::new(100.0, 110.0)]));
    assert_eq!(vp.gestures().state(), GestureState::PageScrolling);
    assert_eq!(vp.frame().scroll, Vec2::ZERO);
}

#[test]
fn upward_drag_at_top_pans_the_frame() {
    let mut vp = tall_at_top();
    vp.touch_start(&[Vec2::new(100.0, 100.0)]);
    assert!(vp.touch_move(&[Vec2::new(100.0, 90.0)]));
    assert!(matches!(vp.gestures().state(), GestureState::Panning { .. }));
    assert_eq!(vp.frame().scroll, Vec2::new(0.0, 10.0));
    assert!(vp.touch_move(&[Vec2::new(100.0, 60.0)]));
    assert_eq!(vp.frame().scroll, Vec2::new(0.0, 40.0));
}

#[test]
fn page_scroll_mode_never_pans() {
    let mut vp = tall_at_top();
    vp.touch_start(&[Vec2::new(100.0, 100.0)]);
    vp.touch_move(&[Vec2::new(100.0, 120.0)]);
    assert!(!vp.touch_move(&[Vec2::new(100.0, 20.0)]));
    assert_eq!(vp.frame().scroll, Vec2::ZERO);
}

#[test]
fn mid_scroll_vertical_drag_pans_both_ways() {
    let mut vp = tall_at_top();
    vp.frame_mut().set_scroll_offset(Vec2::new(0.0, 200.0));
    vp.touch_start(&[Vec2::new(100.0, 100.0)]);
    assert!(vp.touch_move(&[Vec2::new(100.0, 110.0)]));
    assert_eq!(vp.frame().scroll, Vec2::new(0.0, 190.0));
}

#[test]
fn second_touch_cancels_pan_and_pinches() {
    let mut vp = tall_at_top();
    vp.touch_start(&[Vec2::new(100.0, 100.0)]);
    vp.touch_move(&[Vec2::new(100.0, 80.0)]);
    assert!(matches!(vp.gestures().state(), GestureState::Panning { .. }));

    assert!(vp.touch_start(&[Vec2::new(100.0, 80.0), Vec2::new(200.0, 80.0)]));
    assert_eq!(
        vp.gestures().state(),
        GestureState::Pinching { initial_distance: 100.0, initial_scale: 1.0 }
    );

    // a lone finger report mid-pinch must not resume panning
    let before = vp.frame().scroll;
    assert!(vp.touch_move(&[Vec2::new(100.0, 10.0)]));
    assert_eq!(vp.frame().scroll, before);

    assert!(vp.touch_move(&[Vec2::new(100.0, 80.0), Vec2::new(250.0, 80.0)]));
    assert!((vp.state().scale - 1.5).abs() < 1e-12);
}

#[test]
fn pinch_zoom_is_clamped() {
    let mut vp = tall_at_top();
    vp.touch_start(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    vp.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)]);
    assert_eq!(vp.state().scale, 3.5);
}

#[test]
fn ending_touches_returns_to_idle() {
    let mut vp = tall_at_top();
    vp.touch_start(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]);
    vp.touch_end(&[Vec2::new(100.0, 0.0)]);
    assert!(matches!(vp.gestures().state(), GestureState::Pending { .. }));
    vp.touch_end(&[]);
    assert_eq!(vp.gestures().state(), GestureState::Idle);
    vp.touch_start(&[Vec2::new(5.0, 5.0)]);
    vp.touch_cancel();
    assert_eq!(vp.gestures().state(), GestureState::Idle);
}
