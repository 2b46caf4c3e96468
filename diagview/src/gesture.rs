//! Touch gesture disambiguation for a scrollable diagram frame.
//!
//! A single finger starts out [`GestureState::Pending`]. Once it travels past
//! the threshold the machine decides between panning the frame and letting
//! the page scroll natively, based on which scroll edge the frame sat at when
//! the touch began. A second finger always switches to pinch-zoom.
//!
//! The machine is pure: callers feed touch positions plus the frame's scroll
//! snapshot and apply the returned [`GestureAction`].

use crate::geometry::tolerance::{EDGE_TOLERANCE_PX, MIN_PINCH_DISTANCE};
use crate::model::Vec2;

/// Which vertical scroll edges the frame touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollEdge {
    AtTop,
    AtBottom,
    /// Content fits vertically; both edges at once.
    Both,
    None,
}

impl ScrollEdge {
    pub fn from_scroll(top: f64, max_top: f64) -> ScrollEdge {
        let at_top = top <= EDGE_TOLERANCE_PX;
        let at_bottom = top >= max_top - EDGE_TOLERANCE_PX;
        match (at_top, at_bottom) {
            (true, true) => ScrollEdge::Both,
            (true, false) => ScrollEdge::AtTop,
            (false, true) => ScrollEdge::AtBottom,
            (false, false) => ScrollEdge::None,
        }
    }

    /// Whether a vertical finger movement of `delta_y` should scroll the page.
    pub fn permits(self, delta_y: f64) -> bool {
        match self {
            ScrollEdge::AtTop => delta_y > 0.0,
            ScrollEdge::AtBottom => delta_y < 0.0,
            ScrollEdge::Both => true,
            ScrollEdge::None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Pending { start: Vec2, scroll: Vec2, edge: ScrollEdge },
    Panning { start: Vec2, scroll: Vec2 },
    PageScrolling,
    Pinching { initial_distance: f64, initial_scale: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureAction {
    None,
    ScrollTo(Vec2),
    ZoomTo(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchResponse {
    pub action: GestureAction,
    pub prevent_default: bool,
}

impl TouchResponse {
    const PASS: TouchResponse = TouchResponse { action: GestureAction::None, prevent_default: false };
    const SWALLOW: TouchResponse = TouchResponse { action: GestureAction::None, prevent_default: true };

    fn act(action: GestureAction) -> TouchResponse { TouchResponse { action, prevent_default: true } }
}

/// Frame state captured when a touch sequence (re)starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub scroll: Vec2,
    pub edge: ScrollEdge,
    pub scale: f64,
}

#[derive(Clone, Debug)]
pub struct GestureMachine {
    state: GestureState,
    threshold: f64,
}

impl GestureMachine {
    pub fn new(threshold: f64) -> GestureMachine {
        GestureMachine { state: GestureState::Idle, threshold }
    }

    pub fn state(&self) -> GestureState { self.state }

    /// `touches` holds every finger currently on the surface.
    pub fn touch_start(&mut self, touches: &[Vec2], frame: FrameSnapshot) -> TouchResponse {
        match touches {
            [] => TouchResponse::PASS,
            [only] => {
                if matches!(self.state, GestureState::Pinching { .. }) {
                    return TouchResponse::SWALLOW;
                }
                self.state = GestureState::Pending { start: *only, scroll: frame.scroll, edge: frame.edge };
                TouchResponse::PASS
            }
            [a, b, ..] => {
                self.begin_pinch(*a, *b, frame.scale);
                TouchResponse::SWALLOW
            }
        }
    }

    pub fn touch_move(&mut self, touches: &[Vec2]) -> TouchResponse {
        match self.state {
            GestureState::Idle | GestureState::PageScrolling => TouchResponse::PASS,
            GestureState::Pending { start, scroll, edge } => {
                let [pos] = touches else { return TouchResponse::PASS };
                let delta = *pos - start;
                if delta.x.abs() < self.threshold && delta.y.abs() < self.threshold {
                    return TouchResponse::PASS;
                }
                let vertical = delta.y.abs() >= delta.x.abs();
                if vertical && edge.permits(delta.y) {
                    log::trace!("touch hands off to page scroll (edge {:?})", edge);
                    self.state = GestureState::PageScrolling;
                    return TouchResponse::PASS;
                }
                self.state = GestureState::Panning { start, scroll };
                TouchResponse::act(GestureAction::ScrollTo(scroll - delta))
            }
            GestureState::Panning { start, scroll } => {
                let [pos] = touches else { return TouchResponse::SWALLOW };
                TouchResponse::act(GestureAction::ScrollTo(scroll - (*pos - start)))
            }
            GestureState::Pinching { initial_distance, initial_scale } => {
                let [a, b, ..] = touches else { return TouchResponse::SWALLOW };
                if initial_distance < MIN_PINCH_DISTANCE {
                    return TouchResponse::SWALLOW;
                }
                let distance = (*b - *a).length();
                TouchResponse::act(GestureAction::ZoomTo(initial_scale * distance / initial_distance))
            }
        }
    }

    /// `remaining` holds the fingers still down after the end event.
    pub fn touch_end(&mut self, remaining: &[Vec2], frame: FrameSnapshot) -> TouchResponse {
        match remaining {
            [] => {
                self.state = GestureState::Idle;
                TouchResponse::PASS
            }
            [only] => {
                self.state = GestureState::Pending { start: *only, scroll: frame.scroll, edge: frame.edge };
                TouchResponse::PASS
            }
            [a, b, ..] => {
                self.begin_pinch(*a, *b, frame.scale);
                TouchResponse::SWALLOW
            }
        }
    }

    pub fn cancel(&mut self) { self.state = GestureState::Idle; }

    fn begin_pinch(&mut self, a: Vec2, b: Vec2, scale: f64) {
        self.state = GestureState::Pinching { initial_distance: (b - a).length(), initial_scale: scale };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(edge: ScrollEdge) -> FrameSnapshot {
        FrameSnapshot { scroll: Vec2::new(0.0, 0.0), edge, scale: 1.0 }
    }

    #[test]
    fn edge_detection_uses_one_px_slack() {
        assert_eq!(ScrollEdge::from_scroll(0.0, 100.0), ScrollEdge::AtTop);
        assert_eq!(ScrollEdge::from_scroll(1.0, 100.0), ScrollEdge::AtTop);
        assert_eq!(ScrollEdge::from_scroll(99.5, 100.0), ScrollEdge::AtBottom);
        assert_eq!(ScrollEdge::from_scroll(50.0, 100.0), ScrollEdge::None);
        assert_eq!(ScrollEdge::from_scroll(0.0, 0.0), ScrollEdge::Both);
    }

    #[test]
    fn small_moves_stay_pending() {
        let mut g = GestureMachine::new(6.0);
        g.touch_start(&[Vec2::new(10.0, 10.0)], snap(ScrollEdge::None));
        let r = g.touch_move(&[Vec2::new(15.0, 5.5)]);
        assert_eq!(r, TouchResponse::PASS);
        assert!(matches!(g.state(), GestureState::Pending { .. }));
    }

    #[test]
    fn horizontal_move_at_top_pans() {
        let mut g = GestureMachine::new(6.0);
        g.touch_start(&[Vec2::new(50.0, 50.0)], snap(ScrollEdge::AtTop));
        let r = g.touch_move(&[Vec2::new(30.0, 55.0)]);
        assert!(r.prevent_default);
        assert_eq!(r.action, GestureAction::ScrollTo(Vec2::new(20.0, -5.0)));
        assert!(matches!(g.state(), GestureState::Panning { .. }));
    }

    #[test]
    fn page_scroll_suppresses_pan_for_rest_of_sequence() {
        let mut g = GestureMachine::new(6.0);
        g.touch_start(&[Vec2::new(50.0, 50.0)], snap(ScrollEdge::Both));
        assert_eq!(g.touch_move(&[Vec2::new(50.0, 40.0)]), TouchResponse::PASS);
        assert_eq!(g.state(), GestureState::PageScrolling);
        assert_eq!(g.touch_move(&[Vec2::new(10.0, 40.0)]), TouchResponse::PASS);
        g.touch_end(&[], snap(ScrollEdge::Both));
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn pinch_scales_from_captured_baseline() {
        let mut g = GestureMachine::new(6.0);
        let frame = FrameSnapshot { scroll: Vec2::ZERO, edge: ScrollEdge::None, scale: 1.5 };
        g.touch_start(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)], frame);
        let r = g.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)]);
        assert_eq!(r.action, GestureAction::ZoomTo(3.0));
        let r = g.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0)]);
        assert_eq!(r.action, GestureAction::ZoomTo(0.75));
    }

    #[test]
    fn degenerate_pinch_baseline_is_ignored() {
        let mut g = GestureMachine::new(6.0);
        g.touch_start(&[Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)], snap(ScrollEdge::None));
        let r = g.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(80.0, 0.0)]);
        assert_eq!(r, TouchResponse::SWALLOW);
    }

    #[test]
    fn lifting_one_pinch_finger_returns_to_pending() {
        let mut g = GestureMachine::new(6.0);
        g.touch_start(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)], snap(ScrollEdge::None));
        g.touch_end(&[Vec2::new(100.0, 0.0)], snap(ScrollEdge::AtTop));
        assert_eq!(
            g.state(),
            GestureState::Pending { start: Vec2::new(100.0, 0.0), scroll: Vec2::ZERO, edge: ScrollEdge::AtTop }
        );
    }
}
