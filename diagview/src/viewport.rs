//! Zoom, pan and fit policy for one rendered diagram inside a [`Frame`].

use serde::Serialize;

use crate::config::ViewportConfig;
use crate::drag::DragState;
use crate::error::AttachError;
use crate::frame::Frame;
use crate::geometry::tolerance::{
    approx_eq, clamp, safe_div, ACTUAL_OVERFLOW_PX, ACTUAL_SCALE_EPS, FIT_HORIZONTAL_PADDING,
    HEIGHT_BUDGET, NAV_MIN_OVERFLOW_PX, NEAR_FIT_SCALE, REDUCED_SCALE, SCALE_EPS,
};
use crate::gesture::{FrameSnapshot, GestureAction, GestureMachine, ScrollEdge, TouchResponse};
use crate::model::{Size, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub scale: f64,
    pub fit_scale: f64,
    pub default_scale: f64,
    pub height_cap: f64,
    /// Frame height is capped relative to the image instead of the window.
    pub strict_height_cap: bool,
    pub min_scale: f64,
    pub max_scale: f64,
}

// Wheel zoom recomputes from an anchor instead of compounding per tick.
#[derive(Clone, Copy, Debug)]
struct WheelSession {
    anchor: f64,
    zoom_in_ticks: i32,
    zoom_out_ticks: i32,
    last: f64,
}

pub struct Viewport<F: Frame> {
    frame: F,
    base: Size,
    config: ViewportConfig,
    state: ViewportState,
    gestures: GestureMachine,
    drag: DragState,
    wheel: Option<WheelSession>,
    toolbar_hidden: bool,
}

impl<F: Frame> Viewport<F> {
    /// Binds `frame` to an image with intrinsic size `base`. Call [`fit`](Self::fit)
    /// once the frame has been laid out.
    pub fn new(frame: F, base: Size, config: ViewportConfig) -> Result<Viewport<F>, AttachError> {
        if !base.is_positive() {
            return Err(AttachError::ZeroDimension { width: base.width, height: base.height });
        }
        let state = ViewportState {
            scale: 1.0,
            fit_scale: 1.0,
            default_scale: 1.0,
            height_cap: f64::INFINITY,
            strict_height_cap: false,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        };
        Ok(Viewport {
            frame,
            base,
            gestures: GestureMachine::new(config.touch_threshold),
            config,
            state,
            drag: DragState::default(),
            wheel: None,
            toolbar_hidden: false,
        })
    }

    pub fn state(&self) -> &ViewportState { &self.state }
    pub fn base(&self) -> Size { self.base }
    pub fn frame(&self) -> &F { &self.frame }
    pub fn frame_mut(&mut self) -> &mut F { &mut self.frame }
    pub fn gestures(&self) -> &GestureMachine { &self.gestures }
    pub fn toolbar_hidden(&self) -> bool { self.toolbar_hidden }
    pub fn is_dragging(&self) -> bool { self.drag.is_dragging() }

    /// Chooses the baseline scale for the current frame width and window height,
    /// applies it and scrolls back to the origin.
    pub fn fit(&mut self) {
        let client_width = self.frame.client_width();
        let available = (client_width - FIT_HORIZONTAL_PADDING * 2.0).max(1.0);
        let fit_scale = self.clamp_scale((available / self.base.width).min(1.0));
        self.state.fit_scale = fit_scale;

        let overflow_at_actual = self.base.width - client_width;
        let starts_at_actual = fit_scale >= NEAR_FIT_SCALE && overflow_at_actual <= ACTUAL_OVERFLOW_PX;
        let mut target = if starts_at_actual { 1.0 } else { fit_scale };

        let window_height = self.frame.viewport_height();
        self.state.strict_height_cap = false;
        if starts_at_actual && window_height > 0.0 && self.base.height > window_height * HEIGHT_BUDGET {
            target = self.clamp_scale(REDUCED_SCALE);
            self.state.strict_height_cap = true;
        }
        log::debug!(
            "fit {}x{}: fit scale {:.3}, baseline {:.3}, strict cap {}",
            self.base.width, self.base.height, fit_scale, target, self.state.strict_height_cap
        );

        self.state.default_scale = target;
        self.state.height_cap = self.height_cap();
        self.wheel = None;
        self.apply_scale(target, false);
        self.frame.set_scroll_offset(Vec2::ZERO);
    }

    pub fn zoom_in(&mut self) {
        self.wheel = None;
        self.apply_scale(self.state.scale * self.config.zoom_step, true);
    }

    pub fn zoom_out(&mut self) {
        self.wheel = None;
        self.apply_scale(self.state.scale / self.config.zoom_step, true);
    }

    /// Center-preserving zoom to an explicit scale (clamped).
    pub fn zoom_to(&mut self, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        self.wheel = None;
        self.apply_scale(scale, true);
    }

    pub fn actual_size(&mut self) {
        self.wheel = None;
        self.apply_scale(1.0, false);
        self.frame.set_scroll_offset(Vec2::ZERO);
    }

    /// Handles a wheel tick. Returns whether the event was consumed; plain
    /// wheel events are left to scroll the frame.
    pub fn wheel(&mut self, delta_y: f64, zoom_modifier: bool) -> bool {
        if !zoom_modifier || delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let scale = self.state.scale;
        let mut session = match self.wheel {
            Some(s) if approx_eq(s.last, scale, f64::EPSILON * 8.0) => s,
            _ => WheelSession { anchor: scale, zoom_in_ticks: 0, zoom_out_ticks: 0, last: scale },
        };
        if delta_y < 0.0 {
            session.zoom_in_ticks += 1;
        } else {
            session.zoom_out_ticks += 1;
        }
        let target = session.anchor
            * self.config.wheel_zoom_in.powi(session.zoom_in_ticks)
            * self.config.wheel_zoom_out.powi(session.zoom_out_ticks);
        self.apply_scale(target, true);
        let applied = self.state.scale;
        self.wheel = Some(if applied == target {
            WheelSession { last: applied, ..session }
        } else {
            // clamped: re-anchor so reversing direction responds immediately
            WheelSession { anchor: applied, zoom_in_ticks: 0, zoom_out_ticks: 0, last: applied }
        });
        true
    }

    /// Returns whether a drag started (the caller should prevent default).
    pub fn mouse_down(&mut self, button: i16, pointer: Vec2) -> bool {
        let scroll = self.frame.scroll_offset();
        self.drag.press(button, pointer, scroll)
    }

    pub fn mouse_move(&mut self, pointer: Vec2) {
        if let Some(scroll) = self.drag.scroll_for(pointer) {
            self.frame.set_scroll_offset(scroll);
        }
    }

    pub fn mouse_up(&mut self) -> bool { self.drag.release() }

    pub fn touch_start(&mut self, touches: &[Vec2]) -> bool {
        let snapshot = self.snapshot();
        let response = self.gestures.touch_start(touches, snapshot);
        self.apply_touch(response)
    }

    pub fn touch_move(&mut self, touches: &[Vec2]) -> bool {
        let response = self.gestures.touch_move(touches);
        self.apply_touch(response)
    }

    pub fn touch_end(&mut self, remaining: &[Vec2]) -> bool {
        let snapshot = self.snapshot();
        let response = self.gestures.touch_end(remaining, snapshot);
        self.apply_touch(response)
    }

    pub fn touch_cancel(&mut self) { self.gestures.cancel(); }

    /// Window resize: re-derive the height cap and frame height for the
    /// current scale. The scale itself is kept.
    pub fn resize(&mut self) {
        self.state.height_cap = self.height_cap();
        self.update_frame_height();
        self.update_toolbar();
    }

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            scroll: self.frame.scroll_offset(),
            edge: ScrollEdge::from_scroll(self.frame.scroll_offset().y, self.frame.max_scroll().y),
            scale: self.state.scale,
        }
    }

    fn apply_touch(&mut self, response: TouchResponse) -> bool {
        match response.action {
            GestureAction::None => {}
            GestureAction::ScrollTo(offset) => self.frame.set_scroll_offset(offset),
            GestureAction::ZoomTo(scale) => {
                self.wheel = None;
                self.apply_scale(scale, true);
            }
        }
        response.prevent_default
    }

    fn clamp_scale(&self, scale: f64) -> f64 { clamp(scale, self.state.min_scale, self.state.max_scale) }

    fn height_cap(&self) -> f64 {
        if self.state.strict_height_cap {
            return (self.base.height * REDUCED_SCALE).ceil().max(1.0);
        }
        let window_height = self.frame.viewport_height();
        if window_height > 0.0 {
            (window_height * HEIGHT_BUDGET).ceil().max(1.0)
        } else {
            (self.base.height * self.state.max_scale).ceil().max(1.0)
        }
    }

    fn apply_scale(&mut self, requested: f64, preserve_center: bool) {
        let previous = self.state.scale;
        let scroll = self.frame.scroll_offset();
        let center = Vec2::new(
            scroll.x + self.frame.client_width() / 2.0,
            scroll.y + self.frame.client_height() / 2.0,
        );

        let scale = self.clamp_scale(requested);
        self.state.scale = scale;
        self.frame.set_content_size(self.base.width * scale, self.base.height * scale);
        self.frame.set_zoom_label(&format!("{}%", (scale * 100.0).round()));
        self.update_frame_height();
        self.update_toolbar();

        if preserve_center && previous > 0.0 {
            let ratio = safe_div(scale, previous, 1.0);
            self.frame.set_scroll_offset(Vec2::new(
                center.x * ratio - self.frame.client_width() / 2.0,
                center.y * ratio - self.frame.client_height() / 2.0,
            ));
        }
    }

    fn update_frame_height(&mut self) {
        let scaled_height = (self.base.height * self.state.scale).ceil().max(1.0);
        let cap = self.state.height_cap;
        let mut height = scaled_height.min(cap);
        self.frame.set_frame_height(height);
        let scrollbar = self.frame.scrollbar_height();
        if scrollbar > 0.0 && scaled_height <= height {
            height += scrollbar;
            if self.state.strict_height_cap {
                height = height.min(cap);
            }
            self.frame.set_frame_height(height);
        }
    }

    fn update_toolbar(&mut self) {
        let overflow_x = self.base.width * self.state.scale - self.frame.client_width();
        let deviation = (self.state.scale - self.state.default_scale).abs();
        let at_actual_default = deviation <= SCALE_EPS
            && self.state.default_scale >= 1.0 - ACTUAL_SCALE_EPS
            && overflow_x <= ACTUAL_OVERFLOW_PX;
        let hidden = if at_actual_default {
            true
        } else {
            let needs_navigation = self.state.default_scale < NEAR_FIT_SCALE
                || overflow_x > NAV_MIN_OVERFLOW_PX
                || deviation > SCALE_EPS;
            !needs_navigation
        };
        self.toolbar_hidden = hidden;
        self.frame.set_toolbar_hidden(hidden);
    }
}
