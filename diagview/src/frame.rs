use crate::model::Vec2;

/// The scrollable box a [`Viewport`](crate::viewport::Viewport) drives.
///
/// Reads reflect the layout after the most recent write, the way a browser
/// reflows synchronously on measurement. Scroll setters clamp to `[0, max_scroll]`.
pub trait Frame {
    fn client_width(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_offset(&self) -> Vec2;
    fn set_scroll_offset(&mut self, offset: Vec2);
    fn max_scroll(&self) -> Vec2;
    /// Height taken by a horizontal scrollbar; `0.0` while none is showing.
    fn scrollbar_height(&self) -> f64;
    /// Height of the window the frame lives in; `<= 0.0` when unknown.
    fn viewport_height(&self) -> f64;
    fn set_content_size(&mut self, width: f64, height: f64);
    fn set_frame_height(&mut self, height: f64);
    fn set_toolbar_hidden(&mut self, hidden: bool);
    fn set_zoom_label(&mut self, label: &str);
}
