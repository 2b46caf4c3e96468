use diagview::{Frame, Vec2};
use web_sys::{HtmlElement, SvgElement, Window};

/// [`Frame`] over the scrollable viewport element, its svg and the toolbar.
pub struct DomFrame {
    pub(crate) window: Window,
    pub(crate) viewport: HtmlElement,
    pub(crate) svg: SvgElement,
    pub(crate) toolbar: HtmlElement,
    pub(crate) zoom_label: HtmlElement,
}

fn px(v: f64) -> String { format!("{:.2}px", v) }

impl Frame for DomFrame {
    fn client_width(&self) -> f64 { self.viewport.client_width() as f64 }

    fn client_height(&self) -> f64 { self.viewport.client_height() as f64 }

    fn scroll_offset(&self) -> Vec2 {
        Vec2::new(self.viewport.scroll_left() as f64, self.viewport.scroll_top() as f64)
    }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.viewport.scroll_to_with_x_and_y(offset.x, offset.y);
    }

    fn max_scroll(&self) -> Vec2 {
        let v = &self.viewport;
        Vec2::new(
            (v.scroll_width() - v.client_width()).max(0) as f64,
            (v.scroll_height() - v.client_height()).max(0) as f64,
        )
    }

    fn scrollbar_height(&self) -> f64 {
        let v = &self.viewport;
        if v.scroll_width() <= v.client_width() {
            return 0.0;
        }
        // offsetHeight counts both borders; clientTop is the top one
        (v.offset_height() - v.client_height() - 2 * v.client_top()).max(0) as f64
    }

    fn viewport_height(&self) -> f64 {
        self.window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0)
    }

    fn set_content_size(&mut self, width: f64, height: f64) {
        let style = self.svg.style();
        let _ = style.set_property("width", &px(width));
        let _ = style.set_property("height", &px(height));
    }

    fn set_frame_height(&mut self, height: f64) {
        let _ = self.viewport.style().set_property("height", &px(height));
    }

    fn set_toolbar_hidden(&mut self, hidden: bool) { self.toolbar.set_hidden(hidden); }

    fn set_zoom_label(&mut self, label: &str) { self.zoom_label.set_text_content(Some(label)); }
}
