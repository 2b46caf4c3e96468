#![allow(dead_code)]

use diagview::{Frame, Size, Vec2, Viewport, ViewportConfig};

/// Scroll box that reflows like a browser: a horizontal scrollbar appears
/// when content is wider than the client area and eats into client height.
#[derive(Debug, Clone)]
pub struct MockFrame {
    pub client_width: f64,
    pub frame_height: f64,
    pub window_height: f64,
    pub scrollbar: f64,
    pub content: (f64, f64),
    pub scroll: Vec2,
    pub toolbar_hidden: bool,
    pub label: String,
}

impl MockFrame {
    pub fn new(client_width: f64, window_height: f64) -> MockFrame {
        MockFrame {
            client_width,
            frame_height: 150.0,
            window_height,
            scrollbar: 15.0,
            content: (0.0, 0.0),
            scroll: Vec2::ZERO,
            toolbar_hidden: false,
            label: String::new(),
        }
    }

    fn has_horizontal_scroll(&self) -> bool { self.content.0 > self.client_width }

    fn reclamp(&mut self) {
        let max = self.max_scroll();
        self.scroll = Vec2::new(self.scroll.x.max(0.0).min(max.x), self.scroll.y.max(0.0).min(max.y));
    }
}

impl Frame for MockFrame {
    fn client_width(&self) -> f64 { self.client_width }

    fn client_height(&self) -> f64 {
        let bar = if self.has_horizontal_scroll() { self.scrollbar } else { 0.0 };
        (self.frame_height - bar).max(0.0)
    }

    fn scroll_offset(&self) -> Vec2 { self.scroll }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll = offset;
        self.reclamp();
    }

    fn max_scroll(&self) -> Vec2 {
        Vec2::new(
            (self.content.0 - self.client_width).max(0.0),
            (self.content.1 - self.client_height()).max(0.0),
        )
    }

    fn scrollbar_height(&self) -> f64 {
        if self.has_horizontal_scroll() { self.scrollbar } else { 0.0 }
    }

    fn viewport_height(&self) -> f64 { self.window_height }

    fn set_content_size(&mut self, width: f64, height: f64) {
        self.content = (width, height);
        self.reclamp();
    }

    fn set_frame_height(&mut self, height: f64) {
        self.frame_height = height;
        self.reclamp();
    }

    fn set_toolbar_hidden(&mut self, hidden: bool) { self.toolbar_hidden = hidden; }

    fn set_zoom_label(&mut self, label: &str) { self.label = label.to_string(); }
}

pub fn fitted(width: f64, height: f64, client_width: f64, window_height: f64) -> Viewport<MockFrame> {
    let mut vp = Viewport::new(
        MockFrame::new(client_width, window_height),
        Size::new(width, height),
        ViewportConfig::default(),
    )
    .unwrap();
    vp.fit();
    vp
}
