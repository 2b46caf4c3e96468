use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::geometry::tolerance::TIGHTEN_RATIO;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Vec2 { Vec2 { x, y } }

    pub fn length(self) -> f64 { (self.x * self.x + self.y * self.y).sqrt() }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size { Size { width, height } }

    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Intrinsic coordinate box of a rendered vector image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> ViewBox { ViewBox { x, y, width, height } }

    /// Parses an svg `viewBox` attribute: four numbers split by whitespace and/or commas.
    pub fn parse(attr: &str) -> Option<ViewBox> {
        let mut nums = attr
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()));
        let x = nums.next()??;
        let y = nums.next()??;
        let width = nums.next()??;
        let height = nums.next()??;
        if nums.next().is_some() {
            return None;
        }
        Some(ViewBox { x, y, width, height })
    }

    pub fn to_attribute(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    /// Shrinks the box towards measured content bounds plus `padding`.
    ///
    /// Each axis is adopted only when the padded content extent is positive and
    /// meaningfully smaller than the current one. Returns `None` when neither
    /// axis qualifies or the measurement is empty.
    pub fn tighten(&self, content: ViewBox, padding: f64) -> Option<ViewBox> {
        if !(content.width > 0.0 && content.height > 0.0) {
            return None;
        }
        let cx = content.x - padding;
        let cy = content.y - padding;
        let cw = content.width + padding * 2.0;
        let ch = content.height + padding * 2.0;
        let tighten_w = cw > 0.0 && cw < self.width * TIGHTEN_RATIO;
        let tighten_h = ch > 0.0 && ch < self.height * TIGHTEN_RATIO;
        if !tighten_w && !tighten_h {
            return None;
        }
        Some(ViewBox {
            x: if tighten_w { cx } else { self.x },
            y: if tighten_h { cy } else { self.y },
            width: if tighten_w { cw } else { self.width },
            height: if tighten_h { ch } else { self.height },
        })
    }
}

/// Color theme handed to the rendering runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Dark,
}

impl Theme {
    pub fn from_attribute(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramStatus {
    Unprocessed,
    Pending,
    Rendered,
    Error,
}

impl DiagramStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramStatus::Unprocessed => "unprocessed",
            DiagramStatus::Pending => "pending",
            DiagramStatus::Rendered => "rendered",
            DiagramStatus::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_view_box_forms() {
        assert_eq!(ViewBox::parse("0 0 100 50"), Some(ViewBox::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(ViewBox::parse("-8, -8,  116.5,66"), Some(ViewBox::new(-8.0, -8.0, 116.5, 66.0)));
        assert_eq!(ViewBox::parse("0 0 100"), None);
        assert_eq!(ViewBox::parse("0 0 100 50 3"), None);
        assert_eq!(ViewBox::parse("a b c d"), None);
        assert_eq!(ViewBox::parse(""), None);
    }

    #[test]
    fn tighten_only_adopts_meaningfully_smaller_axes() {
        let vb = ViewBox::new(0.0, 0.0, 1000.0, 200.0);
        // width shrinks to 524 (< 970); height 200 + 24 stays above 194
        let t = vb.tighten(ViewBox::new(100.0, 0.0, 500.0, 200.0), 12.0).unwrap();
        assert_eq!(t, ViewBox::new(88.0, 0.0, 524.0, 200.0));
        // nothing shrinks enough
        assert!(vb.tighten(ViewBox::new(0.0, 0.0, 960.0, 190.0), 12.0).is_none());
        // empty measurement
        assert!(vb.tighten(ViewBox::new(0.0, 0.0, 0.0, 10.0), 12.0).is_none());
    }

    #[test]
    fn theme_from_attribute() {
        assert_eq!(Theme::from_attribute(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_attribute(Some("light")), Theme::Default);
        assert_eq!(Theme::from_attribute(None), Theme::Default);
        assert_eq!(Theme::Dark.as_str(), "dark");
    }
}
