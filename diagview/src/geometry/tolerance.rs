// Centralized thresholds for viewport policy decisions

pub const FIT_HORIZONTAL_PADDING: f64 = 2.0; // px reserved on each side when fitting
pub const NEAR_FIT_SCALE: f64 = 0.95;        // fit scale this close to 1.0 starts at actual size
pub const BOUNDS_PADDING: f64 = 12.0;        // units added around measured content bounds
pub const TIGHTEN_RATIO: f64 = 0.97;         // tightened axis must be below this share of the declared box
pub const NAV_MIN_OVERFLOW_PX: f64 = 32.0;   // horizontal overflow that always shows the toolbar
pub const ACTUAL_OVERFLOW_PX: f64 = 6.0;     // overflow tolerated while staying at actual size
pub const SCALE_EPS: f64 = 0.01;             // "at default scale" slack
pub const ACTUAL_SCALE_EPS: f64 = 0.001;     // default scale counted as actual size
pub const HEIGHT_BUDGET: f64 = 0.8;          // share of the window height a frame may take
pub const REDUCED_SCALE: f64 = 0.8;          // baseline when actual size is too tall
pub const EDGE_TOLERANCE_PX: f64 = 1.0;      // scroll edge detection slack
pub const MIN_PINCH_DISTANCE: f64 = 1.0;     // two-finger baseline below this is ignored

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= f64::EPSILON { fallback } else { num / den }
}
