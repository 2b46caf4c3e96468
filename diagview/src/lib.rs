//! Zoom/pan/fit viewport policy, touch gesture disambiguation and render
//! bookkeeping for diagrams embedded in static pages.
//!
//! This crate holds no browser code. `diagview-wasm` binds it to the DOM by
//! implementing [`Frame`] over real elements.

pub mod config;
pub mod drag;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod ledger;
pub mod locate;
pub mod model;
pub mod viewport;
pub mod geometry {
    pub mod tolerance;
}

pub use config::{Config, PageConfig, ViewportConfig};
pub use error::{AttachError, ConfigError, RenderError};
pub use frame::Frame;
pub use gesture::{GestureAction, GestureMachine, GestureState, ScrollEdge, TouchResponse};
pub use ledger::{BatchPlan, Completion, DiagramId, Generation, RenderJob, RenderLedger};
pub use model::{DiagramStatus, Size, Theme, Vec2, ViewBox};
pub use viewport::{Viewport, ViewportState};
