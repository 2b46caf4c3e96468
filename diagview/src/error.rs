use thiserror::Error;

/// Reasons a rendered diagram gets no interactive controls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttachError {
    #[error("container holds no rendered image")]
    MissingImage,
    #[error("rendered image has no usable viewBox")]
    MissingViewBox,
    #[error("rendered image has a non-positive dimension ({width}x{height})")]
    ZeroDimension { width: f64, height: f64 },
    #[error("document operation failed: {0}")]
    Document(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("diagram runtime unavailable: {0}")]
    RuntimeUnavailable(String),
    #[error("diagram render failed: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}
