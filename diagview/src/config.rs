//! Runtime configuration, deserialized from a page-provided JSON object.
//!
//! Every field has a default, so `{}` is a valid config. Keys are camelCase to
//! match what page scripts pass in.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub viewport: ViewportConfig,
    pub page: PageConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Factor applied by the zoom buttons.
    pub zoom_step: f64,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    /// Movement in px a single touch needs before its intent is decided.
    pub touch_threshold: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            min_scale: 0.2,
            max_scale: 3.5,
            zoom_step: 1.2,
            wheel_zoom_in: 1.12,
            wheel_zoom_out: 0.89,
            touch_threshold: 6.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Diagram language marker used by the block selector.
    pub language: String,
    pub runtime_src: String,
    pub runtime_global: String,
    pub theme_event: String,
    pub theme_attribute: String,
    pub security_level: String,
    pub id_prefix: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            language: "mermaid".to_string(),
            runtime_src: "/assets/js/vendor/mermaid.min.js".to_string(),
            runtime_global: "mermaid".to_string(),
            theme_event: "stuffs:themechange".to_string(),
            theme_attribute: "data-theme".to_string(),
            security_level: "strict".to_string(),
            id_prefix: "diagview".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.viewport;
        for (field, value) in [
            ("minScale", v.min_scale),
            ("maxScale", v.max_scale),
            ("zoomStep", v.zoom_step),
            ("wheelZoomIn", v.wheel_zoom_in),
            ("wheelZoomOut", v.wheel_zoom_out),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be finite and positive, got {value}")));
            }
        }
        if v.min_scale > v.max_scale {
            return Err(ConfigError::invalid(
                "minScale",
                format!("{} exceeds maxScale {}", v.min_scale, v.max_scale),
            ));
        }
        if v.zoom_step <= 1.0 {
            return Err(ConfigError::invalid("zoomStep", "must be greater than 1"));
        }
        if v.wheel_zoom_in <= 1.0 {
            return Err(ConfigError::invalid("wheelZoomIn", "must be greater than 1"));
        }
        if v.wheel_zoom_out >= 1.0 {
            return Err(ConfigError::invalid("wheelZoomOut", "must be less than 1"));
        }
        if !v.touch_threshold.is_finite() || v.touch_threshold < 0.0 {
            return Err(ConfigError::invalid("touchThreshold", "must be finite and non-negative"));
        }
        if self.page.language.trim().is_empty() {
            return Err(ConfigError::invalid("language", "must not be empty"));
        }
        if !crate::locate::is_language_token(self.page.language.trim()) {
            return Err(ConfigError::invalid(
                "language",
                format!("{:?} may only contain ASCII letters, digits, '-' and '_'", self.page.language),
            ));
        }
        Ok(())
    }
}
