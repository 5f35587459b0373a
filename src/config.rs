//! Runtime configuration.
//!
//! Defaults are the interaction contract shared with the documentation site
//! (timings, thresholds, zoom steps, selectors). A page may override any
//! subset through a JSON object in the `data-mermaid-panzoom` attribute of
//! the root element.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{TapThresholds, ZoomLimits};

pub const CONFIG_ATTRIBUTE: &str = "data-mermaid-panzoom";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scale bounds: min {min}, max {max}")]
    InvalidScaleBounds { min: f64, max: f64 },

    #[error("invalid zoom factors: in {zoom_in}, out {zoom_out}")]
    InvalidZoomFactor { zoom_in: f64, zoom_out: f64 },

    #[error("navigation base must be an http(s) URL: {url}")]
    InvalidBaseUrl { url: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanZoomConfig {
    /// Start automatically when the module loads.
    pub auto_start: bool,
    pub log_level: LevelFilter,

    pub container_selector: String,
    pub graphic_selector: String,
    pub node_selector: String,
    /// Label lookups inside a node, highest priority first.
    pub label_selectors: Vec<String>,
    /// Class on the root element that signals dark mode.
    pub dark_class: String,
    pub reset_class: String,
    /// Node identifiers are appended to this, percent-encoded.
    pub package_base_url: String,

    pub settle_delay_ms: u32,
    pub debounce_ms: u32,
    pub tap_max_duration_ms: f64,
    pub tap_max_movement_px: f64,

    pub zoom_in: f64,
    pub zoom_out: f64,
    pub min_scale: f64,
    pub max_scale: f64,

    pub container_min_height: String,
    pub hover_opacity: f64,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            log_level: LevelFilter::Warn,
            container_selector: ".mermaid".into(),
            graphic_selector: ":scope > svg".into(),
            node_selector: "g.node".into(),
            label_selectors: vec!["span".into(), "text".into(), "foreignObject span".into()],
            dark_class: "dark".into(),
            reset_class: "mermaid-reset-btn".into(),
            package_base_url: "https://pkgs.krea.to/".into(),
            settle_delay_ms: 300,
            debounce_ms: 200,
            tap_max_duration_ms: 300.0,
            tap_max_movement_px: 10.0,
            zoom_in: 1.1,
            zoom_out: 0.9,
            min_scale: 0.1,
            max_scale: 10.0,
            container_min_height: "400px".into(),
            hover_opacity: 0.7,
        }
    }
}

impl PanZoomConfig {
    /// Parses a partial JSON override on top of the defaults and validates it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the override attribute from the root element, falling back to
    /// defaults when it is absent or unusable.
    pub fn from_document(document: &web_sys::Document) -> Self {
        let raw = document
            .document_element()
            .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE));
        match raw {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring {CONFIG_ATTRIBUTE}: {e}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidScaleBounds { min, max });
        }
        if !(self.zoom_in > 1.0 && self.zoom_in.is_finite())
            || !(self.zoom_out > 0.0 && self.zoom_out < 1.0)
        {
            return Err(ConfigError::InvalidZoomFactor {
                zoom_in: self.zoom_in,
                zoom_out: self.zoom_out,
            });
        }
        let base = &self.package_base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl { url: base.clone() });
        }
        Ok(())
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            zoom_in: self.zoom_in,
            zoom_out: self.zoom_out,
        }
    }

    pub fn tap_thresholds(&self) -> TapThresholds {
        TapThresholds {
            max_duration_ms: self.tap_max_duration_ms,
            max_movement_px: self.tap_max_movement_px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_interaction_contract() {
        let config = PanZoomConfig::default();
        assert_eq!(config.settle_delay_ms, 300);
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.tap_thresholds(), TapThresholds::default());
        assert_eq!(config.zoom_limits(), ZoomLimits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PanZoomConfig::from_json(r#"{"debounce_ms": 350, "log_level": "debug"}"#)
            .expect("valid override");
        assert_eq!(config.debounce_ms, 350);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.settle_delay_ms, 300);
        assert_eq!(config.container_selector, ".mermaid");
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(PanZoomConfig::from_json("{}").unwrap(), PanZoomConfig::default());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            PanZoomConfig::from_json("{debounce_ms: 1"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn inverted_scale_bounds_are_rejected() {
        let err = PanZoomConfig::from_json(r#"{"min_scale": 5.0, "max_scale": 2.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScaleBounds { .. }));
    }

    #[test]
    fn zoom_factors_must_point_the_right_way() {
        let err = PanZoomConfig::from_json(r#"{"zoom_in": 0.9, "zoom_out": 1.1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoomFactor { .. }));
    }

    #[test]
    fn non_http_base_is_rejected() {
        let err =
            PanZoomConfig::from_json(r#"{"package_base_url": "javascript:alert(1)//"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "navigation base must be an http(s) URL: javascript:alert(1)//"
        );
    }
}
