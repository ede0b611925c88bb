//! Engine configuration: thresholds, timing windows and drag-proxy styling.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Duration;

/// Maximum milliseconds between two taps that form a double-click.
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 500;
/// Manhattan distance in pixels the contact must travel before a drag starts.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;
/// Milliseconds to hold still before a context-menu event is raised.
pub const DEFAULT_LONG_PRESS_MS: u64 = 900;
/// Opacity of the floating drag proxy.
pub const DEFAULT_PROXY_OPACITY: f64 = 0.5;
/// Stacking order of the floating drag proxy.
pub const DEFAULT_PROXY_Z_INDEX: i32 = 999_999;

/// Tunable parameters for a [`TouchDragEngine`](crate::TouchDragEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub double_click_ms: u64,
    pub drag_threshold: f64,
    pub long_press_ms: u64,
    pub proxy_opacity: f64,
    pub proxy_z_index: i32,
    /// Attribute marking an element as a drag source.
    pub draggable_attribute: String,
    /// Attributes removed from every node of the drag proxy.
    pub stripped_attributes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            proxy_opacity: DEFAULT_PROXY_OPACITY,
            proxy_z_index: DEFAULT_PROXY_Z_INDEX,
            draggable_attribute: "draggable".to_string(),
            stripped_attributes: ["id", "class", "style", "draggable"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "dragThreshold",
                reason: format!("must be a non-negative number, got {}", self.drag_threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.proxy_opacity) {
            return Err(ConfigError::Invalid {
                field: "proxyOpacity",
                reason: format!("must be within [0, 1], got {}", self.proxy_opacity),
            });
        }
        if self.draggable_attribute.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "draggableAttribute",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.double_click_window(), Duration::from_millis(500));
        assert_eq!(config.long_press_delay(), Duration::from_millis(900));
        assert!((config.drag_threshold - 5.0).abs() < f64::EPSILON);
        assert!((config.proxy_opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.stripped_attributes, ["id", "class", "style", "draggable"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"dragThreshold": 12, "longPressMs": 600}"#).unwrap();
        assert!((config.drag_threshold - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.long_press_ms, 600);
        assert_eq!(config.double_click_ms, DEFAULT_DOUBLE_CLICK_MS);
        assert_eq!(config.draggable_attribute, "draggable");
    }

    #[test]
    fn test_rejects_bad_opacity() {
        let err = EngineConfig::from_json(r#"{"proxyOpacity": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "proxyOpacity", .. }));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let config = EngineConfig {
            drag_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
