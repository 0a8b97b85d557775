//! Engine Configuration
//!
//! Settings for an application root.

use crate::error::Result;
use blueprint_js::RuntimeOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Scheduler tick interval in milliseconds
    pub scheduler_interval_ms: u64,
    /// Script heap limit in bytes (0 = unlimited)
    pub memory_limit: usize,
    /// Script stack limit in bytes (0 = unlimited)
    pub max_stack_size: usize,
    /// Initial viewport width
    pub width: f32,
    /// Initial viewport height
    pub height: f32,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            scheduler_interval_ms: 4,
            memory_limit: 32 * 1024 * 1024,
            max_stack_size: 1024 * 1024,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl RootConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder: set the initial viewport
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler_interval_ms.max(1))
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            memory_limit: self.memory_limit,
            max_stack_size: self.max_stack_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BridgeError;

    #[test]
    fn test_defaults() {
        let config = RootConfig::default();
        assert_eq!(config.scheduler_interval(), Duration::from_millis(4));
        assert_eq!(config.memory_limit, 32 * 1024 * 1024);
        assert_eq!((config.width, config.height), (0.0, 0.0));
    }

    #[test]
    fn test_partial_json() {
        let config = RootConfig::from_json(r#"{ "width": 320, "scheduler_interval_ms": 16 }"#).unwrap();
        assert_eq!(config.width, 320.0);
        assert_eq!(config.scheduler_interval(), Duration::from_millis(16));
        assert_eq!(config.max_stack_size, RootConfig::default().max_stack_size);
    }

    #[test]
    fn test_invalid_json() {
        let err = RootConfig::from_json("{ width: }").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = RootConfig {
            scheduler_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.scheduler_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = RootConfig::default().with_size(100.0, 50.0);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RootConfig::from_json(&json).unwrap(), config);
    }
}
