//! Configuration for the feature bridge

use serde::{Deserialize, Serialize};

/// Environment variable toggling sequence-feature support
pub const SEQUENCE_FEATURES_ENV: &str = "FEATUREBRIDGE_SEQUENCE_FEATURES";

/// Environment variable holding the log filter
pub const LOG_FILTER_ENV: &str = "FEATUREBRIDGE_LOG";

/// Knobs consulted by a single conversion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Whether the native framework accepts sequence features
    pub sequence_features: bool,

    /// Alpha byte written when an RGB image is packed into four channels
    pub image_alpha: u8,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            sequence_features: true,
            image_alpha: 255,
        }
    }
}

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Whether the native framework accepts sequence features
    pub sequence_features: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Alpha byte for RGB images
    pub image_alpha: u8,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let options = ConversionOptions::default();
        Self {
            sequence_features: options.sequence_features,
            log_filter: "info".to_string(),
            image_alpha: options.image_alpha,
        }
    }
}

impl BridgeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `FEATUREBRIDGE_*` environment variables
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(SEQUENCE_FEATURES_ENV) {
            match parse_flag(&raw) {
                Some(enabled) => config.sequence_features = enabled,
                None => tracing::warn!(
                    variable = SEQUENCE_FEATURES_ENV,
                    value = %raw,
                    "Ignoring unrecognized boolean"
                ),
            }
        }

        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }

    /// Enable or disable sequence features
    pub fn with_sequence_features(mut self, enabled: bool) -> Self {
        self.sequence_features = enabled;
        self
    }

    /// Set the log filter directive
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the alpha byte used for RGB images
    pub fn with_image_alpha(mut self, alpha: u8) -> Self {
        self.image_alpha = alpha;
        self
    }

    /// Per-call conversion options
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            sequence_features: self.sequence_features,
            image_alpha: self.image_alpha,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
