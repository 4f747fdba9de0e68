//! Ingestion settings.
//!
//! Everything has a sensible default; `from_env` lets a deployment override
//! the knobs without recompiling.

use crate::error::ConfigError;

/// Default page size (A4 at 72 dpi) used when a document declares no size.
pub const DEFAULT_WIDTH: f64 = 595.0;
pub const DEFAULT_HEIGHT: f64 = 842.0;

/// Settings for a single ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Maximum entries a filesystem directory listing returns per batch.
    pub listing_batch_size: usize,
    /// Entries whose name starts with this prefix are dropped.
    pub hidden_prefix: String,
    /// Class values starting with this token mark an element for redaction.
    pub redact_marker: String,
    /// Gaussian blur radius applied to redacted images.
    pub blur_radius: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            listing_batch_size: 100,
            hidden_prefix: ".".to_string(),
            redact_marker: "redact".to_string(),
            blur_radius: 20,
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `SVGBOOK_*` environment variables.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("SVGBOOK_LISTING_BATCH") {
            config.listing_batch_size = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SVGBOOK_LISTING_BATCH",
                        expected: "a positive integer",
                        value,
                    });
                }
            };
        }
        if let Ok(value) = std::env::var("SVGBOOK_HIDDEN_PREFIX") {
            config.hidden_prefix = value;
        }
        if let Ok(value) = std::env::var("SVGBOOK_REDACT_MARKER") {
            let marker = value.trim().to_lowercase();
            if marker.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "SVGBOOK_REDACT_MARKER",
                    expected: "a non-empty token",
                    value,
                });
            }
            config.redact_marker = marker;
        }
        if let Ok(value) = std::env::var("SVGBOOK_BLUR_RADIUS") {
            config.blur_radius =
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::Invalid {
                        key: "SVGBOOK_BLUR_RADIUS",
                        expected: "a non-negative integer",
                        value: value.clone(),
                    })?;
        }

        Ok(config)
    }

    pub fn with_listing_batch_size(mut self, size: usize) -> Self {
        self.listing_batch_size = size.max(1);
        self
    }

    pub fn with_hidden_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.hidden_prefix = prefix.into();
        self
    }

    pub fn with_redact_marker(mut self, marker: impl Into<String>) -> Self {
        self.redact_marker = marker.into().to_lowercase();
        self
    }

    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Whether an entry name is hidden and should be skipped.
    pub fn is_hidden(&self, name: &str) -> bool {
        !self.hidden_prefix.is_empty() && name.starts_with(&self.hidden_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.listing_batch_size, 100);
        assert_eq!(config.redact_marker, "redact");
        assert!(config.is_hidden(".DS_Store"));
        assert!(!config.is_hidden("page1.svg"));
    }

    #[test]
    fn test_builder() {
        let config = IngestConfig::new()
            .with_listing_batch_size(0)
            .with_redact_marker("SECRET")
            .with_hidden_prefix("");
        assert_eq!(config.listing_batch_size, 1);
        assert_eq!(config.redact_marker, "secret");
        assert!(!config.is_hidden(".git"));
    }
}
