//! Editor configuration
//!
//! Interaction thresholds and authoring defaults. Configuration can be loaded
//! from a JSON file, overridden from environment variables, or created
//! programmatically.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable editor settings
///
/// Lengths are in document units unless the field name ends in `_px`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side of the rectangle substituted for a click with a point-like tool
    pub default_shape_size: f32,
    /// Smallest width/height a resize may produce
    pub min_resize_size: f32,
    /// A draw gesture is "small" when both axes move less than this (screen px)
    pub click_threshold_px: f32,
    /// Drag displacement at or below this on both axes is ignored
    pub drag_epsilon: f32,
    /// Resize handle side (screen px), constant across zoom levels
    pub handle_size_px: f32,
    /// Hit distance around vertex geometry
    pub hit_tolerance: f32,
    /// Author recorded on created annotations
    pub author: String,
    /// Initial text of a new FreeText annotation
    pub free_text_placeholder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_shape_size: 50.0,
            min_resize_size: 10.0,
            click_threshold_px: 5.0,
            drag_epsilon: 0.1,
            handle_size_px: 8.0,
            hit_tolerance: 5.0,
            author: "User".to_string(),
            free_text_placeholder: "Text".to_string(),
        }
    }
}

impl EditorConfig {
    /// Sets the author recorded on new annotations.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the resize handle size in screen pixels.
    pub fn with_handle_size_px(mut self, size: f32) -> Self {
        self.handle_size_px = size;
        self
    }

    /// Sets the hit tolerance around vertex geometry.
    pub fn with_hit_tolerance(mut self, tolerance: f32) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    /// Loads configuration from a JSON file. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Saves configuration as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Applies environment variable overrides on top of `self`.
    ///
    /// Environment variables:
    /// - `PDF_ANNOTATOR_AUTHOR`: author name
    /// - `PDF_ANNOTATOR_HANDLE_SIZE_PX`: resize handle size
    /// - `PDF_ANNOTATOR_HIT_TOLERANCE`: vertex hit tolerance
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse as a positive number.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("PDF_ANNOTATOR_AUTHOR") {
            self.author = val;
        }

        if let Ok(val) = std::env::var("PDF_ANNOTATOR_HANDLE_SIZE_PX") {
            self.handle_size_px = parse_positive("PDF_ANNOTATOR_HANDLE_SIZE_PX", &val)?;
        }

        if let Ok(val) = std::env::var("PDF_ANNOTATOR_HIT_TOLERANCE") {
            self.hit_tolerance = parse_positive("PDF_ANNOTATOR_HIT_TOLERANCE", &val)?;
        }

        Ok(self)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }
}

fn parse_positive(key: &str, value: &str) -> Result<f32, ConfigError> {
    match value.trim().parse::<f32>() {
        Ok(parsed) if parsed > 0.0 && parsed.is_finite() => Ok(parsed),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for configuration key: {0}")]
    InvalidValue(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}
