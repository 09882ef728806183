//! Fill configuration

use crate::{FormError, Result};
use pdf_core::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for stamping CSV rows onto a template
///
/// Every member has a default, so a configuration file only needs the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Canvas pixels per PDF point (the zoom the page was rendered at)
    pub scale: f64,

    /// Font size as a fraction of the field height
    pub font_ratio: f64,

    /// Font size used when the primary insertion fails
    pub fallback_font_size: f32,

    /// Output files are named `<prefix>_<row>.pdf`
    pub output_prefix: String,

    /// TrueType font to embed instead of Helvetica
    pub font: Option<PathBuf>,

    /// Text color as 0-255 RGB
    pub text_color: Option<[u8; 3]>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            font_ratio: 0.6,
            fallback_font_size: 12.0,
            output_prefix: "output".to_string(),
            font: None,
            text_color: None,
        }
    }
}

impl FillConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self =
            serde_json::from_str(&json).map_err(|e| FormError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FormError::ConfigError(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.font_ratio.is_finite() || self.font_ratio <= 0.0 {
            return Err(FormError::ConfigError(format!(
                "font_ratio must be positive, got {}",
                self.font_ratio
            )));
        }
        if !self.fallback_font_size.is_finite() || self.fallback_font_size <= 0.0 {
            return Err(FormError::ConfigError(format!(
                "fallback_font_size must be positive, got {}",
                self.fallback_font_size
            )));
        }
        if self.output_prefix.is_empty() || self.output_prefix.contains(['/', '\\']) {
            return Err(FormError::ConfigError(format!(
                "output_prefix must be a plain file name prefix, got {:?}",
                self.output_prefix
            )));
        }
        Ok(())
    }

    /// Text color for stamped values
    pub fn color(&self) -> Color {
        self.text_color
            .map(|[r, g, b]| Color::from_rgb(r, g, b))
            .unwrap_or_default()
    }

    /// Name of the output file for a 1-based row number
    pub fn output_file_name(&self, row: usize) -> String {
        format!("{}_{}.pdf", self.output_prefix, row)
    }
}
