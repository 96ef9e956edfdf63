//! Layout and backend configuration
//!
//! Defaults reproduce the reference geometry exactly. A JSON file may override
//! any subset of fields.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COMPOUND_GAP: u32 = 10;
pub const DEFAULT_FRACTION_SCALE: f32 = 0.5;
pub const DEFAULT_FRACTION_GAP: u32 = 5;
pub const DEFAULT_FRACTION_RULE_OFFSET: u32 = 2;
pub const DEFAULT_FRACTION_RULE_THICKNESS: u32 = 2;
pub const DEFAULT_SCRIPT_SCALE: f32 = 0.5;
pub const DEFAULT_SUM_SCALE: f32 = 0.5;
pub const DEFAULT_SIGMA_SIZE: u32 = 70;
pub const DEFAULT_INTEGRAL_SCALE: f32 = 2.0;
pub const DEFAULT_LIM_LABEL_SCALE: f32 = 0.6;
pub const DEFAULT_LIM_BODY_SCALE: f32 = 0.4;
pub const DEFAULT_RADICAL_OFFSET: u32 = 10;
pub const DEFAULT_INTEGRAL_IMAGE: &str = "assets/integral.png";
pub const DEFAULT_CONTOUR_INTEGRAL_IMAGE: &str = "assets/oint.png";

/// Upper bound for every gap, offset and size field
pub const MAX_SPACING: u32 = 4096;
/// Upper bound for every scale factor
pub const MAX_SCALE: f32 = 8.0;

/// Geometry constants used by the layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Horizontal gap between compound children
    pub compound_gap: u32,
    /// Scale applied to numerator and denominator
    pub fraction_scale: f32,
    /// Vertical space between numerator and denominator
    pub fraction_gap: u32,
    /// Distance from the numerator's bottom to the divider
    pub fraction_rule_offset: u32,
    /// Divider thickness
    pub fraction_rule_thickness: u32,
    /// Scale applied to exponents and subscripts
    pub script_scale: f32,
    /// Scale applied to summation limits
    pub sum_scale: f32,
    /// Side of the square sigma region
    pub sigma_size: u32,
    /// Scale applied to integral sign images
    pub integral_scale: f32,
    /// Scale applied to the "lim" label
    pub lim_label_scale: f32,
    /// Scale applied to the limit body
    pub lim_body_scale: f32,
    /// Room left of a radical's term for the radical stroke
    pub radical_offset: u32,
    /// Image asset for `\int`
    pub integral_image: PathBuf,
    /// Image asset for `\oint`
    pub contour_integral_image: PathBuf,
    /// Composite pixels; when off every box is dimensions-only
    pub rasterize: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compound_gap: DEFAULT_COMPOUND_GAP,
            fraction_scale: DEFAULT_FRACTION_SCALE,
            fraction_gap: DEFAULT_FRACTION_GAP,
            fraction_rule_offset: DEFAULT_FRACTION_RULE_OFFSET,
            fraction_rule_thickness: DEFAULT_FRACTION_RULE_THICKNESS,
            script_scale: DEFAULT_SCRIPT_SCALE,
            sum_scale: DEFAULT_SUM_SCALE,
            sigma_size: DEFAULT_SIGMA_SIZE,
            integral_scale: DEFAULT_INTEGRAL_SCALE,
            lim_label_scale: DEFAULT_LIM_LABEL_SCALE,
            lim_body_scale: DEFAULT_LIM_BODY_SCALE,
            radical_offset: DEFAULT_RADICAL_OFFSET,
            integral_image: PathBuf::from(DEFAULT_INTEGRAL_IMAGE),
            contour_integral_image: PathBuf::from(DEFAULT_CONTOUR_INTEGRAL_IMAGE),
            rasterize: true,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject spacings above `MAX_SPACING` and scales outside `0..=MAX_SCALE`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spacings = [
            ("compound_gap", self.compound_gap),
            ("fraction_gap", self.fraction_gap),
            ("fraction_rule_offset", self.fraction_rule_offset),
            ("fraction_rule_thickness", self.fraction_rule_thickness),
            ("sigma_size", self.sigma_size),
            ("radical_offset", self.radical_offset),
        ];
        for (field, value) in spacings {
            if value > MAX_SPACING {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: format!("{} is above {}", value, MAX_SPACING),
                });
            }
        }

        let scales = [
            ("fraction_scale", self.fraction_scale),
            ("script_scale", self.script_scale),
            ("sum_scale", self.sum_scale),
            ("integral_scale", self.integral_scale),
            ("lim_label_scale", self.lim_label_scale),
            ("lim_body_scale", self.lim_body_scale),
        ];
        for (field, value) in scales {
            if !(0.0..=MAX_SCALE).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: format!("{} is outside 0..={}", value, MAX_SCALE),
                });
            }
        }
        Ok(())
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded layout config");
        Ok(config)
    }

    /// Copy of this config that skips pixel compositing
    pub fn dimensions_only(&self) -> Self {
        Self {
            rasterize: false,
            ..self.clone()
        }
    }
}

/// Cell metrics for the built-in block font backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockFontConfig {
    /// Advance of one grapheme
    pub cell_width: u32,
    /// Line height
    pub cell_height: u32,
    /// Padding between the cell edge and the drawn glyph box
    pub glyph_inset: u32,
}

impl Default for BlockFontConfig {
    fn default() -> Self {
        Self {
            cell_width: 20,
            cell_height: 32,
            glyph_inset: 2,
        }
    }
}
