use crate::color::{ColorError, Rgb};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

pub const DISTORTION_AMPLITUDE_RANGE: RangeInclusive<f32> = 0.0..=1.8;
pub const DISTORTION_FREQUENCY_RANGE: RangeInclusive<f32> = 0.0..=2.5;
pub const HOVER_ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.0..=60.0;
pub const LIGHT_INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Live-editable parameters shown in the control panel.
///
/// The hover fields are the targets the interaction controller animates
/// toward while the pointer is over the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlOptions {
    pub distortion_amplitude: f32,
    pub distortion_frequency: f32,
    pub hover_rotation_speed: f32,
    pub light_intensity: f32,
    pub tint_color_hex: String,
    pub background_color_hex: String,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            distortion_amplitude: 1.5,
            distortion_frequency: 2.0,
            hover_rotation_speed: 25.0,
            light_intensity: 0.5,
            tint_color_hex: "#ff0000".into(),
            background_color_hex: "#1b1b1b".into(),
        }
    }
}

/// Errors from loading an options file.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color: {0}")]
    Color(#[from] ColorError),
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

impl ControlOptions {
    /// Clamp every numeric field into its panel range. NaN maps to the range start.
    pub fn clamped(self) -> Self {
        Self {
            distortion_amplitude: clamp_to(self.distortion_amplitude, &DISTORTION_AMPLITUDE_RANGE),
            distortion_frequency: clamp_to(self.distortion_frequency, &DISTORTION_FREQUENCY_RANGE),
            hover_rotation_speed: clamp_to(self.hover_rotation_speed, &HOVER_ROTATION_SPEED_RANGE),
            light_intensity: clamp_to(self.light_intensity, &LIGHT_INTENSITY_RANGE),
            ..self
        }
    }

    /// Parse options from JSON. Missing fields take defaults; colors must parse.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        Rgb::from_hex(&options.tint_color_hex)?;
        Rgb::from_hex(&options.background_color_hex)?;
        Ok(options.clamped())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json(&data)?;
        tracing::info!("loaded control options from {}", path.as_ref().display());
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Control options plus the colors derived from them.
///
/// Edits go through [`ControlPanel::options_mut`]; color edits take effect
/// after [`ControlPanel::refresh`], the panel's change callback.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    options: ControlOptions,
    tint: Rgb,
    background: Rgb,
}

impl ControlPanel {
    pub fn new(options: ControlOptions) -> Result<Self, ColorError> {
        let tint = Rgb::from_hex(&options.tint_color_hex)?;
        let background = Rgb::from_hex(&options.background_color_hex)?;
        Ok(Self {
            options,
            tint,
            background,
        })
    }

    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ControlOptions {
        &mut self.options
    }

    pub fn tint(&self) -> Rgb {
        self.tint
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Recompute the derived colors from the hex fields.
    ///
    /// A field that fails to parse keeps its last good color; the first
    /// failure is returned after both fields have been tried.
    pub fn refresh(&mut self) -> Result<(), ColorError> {
        let tint = Rgb::from_hex(&self.options.tint_color_hex);
        let background = Rgb::from_hex(&self.options.background_color_hex);

        let mut first_err = None;
        match tint {
            Ok(c) => self.tint = c,
            Err(e) => {
                tracing::warn!("keeping tint {}: {e}", self.tint);
                first_err.get_or_insert(e);
            }
        }
        match background {
            Ok(c) => self.background = c,
            Err(e) => {
                tracing::warn!("keeping background {}: {e}", self.background);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        let options = ControlOptions::default();
        Self {
            tint: Rgb::new(1.0, 0.0, 0.0),
            background: Rgb::from_rgb8([0x1b, 0x1b, 0x1b]),
            options,
        }
    }
}
