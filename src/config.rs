//! Scene configuration: lighting windows, palette and mountain layers.
//!
//! Stored as JSON. Every field has a default, so a partial file only
//! overrides what it names.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Errors raised while loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for this schema.
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but makes no sense.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Sun and moon windows as fractions of the day (0 = local midnight).
///
/// The sun's window runs sunrise -> sunset within one day; the moon's runs
/// moonrise -> moonset across midnight. The two may overlap; period
/// classification resolves that with a fixed precedence (see
/// [`crate::sky::classify`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialConfig {
    pub sunrise: f32,
    pub sunset: f32,
    pub moonrise: f32,
    pub moonset: f32,
}

impl CelestialConfig {
    /// Length of the sun's window
    pub fn daytime_span(&self) -> f32 {
        self.sunset - self.sunrise
    }

    /// Length of the moon's window, wrapping through midnight
    pub fn nighttime_span(&self) -> f32 {
        self.moonset + 1.0 - self.moonrise
    }

    /// Solar noon of the configured day
    pub fn mid_daytime(&self) -> f32 {
        self.sunrise + self.daytime_span() / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("celestial.sunrise", self.sunrise),
            ("celestial.sunset", self.sunset),
            ("celestial.moonrise", self.moonrise),
            ("celestial.moonset", self.moonset),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is outside [0, 1)", value),
                });
            }
        }
        if self.sunrise >= self.sunset {
            return Err(ConfigError::Invalid {
                field: "celestial.sunset",
                reason: format!("sunset {} must come after sunrise {}", self.sunset, self.sunrise),
            });
        }
        if self.moonrise <= self.moonset {
            return Err(ConfigError::Invalid {
                field: "celestial.moonrise",
                reason: format!(
                    "moonrise {} must come after moonset {} so the moon's window crosses midnight",
                    self.moonrise, self.moonset
                ),
            });
        }
        Ok(())
    }
}

impl Default for CelestialConfig {
    fn default() -> Self {
        Self {
            sunrise: 0.32,
            sunset: 0.81,
            moonrise: 0.85,
            moonset: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub day_sky: Rgb,
    pub night_sky: Rgb,
    /// Tint mountains drift toward as light fades
    pub night_filter: Rgb,
    pub sun: Rgb,
    /// Unlit part of the moon
    pub moon_dark: Rgb,
    pub moon_lit: Rgb,
    /// Scatter stars and markers
    pub star: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            day_sky: [192, 222, 237],
            night_sky: [17, 17, 30],
            night_filter: [5, 5, 25],
            sun: [255, 255, 255],
            moon_dark: [17, 17, 17],
            moon_lit: [255, 255, 255],
            star: [255, 255, 255],
        }
    }
}

/// One triangular silhouette, anchored on the bottom edge of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MountainLayer {
    /// Left foot of the triangle, in pixels from the left edge
    pub offset: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl MountainLayer {
    pub const fn new(offset: f32, width: f32, height: f32, color: Rgb) -> Self {
        Self {
            offset,
            width,
            height,
            color,
        }
    }
}

pub fn default_mountains() -> Vec<MountainLayer> {
    vec![
        MountainLayer::new(70.0, 600.0, 225.0, [149, 203, 229]),
        MountainLayer::new(-200.0, 600.0, 500.0, [142, 193, 218]),
        MountainLayer::new(0.0, 400.0, 600.0, [166, 207, 227]),
    ]
}

/// Complete configuration for the sky renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub celestial: CelestialConfig,
    pub palette: Palette,
    /// Back-to-front
    pub mountains: Vec<MountainLayer>,
    /// Seconds between redraws
    pub tick_interval_secs: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            celestial: CelestialConfig::default(),
            palette: Palette::default(),
            mountains: default_mountains(),
            tick_interval_secs: 30,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.celestial.validate()?;
        for layer in &self.mountains {
            if !(layer.width > 0.0 && layer.height > 0.0) || !layer.offset.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "mountains",
                    reason: format!(
                        "layer at offset {} needs a positive width and height",
                        layer.offset
                    ),
                });
            }
        }
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_secs",
                reason: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load config, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded scene config from {}", path.display());
                config
            },
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            },
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            },
        }
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
