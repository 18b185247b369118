use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tunable thresholds of the region isolator.
///
/// The defaults are tied to the working resolution the isolator was tuned on
/// (camera frames whose left half is roughly 300-600 px wide). Any field left
/// out of a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IsolatorConfig {
    /// Added to the gradient map mean; pixels at or below the sum are zeroed.
    pub noise_offset: f32,
    /// Lowest gradient value treated as foreground (inclusive).
    pub band_low: u8,
    /// Highest gradient value treated as foreground (inclusive).
    pub band_high: u8,
    /// Contour area must be strictly greater than this.
    pub min_area: f64,
    /// Contour area must be strictly less than this.
    pub max_area: f64,
    /// Bounding box width must be strictly less than this.
    pub max_width: i32,
    /// Bounding box height must be strictly less than this.
    pub max_height: i32,
    /// Lower (exclusive) bound of width / height.
    pub min_aspect: f64,
    /// Upper (exclusive) bound of width / height.
    pub max_aspect: f64,
    /// Foreground percentage at or below which a candidate is too sparse.
    pub min_density: f64,
    /// Foreground percentage at or above which a candidate is too solid.
    pub max_density: f64,
    /// Scale applied to the bounding box before the final crop.
    pub margin_scale: f64,
}

impl Default for IsolatorConfig {
    fn default() -> Self {
        Self {
            noise_offset: 30.0,
            band_low: 20,
            band_high: 200,
            min_area: 375.0,
            max_area: 2500.0,
            max_width: 55,
            max_height: 100,
            min_aspect: 0.35,
            max_aspect: 0.75,
            min_density: 35.0,
            max_density: 75.0,
            margin_scale: 1.1,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} band is empty: {low} .. {high}")]
    EmptyBand {
        name: &'static str,
        low: f64,
        high: f64,
    },
    #[error("size cap must be positive, got {width}x{height}")]
    SizeCap { width: i32, height: i32 },
    #[error("margin scale must be a positive finite number, got {0}")]
    MarginScale(f64),
}

impl IsolatorConfig {
    /// Read a JSON config file and validate it
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        let config: IsolatorConfig = serde_json::from_str(&data)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.band_low > self.band_high {
            return Err(ConfigError::EmptyBand {
                name: "intensity",
                low: self.band_low as f64,
                high: self.band_high as f64,
            });
        }
        if self.min_area >= self.max_area {
            return Err(ConfigError::EmptyBand {
                name: "area",
                low: self.min_area,
                high: self.max_area,
            });
        }
        if self.min_aspect >= self.max_aspect {
            return Err(ConfigError::EmptyBand {
                name: "aspect ratio",
                low: self.min_aspect,
                high: self.max_aspect,
            });
        }
        if self.min_density >= self.max_density {
            return Err(ConfigError::EmptyBand {
                name: "density",
                low: self.min_density,
                high: self.max_density,
            });
        }
        if self.max_width <= 0 || self.max_height <= 0 {
            return Err(ConfigError::SizeCap {
                width: self.max_width,
                height: self.max_height,
            });
        }
        if !self.margin_scale.is_finite() || self.margin_scale <= 0.0 {
            return Err(ConfigError::MarginScale(self.margin_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: IsolatorConfig =
            serde_json::from_str(r#"{ "min_area": 200.0, "band_high": 180 }"#).unwrap();
        assert_eq!(config.min_area, 200.0);
        assert_eq!(config.band_high, 180);
        assert_eq!(config.max_area, 2500.0);
        assert_eq!(config.margin_scale, 1.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_bands_are_rejected() {
        let config = IsolatorConfig {
            min_density: 80.0,
            ..IsolatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBand { name: "density", .. })
        ));

        let config = IsolatorConfig {
            band_low: 210,
            ..IsolatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBand { name: "intensity", .. })
        ));
    }

    #[test]
    fn margin_scale_must_be_positive() {
        let config = IsolatorConfig {
            margin_scale: 0.0,
            ..IsolatorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MarginScale(0.0)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = IsolatorConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
