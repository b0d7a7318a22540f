// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration of the trunk width estimation pipeline.
//!
//! All constants of the pipeline live here, grouped by stage,
//! and are passed explicitly to each stage.
//! The default values are the ones calibrated for the field capture tool,
//! a 180x240 time-of-flight sensor upsampled to a 360x480 working resolution.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::misc::type_aliases::Float;

/// Configuration of the whole pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Working resolution `(rows, columns)` of depth grids and color images.
    pub shape: (usize, usize),
    /// Mode depth estimation.
    pub mode: ModeConfig,
    /// Connected components denoising.
    pub denoise: DenoiseConfig,
    /// Trunk orientation estimation.
    pub orientation: OrientationConfig,
    /// Boundaries search.
    pub boundary: BoundaryConfig,
    /// Sensor calibration constants.
    pub calibration: Calibration,
    /// Width formula matching the calibration regime.
    pub width_model: WidthModel,
}

/// Configuration of the mode depth histogram.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Width of one histogram bin (m).
    pub bin_size: Float,
    /// Maximum range of the sensor (m). Readings beyond are ignored.
    pub sensor_range: Float,
    /// Relative distance to the mode depth above which readings are discarded.
    pub depth_tolerance: Float,
}

/// Configuration of the denoiser.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    /// Components with less pixels than this are speckle noise (ALPHA).
    pub alpha: usize,
    /// Convex hull density above which the remaining components are kept (BETA).
    pub beta: Float,
}

/// Configuration of the orientation estimator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationConfig {
    /// Maximum angle (degrees) between the trunk axis and the vertical.
    pub vertical_tolerance: Float,
}

/// Configuration of the boundary locator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Inlier fraction a column must exceed to be part of the trunk (PERCENT_INLIERS_HIGH).
    pub inliers_high: Float,
    /// Inlier fraction under which the outward extension stops (PERCENT_INLIERS_LOW).
    pub inliers_low: Float,
    /// Interpolated values of the rotated mask above this are foreground.
    pub binarize_epsilon: Float,
}

/// Calibration constants of the depth sensor.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Reference depth of the calibration (m) (CALIB_DEPTH).
    pub depth: Float,
    /// Pixel density at the reference depth (CALIB_PIXELS_PER_METER).
    pub pixels_per_meter: Float,
    /// Empirical correction applied to the angle corrected width (WIDTH_SCALE_FACTOR).
    pub width_scale_factor: Float,
}

/// The two width formulas, each tied to its own calibration regime.
/// They are not interchangeable: pick exactly one per deployment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthModel {
    /// `|depth * pixels / (calib_depth * pixels_per_meter * cos(angle))| * scale`.
    AngleCorrected,
    /// `|depth * pixels| / (calib_depth * pixels_per_meter - pixels / 4)`.
    PixelCorrected,
}

/// Default mode depth configuration: 3cm bins up to the 5m sensor range, 10% tolerance.
pub const DEFAULT_MODE_CONFIG: ModeConfig = ModeConfig {
    bin_size: 0.03,
    sensor_range: 5.0,
    depth_tolerance: 0.1,
};

/// Default denoising configuration.
pub const DEFAULT_DENOISE_CONFIG: DenoiseConfig = DenoiseConfig {
    alpha: 300,
    beta: 0.60,
};

/// Default orientation configuration.
pub const DEFAULT_ORIENTATION_CONFIG: OrientationConfig = OrientationConfig {
    vertical_tolerance: 60.0,
};

/// Default boundary configuration.
pub const DEFAULT_BOUNDARY_CONFIG: BoundaryConfig = BoundaryConfig {
    inliers_high: 0.60,
    inliers_low: 0.50,
    binarize_epsilon: 0.003,
};

/// Calibration of the field capture tool.
pub const DEFAULT_CALIBRATION: Calibration = Calibration {
    depth: 1.0,
    pixels_per_meter: 356.25,
    width_scale_factor: 1.0,
};

/// Default configuration of the pipeline.
pub const DEFAULT_CONFIG: Config = Config {
    shape: (360, 480),
    mode: DEFAULT_MODE_CONFIG,
    denoise: DEFAULT_DENOISE_CONFIG,
    orientation: DEFAULT_ORIENTATION_CONFIG,
    boundary: DEFAULT_BOUNDARY_CONFIG,
    calibration: DEFAULT_CALIBRATION,
    width_model: WidthModel::AngleCorrected,
};

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl Config {
    /// Check that all values make sense together.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));
        let (nb_rows, nb_cols) = self.shape;
        if nb_rows < 2 || nb_cols < 3 {
            return invalid("working shape must be at least 2 rows by 3 columns");
        }
        if !(self.mode.bin_size > 0.0) || !(self.mode.sensor_range > self.mode.bin_size) {
            return invalid("histogram bins must be positive and smaller than the sensor range");
        }
        if !(self.mode.depth_tolerance > 0.0 && self.mode.depth_tolerance < 1.0) {
            return invalid("depth tolerance must be within ]0, 1[");
        }
        if !(self.denoise.beta > 0.0) {
            return invalid("hull density threshold must be positive");
        }
        if !(self.orientation.vertical_tolerance > 0.0 && self.orientation.vertical_tolerance <= 90.0) {
            return invalid("vertical tolerance must be within ]0, 90]");
        }
        let b = &self.boundary;
        if !(0.0 <= b.inliers_low && b.inliers_low <= b.inliers_high && b.inliers_high < 1.0) {
            return invalid("inlier thresholds must satisfy 0 <= low <= high < 1");
        }
        if !(b.binarize_epsilon >= 0.0 && b.binarize_epsilon < 1.0) {
            return invalid("binarization epsilon must be within [0, 1[");
        }
        let c = &self.calibration;
        if !(c.depth > 0.0 && c.pixels_per_meter > 0.0 && c.width_scale_factor > 0.0) {
            return invalid("calibration constants must be positive");
        }
        Ok(())
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Ok(()), DEFAULT_CONFIG.validate());
        assert_eq!(DEFAULT_CONFIG, Config::default());
    }

    #[test]
    fn rejects_swapped_thresholds() {
        let mut config = DEFAULT_CONFIG;
        config.boundary.inliers_low = 0.7;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_calibration() {
        let mut config = DEFAULT_CONFIG;
        config.calibration.pixels_per_meter = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let mut config = DEFAULT_CONFIG;
        config.mode.bin_size = Float::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn json_round_trip() {
        let mut config = DEFAULT_CONFIG;
        config.width_model = WidthModel::PixelCorrected;
        config.denoise.alpha = 150;
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
