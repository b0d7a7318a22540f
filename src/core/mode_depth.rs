// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Most probable trunk depth, and filtering of the depth grid around it.
//!
//! The subject is assumed roughly centered, so the depth histogram
//! is only built over the middle third of the columns.

use log::debug;

use crate::core::config::ModeConfig;
use crate::core::error::Error;
use crate::core::normalize;
use crate::misc::type_aliases::{DepthGrid, Float};

/// Estimate the mode depth of the center region of a depth grid.
///
/// Readings are quantized in bins of `config.bin_size` covering `[0, sensor_range)`.
/// The mode is the center of the most populated bin,
/// ties going to the bin of smallest depth.
/// Fails with `MissingDepth` if the center region has no usable reading,
/// and with `InvalidConfig` if the bins or the sensor range are not positive and finite.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
pub fn estimate(depth: &DepthGrid, config: &ModeConfig) -> Result<Float, Error> {
    let range_ok = config.sensor_range > config.bin_size && config.sensor_range.is_finite();
    if !(config.bin_size > 0.0 && range_ok) {
        return Err(Error::InvalidConfig(format!(
            "no depth histogram with bins of {}m up to {}m",
            config.bin_size, config.sensor_range
        )));
    }
    let nb_bins = (config.sensor_range / config.bin_size).ceil() as usize;
    let mut histogram = vec![0_usize; nb_bins];
    let mut nb_readings = 0;
    for &d in normalize::center_region(depth).iter() {
        if d > 0.0 && d < config.sensor_range {
            let bin = ((d / config.bin_size).floor() as usize).min(nb_bins - 1);
            histogram[bin] += 1;
            nb_readings += 1;
        }
    }
    if nb_readings == 0 {
        return Err(Error::MissingDepth);
    }

    // Strict comparison keeps the first of equally populated bins.
    let mut mode_bin = 0;
    for (bin, &count) in histogram.iter().enumerate() {
        if count > histogram[mode_bin] {
            mode_bin = bin;
        }
    }
    let mode_depth = (mode_bin as Float + 0.5) * config.bin_size;
    debug!(
        "mode depth {:.3}m ({} of {} center readings)",
        mode_depth, histogram[mode_bin], nb_readings
    );
    Ok(mode_depth)
}

/// Zero all readings farther than `depth_tolerance * mode_depth` from the mode depth.
///
/// Every remaining nonzero reading lies in
/// `[(1 - tolerance) * mode_depth, (1 + tolerance) * mode_depth]`.
pub fn filter(depth: &DepthGrid, mode_depth: Float, config: &ModeConfig) -> DepthGrid {
    let max_distance = config.depth_tolerance * mode_depth;
    depth.map(|d| {
        if d > 0.0 && (d - mode_depth).abs() <= max_distance {
            d
        } else {
            0.0
        }
    })
}

// TESTS #############################################################
