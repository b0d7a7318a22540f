// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Trunk width estimation from a time-of-flight depth capture.
//!
//! A capture is a depth grid (meters, 0 for missing readings)
//! co-registered with a color image at a common working resolution.
//! Processing finds the most probable trunk depth in the center of the frame,
//! keeps the dense silhouette around it, brings it to the vertical,
//! locates its left and right boundaries and converts their distance
//! into a metric width with the sensor calibration.
//!
//! ```ignore
//! use trunk_width::core::config::DEFAULT_CONFIG;
//! let measurement = DEFAULT_CONFIG.process(&depth)?;
//! println!("width: {:.3}m at {:.2}m", measurement.width, measurement.depth);
//! ```

pub mod core;
pub mod dataset;
pub mod math;
pub mod misc;
