// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Full processing of one capture, from depth grid to trunk width.
//!
//! Stages run strictly in order, each one consuming the complete output
//! of the previous one: mode depth, filtering, denoising, orientation,
//! boundaries and width. Any failure is returned as is to the caller.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::core::error::Error;
use crate::core::normalize::{self, Capture};
use crate::core::{boundary, denoise, mode_depth, orientation, width};
use crate::misc::type_aliases::{DepthGrid, Float, Mask};

/// Result of the processing of one capture.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Rotation (degrees) bringing the trunk to the vertical.
    pub angle: Float,
    /// Left boundary column, in the rotated frame.
    pub left: usize,
    /// Right boundary column (inclusive), in the rotated frame.
    pub right: usize,
    /// Estimated trunk depth (m).
    pub depth: Float,
    /// Estimated trunk width (m).
    pub width: Float,
}

impl Config {
    /// Measure the trunk in a depth grid at the working resolution.
    pub fn process(&self, depth: &DepthGrid) -> Result<Measurement, Error> {
        self.validate()?;
        if depth.shape() != self.shape {
            return Err(Error::InvalidInput(format!(
                "depth grid is {:?} but working shape is {:?}",
                depth.shape(),
                self.shape
            )));
        }
        let mode = mode_depth::estimate(depth, &self.mode)?;
        let filtered = mode_depth::filter(depth, mode, &self.mode);
        let denoised = denoise::denoise(&filtered, &self.denoise)?;
        debug!(
            "denoising removed {} of {} components",
            denoised.nb_removed, denoised.nb_components
        );
        let angle = orientation::rotation_angle(&denoised.depth, &self.orientation)?;
        let (left, right) = boundary::locate(&denoised.depth, angle, &self.boundary)?;
        let width = width::estimate(mode, (left, right), angle, &self.calibration, self.width_model)?;
        let measurement = Measurement {
            angle,
            left,
            right,
            depth: mode,
            width,
        };
        debug!("{:?}", measurement);
        Ok(measurement)
    }

    /// Measure the trunk in a capture, restricted to an optional foreground mask.
    pub fn process_capture(&self, capture: &Capture, mask: Option<&Mask>) -> Result<Measurement, Error> {
        match mask {
            None => self.process(capture.depth()),
            Some(mask) => self.process(&normalize::apply_foreground_mask(capture.depth(), mask)?),
        }
    }
}

// TESTS #############################################################
