// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failures of the trunk width estimation pipeline.

/// Every way the processing of a capture can fail.
///
/// Failures are raised at the boundary of the stage detecting them
/// and reach the pipeline caller unmodified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The center region of the capture has no usable depth reading.
    /// A new capture is needed.
    #[error("unable to process capture, no depth points found in the center region")]
    MissingDepth,

    /// No trunk survived the denoising, or the trunk pixels are numerically degenerate.
    #[error("no trunk found in the filtered depth")]
    NoTrunkFound,

    /// No column of the rotated trunk mask is dense enough to be a trunk boundary.
    #[error("no column crosses the high inlier threshold, trunk boundaries not found")]
    NoBoundaryFound,

    /// Inputs are inconsistent (dimensions mismatch, empty grids, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The configuration has nonsensical values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
