// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Type aliases for common types used all over the code base.

use nalgebra as na;

/// Depth readings and geometry are computed in f64.
/// Pixel coordinates of a full frame summed over many points lose precision in f32.
pub type Float = f64;

/// A vector with two Float coordinates.
pub type Vec2 = na::Vector2<Float>;
/// A 2x2 matrix of Floats.
pub type Mat2 = na::Matrix2<Float>;

/// A grid of depth values in meters, 0 meaning "no reading".
/// Rows follow the image height, columns the image width.
pub type DepthGrid = na::DMatrix<Float>;

/// A binary foreground mask with the same layout as a `DepthGrid`.
pub type Mask = na::DMatrix<bool>;

/// `(row, column)` coordinates of a pixel.
pub type Pixel = (usize, usize);
