// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Miscellaneous helper functions that didn't fit elsewhere.

use nalgebra::{DMatrix, Scalar};

use crate::misc::type_aliases::{DepthGrid, Float, Mask, Pixel};

/// Map a function onto a matrix, at positions given by a mask.
/// A default value is used at the other positions.
pub fn zip_mask_map<T, U, F>(mat: &DMatrix<T>, mask: &DMatrix<bool>, default: U, f: F) -> DMatrix<U>
where
    T: Scalar + Copy,
    U: Scalar + Copy,
    F: Fn(T) -> U,
{
    mat.zip_map(mask, |x, is_true| if is_true { f(x) } else { default })
}

/// Foreground of a depth grid: every cell with a reading.
pub fn nonzero_mask(depth: &DepthGrid) -> Mask {
    depth.map(|d| d > 0.0)
}

/// Keep depth values inside the mask, zero elsewhere.
pub fn masked(depth: &DepthGrid, mask: &Mask) -> DepthGrid {
    zip_mask_map(depth, mask, 0.0, |d| d)
}

/// Coordinates `(row, column)` of all the pixels set in a mask,
/// in row-major order.
pub fn pixels(mask: &Mask) -> Vec<Pixel> {
    let (nb_rows, nb_cols) = mask.shape();
    let mut coordinates = Vec::new();
    for row in 0..nb_rows {
        for col in 0..nb_cols {
            if mask[(row, col)] {
                coordinates.push((row, col));
            }
        }
    }
    coordinates
}

/// Number of cells set in a mask.
pub fn count(mask: &Mask) -> usize {
    mask.iter().filter(|&&x| x).count()
}

/// Mean column of a set of pixels. Returns 0 for an empty set.
#[allow(clippy::cast_precision_loss)]
pub fn mean_column(coordinates: &[Pixel]) -> Float {
    if coordinates.is_empty() {
        return 0.0;
    }
    let sum: usize = coordinates.iter().map(|&(_, col)| col).sum();
    sum as Float / coordinates.len() as Float
}

// TESTS #############################################################
