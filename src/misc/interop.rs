// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interoperability conversions between the image and matrix types.

use image::{GrayImage, ImageBuffer, Luma};
use nalgebra::DMatrix;

use crate::misc::type_aliases::Mask;

/// Convert a boolean mask into a binary `GrayImage` (0 or 255).
///
/// Performs a transposition to accomodate for the
/// column major matrix into the row major image.
#[allow(clippy::cast_possible_truncation)]
pub fn image_from_mask(mask: &Mask) -> GrayImage {
    let (nb_rows, nb_cols) = mask.shape();
    let mut img_buf = GrayImage::new(nb_cols as u32, nb_rows as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        *pixel = Luma([if mask[(y as usize, x as usize)] { 255 } else { 0 }]);
    }
    img_buf
}

/// Convert an image of labels into a matrix of labels.
/// Inverse layout operation of `image_from_mask`.
pub fn matrix_from_labels(labels: &ImageBuffer<Luma<u32>, Vec<u32>>) -> DMatrix<u32> {
    let (width, height) = labels.dimensions();
    DMatrix::from_row_slice(height as usize, width as usize, labels.as_raw())
}

// TESTS #############################################################
