// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bring depth grids and color images to a common working resolution.

use image::{imageops, DynamicImage, RgbImage};
use nalgebra::{DMatrix, DMatrixView};

use crate::core::error::Error;
use crate::misc::helper;
use crate::misc::type_aliases::{DepthGrid, Float, Mask};

/// Color image co-registered with a depth grid.
pub type ColorImage = RgbImage;

/// A depth grid and a color image at the same working resolution.
#[derive(Clone, Debug)]
pub struct Capture {
    depth: DepthGrid,
    color: ColorImage,
}

impl Capture {
    /// Bundle a depth grid and a color image already at the same resolution.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(depth: DepthGrid, color: ColorImage) -> Result<Self, Error> {
        let (nb_rows, nb_cols) = depth.shape();
        if color.dimensions() != (nb_cols as u32, nb_rows as u32) {
            return Err(Error::InvalidInput(format!(
                "color image is {:?} but depth grid is {}x{}",
                color.dimensions(),
                nb_cols,
                nb_rows
            )));
        }
        Ok(Self { depth, color })
    }

    /// Resample a raw depth grid and a color image to the working `shape`.
    pub fn from_raw(
        depth: &DepthGrid,
        color: &DynamicImage,
        shape: (usize, usize),
    ) -> Result<Self, Error> {
        let depth = resize_depth(depth, shape)?;
        let color = resize_color(color, shape);
        Self::new(depth, color)
    }

    /// The depth grid (m).
    pub fn depth(&self) -> &DepthGrid {
        &self.depth
    }

    /// The color image.
    pub fn color(&self) -> &ColorImage {
        &self.color
    }
}

/// Nearest neighbour resampling of a depth grid to `(rows, columns)`.
///
/// Depth readings are never blended: with an integer upsampling factor,
/// each reading is replicated in a block of `factor x factor` cells.
pub fn resize_depth(depth: &DepthGrid, shape: (usize, usize)) -> Result<DepthGrid, Error> {
    let (src_rows, src_cols) = depth.shape();
    let (nb_rows, nb_cols) = shape;
    if src_rows == 0 || src_cols == 0 || nb_rows == 0 || nb_cols == 0 {
        return Err(Error::InvalidInput("empty depth grid".to_string()));
    }
    Ok(DMatrix::from_fn(nb_rows, nb_cols, |row, col| {
        depth[(row * src_rows / nb_rows, col * src_cols / nb_cols)]
    }))
}

/// Resample a color image to `(rows, columns)`, dropping the alpha channel if any.
#[allow(clippy::cast_possible_truncation)]
pub fn resize_color(color: &DynamicImage, shape: (usize, usize)) -> ColorImage {
    let (nb_rows, nb_cols) = shape;
    let rgb = color.to_rgb8();
    if rgb.dimensions() == (nb_cols as u32, nb_rows as u32) {
        return rgb;
    }
    imageops::resize(
        &rgb,
        nb_cols as u32,
        nb_rows as u32,
        imageops::FilterType::Triangle,
    )
}

/// Column range `[start, end)` of the middle third of a grid with `nb_cols` columns.
pub fn center_bounds(nb_cols: usize) -> (usize, usize) {
    let third = nb_cols / 3;
    (third, 2 * third)
}

/// View on the middle third of the columns of a depth grid.
pub fn center_region(depth: &DepthGrid) -> DMatrixView<'_, Float> {
    let (start, end) = center_bounds(depth.ncols());
    depth.columns(start, end - start)
}

/// Zero the depth readings outside of an externally provided foreground mask.
pub fn apply_foreground_mask(depth: &DepthGrid, mask: &Mask) -> Result<DepthGrid, Error> {
    if depth.shape() != mask.shape() {
        return Err(Error::InvalidInput(format!(
            "foreground mask is {:?} but depth grid is {:?}",
            mask.shape(),
            depth.shape()
        )));
    }
    Ok(helper::masked(depth, mask))
}

// TESTS #############################################################
