// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bilinear interpolation and in-place rotation of grids.

use nalgebra::DMatrix;

use crate::misc::type_aliases::Float;

/// Positions this close outside of the grid are snapped on its border.
const BORDER_TOLERANCE: Float = 1e-9;

/// Rotate a grid about its center, keeping its dimensions.
///
/// The angle is in degrees, positive angles turn the column axis
/// towards the row axis (clockwise on screen, with rows going down).
/// A direction at angle `a` from the column axis ends at angle `a + angle`.
///
/// Each output cell is bilinearly interpolated from the input grid.
/// Cells whose source falls outside of the input canvas are `None`.
#[allow(clippy::cast_precision_loss)]
pub fn rotate(mat: &DMatrix<Float>, angle: Float) -> DMatrix<Option<Float>> {
    let (nb_rows, nb_cols) = mat.shape();
    let (sin, cos) = angle.to_radians().sin_cos();
    let center_x = (nb_cols as Float - 1.0) / 2.0;
    let center_y = (nb_rows as Float - 1.0) / 2.0;
    DMatrix::from_fn(nb_rows, nb_cols, |row, col| {
        // Inverse mapping: apply the opposite rotation to the destination.
        let dx = col as Float - center_x;
        let dy = row as Float - center_y;
        let x = cos * dx + sin * dy + center_x;
        let y = -sin * dx + cos * dy + center_y;
        interpolate(x, y, mat)
    })
}

/// Bilinear interpolation of a grid at the position `(x, y)`,
/// `x` being the column coordinate and `y` the row coordinate.
///
/// Returns `None` if the position is outside of the grid.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate(x: Float, y: Float, mat: &DMatrix<Float>) -> Option<Float> {
    let (nb_rows, nb_cols) = mat.shape();
    let max_x = nb_cols as Float - 1.0;
    let max_y = nb_rows as Float - 1.0;
    let inside = |t: Float, max: Float| t >= -BORDER_TOLERANCE && t <= max + BORDER_TOLERANCE;
    if !(inside(x, max_x) && inside(y, max_y)) {
        return None;
    }
    let x = x.max(0.0).min(max_x);
    let y = y.max(0.0).min(max_y);
    // Last row or column: reuse the previous cell with a unit coefficient.
    let u = (x.floor() as usize).min(nb_cols.saturating_sub(2));
    let v = (y.floor() as usize).min(nb_rows.saturating_sub(2));
    let u1 = (u + 1).min(nb_cols - 1);
    let v1 = (v + 1).min(nb_rows - 1);
    let (a, b, c, d) = linear_coefficients(x - u as Float, y - v as Float);
    Some(a * mat[(v, u)] + b * mat[(v1, u)] + c * mat[(v, u1)] + d * mat[(v1, u1)])
}

/// Bilinear coefficients of the four neighbours
/// `(v,u)`, `(v+1,u)`, `(v,u+1)` and `(v+1,u+1)`,
/// for fractional offsets `a` along columns and `b` along rows.
fn linear_coefficients(a: Float, b: Float) -> (Float, Float, Float, Float) {
    let _a = 1.0 - a;
    let _b = 1.0 - b;
    (_a * _b, _a * b, a * _b, a * b)
}

// TESTS #############################################################
