// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Left and right boundaries of the trunk, once brought to the vertical.
//!
//! The foreground is rotated by the estimated angle, then columns are
//! scanned with an hysteresis on their fraction of inlier pixels:
//! a boundary is anchored on the first column above the high threshold,
//! and pushed outwards until the fraction drops under the low threshold.

use log::debug;
use nalgebra::DMatrix;

use crate::core::config::BoundaryConfig;
use crate::core::error::Error;
use crate::math::rotation;
use crate::misc::type_aliases::{DepthGrid, Float};

/// Foreground of a depth grid rotated by `angle` degrees.
///
/// Cells with no source pixel inside the original canvas are `None`.
/// Interpolated values above `epsilon` are foreground.
pub fn rotated_foreground(depth: &DepthGrid, angle: Float, epsilon: Float) -> DMatrix<Option<bool>> {
    if angle == 0.0 {
        return depth.map(|d| Some(d > 0.0));
    }
    let binary = depth.map(|d| if d > 0.0 { 1.0 } else { 0.0 });
    rotation::rotate(&binary, angle).map(|v| v.map(|x| x > epsilon))
}

/// Fraction of foreground cells of each column, among its valid cells.
/// `None` for columns without any valid cell.
#[allow(clippy::cast_precision_loss)]
pub fn column_fractions(foreground: &DMatrix<Option<bool>>) -> Vec<Option<Float>> {
    foreground
        .column_iter()
        .map(|column| {
            let nb_valid = column.iter().filter(|cell| cell.is_some()).count();
            let nb_inliers = column.iter().filter(|&&cell| cell == Some(true)).count();
            if nb_valid == 0 {
                None
            } else {
                Some(nb_inliers as Float / nb_valid as Float)
            }
        })
        .collect()
}

/// Inclusive `(left, right)` columns from the per column inlier fractions.
///
/// Fails with `NoBoundaryFound` if no column exceeds the high threshold.
/// Columns without fraction are skipped during the outward extension.
/// An extension reaching the grid edge stops at the last column visited.
pub fn hysteresis(fractions: &[Option<Float>], config: &BoundaryConfig) -> Result<(usize, usize), Error> {
    let is_high = |f: &Option<Float>| f.map_or(false, |f| f > config.inliers_high);
    let left_anchor = fractions.iter().position(is_high).ok_or(Error::NoBoundaryFound)?;
    let right_anchor = fractions.iter().rposition(is_high).ok_or(Error::NoBoundaryFound)?;
    let left = extend(fractions, left_anchor, (0..left_anchor).rev(), config.inliers_low);
    let right = extend(
        fractions,
        right_anchor,
        right_anchor + 1..fractions.len(),
        config.inliers_low,
    );
    Ok((left, right))
}

/// Push a boundary from `anchor` through the `outwards` columns,
/// stopping before the first one under `low`.
fn extend<I>(fractions: &[Option<Float>], anchor: usize, outwards: I, low: Float) -> usize
where
    I: Iterator<Item = usize>,
{
    let mut boundary = anchor;
    for col in outwards {
        match fractions[col] {
            None => continue,
            Some(f) if f < low => break,
            Some(_) => boundary = col,
        }
    }
    boundary
}

/// Locate the trunk boundaries of a denoised depth grid,
/// in the frame rotated by `angle` degrees.
pub fn locate(depth: &DepthGrid, angle: Float, config: &BoundaryConfig) -> Result<(usize, usize), Error> {
    let foreground = rotated_foreground(depth, angle, config.binarize_epsilon);
    let fractions = column_fractions(&foreground);
    let (left, right) = hysteresis(&fractions, config)?;
    debug!("boundaries at columns {} and {} (rotated by {:.2})", left, right, angle);
    Ok((left, right))
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::core::config::DEFAULT_BOUNDARY_CONFIG;
    use quickcheck_macros;

    fn vertical_bar(shape: (usize, usize), start: usize, end: usize) -> DepthGrid {
        DMatrix::from_fn(shape.0, shape.1, |_, c| if c >= start && c < end { 1.2 } else { 0.0 })
    }

    #[test]
    fn vertical_bar_inclusive_span() {
        let depth = vertical_bar((360, 480), 230, 250);
        assert_eq!(Ok((230, 249)), locate(&depth, 0.0, &DEFAULT_BOUNDARY_CONFIG));
    }

    #[test]
    fn empty_foreground_has_no_boundary() {
        let depth = DMatrix::zeros(60, 80);
        assert_eq!(
            Err(Error::NoBoundaryFound),
            locate(&depth, 0.0, &DEFAULT_BOUNDARY_CONFIG)
        );
        // A short blob never reaches the high threshold.
        let mut depth = DMatrix::zeros(60, 80);
        for r in 0..20 {
            for c in 30..40 {
                depth[(r, c)] = 1.0;
            }
        }
        assert_eq!(
            Err(Error::NoBoundaryFound),
            locate(&depth, 0.0, &DEFAULT_BOUNDARY_CONFIG)
        );
    }

    #[test]
    fn hysteresis_extends_outwards() {
        let fractions = vec![
            Some(0.2),
            Some(0.55),
            None,
            Some(0.52),
            Some(0.9),
            Some(1.0),
            Some(0.58),
            Some(0.1),
        ];
        assert_eq!(Ok((1, 6)), hysteresis(&fractions, &DEFAULT_BOUNDARY_CONFIG));
    }

    #[test]
    fn hysteresis_reaching_edges() {
        let fractions = vec![None, Some(0.55), Some(0.9), Some(0.5), None];
        assert_eq!(Ok((1, 3)), hysteresis(&fractions, &DEFAULT_BOUNDARY_CONFIG));
    }

    #[test]
    fn hysteresis_ignores_gaps_inside() {
        // Anchors are the outermost high columns, whatever is between them.
        let fractions = vec![Some(0.0), Some(0.8), Some(0.1), Some(0.8), Some(0.0)];
        assert_eq!(Ok((1, 3)), hysteresis(&fractions, &DEFAULT_BOUNDARY_CONFIG));
    }

    #[test]
    fn corners_are_not_counted() {
        let depth = vertical_bar((60, 80), 35, 45);
        let foreground = rotated_foreground(&depth, 30.0, DEFAULT_BOUNDARY_CONFIG.binarize_epsilon);
        assert_eq!(None, foreground[(0, 0)]);
        let fractions = column_fractions(&foreground);
        assert!(fractions.iter().all(|f| f.map_or(true, |f| f >= 0.0 && f <= 1.0)));
    }

    #[test]
    fn tilted_bar_is_straightened() {
        // Bar leaning by one column every two rows, straightened by the
        // rotation bringing its axis to the vertical.
        let (nb_rows, nb_cols) = (200, 200);
        let depth = DMatrix::from_fn(nb_rows, nb_cols, |r, c| {
            let axis = 100.0 + 0.5 * (r as Float - 100.0);
            if (c as Float - axis).abs() <= 10.0 {
                1.0
            } else {
                0.0
            }
        });
        let angle = 90.0 - (2.0 as Float).atan2(1.0).to_degrees();
        let (left, right) = locate(&depth, angle, &DEFAULT_BOUNDARY_CONFIG).unwrap();
        // Perpendicular width of the bar: 20 / sqrt(1.25) ~ 17.9 pixels.
        let span = right - left;
        assert!(span >= 15 && span <= 20, "span: {}", span);
        assert!(left > 80 && right < 120);
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn left_never_after_right(values: Vec<Option<u8>>) -> bool {
        let fractions: Vec<Option<Float>> = values
            .iter()
            .map(|v| v.map(|x| Float::from(x) / 255.0))
            .collect();
        match hysteresis(&fractions, &DEFAULT_BOUNDARY_CONFIG) {
            Err(_) => true,
            Ok((left, right)) => left <= right && right < fractions.len(),
        }
    }
}
