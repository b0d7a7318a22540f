// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lean angle of the trunk, from the principal axes of its pixels.

use log::{debug, warn};

use crate::core::config::OrientationConfig;
use crate::core::error::Error;
use crate::math::pca;
use crate::misc::helper;
use crate::misc::type_aliases::{DepthGrid, Float, Vec2};

/// Angle (degrees) of an axis `(row, column)` from the horizontal axis,
/// in `[0, 180)`. An axis and its opposite have the same angle.
pub fn axis_angle(axis: &Vec2) -> Float {
    let angle = axis[0].atan2(axis[1]).to_degrees();
    let reduced = angle.rem_euclid(180.0);
    // rem_euclid may round up to the modulus for tiny negative angles.
    if reduced >= 180.0 {
        0.0
    } else {
        reduced
    }
}

/// Rotation angle (degrees) that brings the trunk axis to the vertical.
///
/// The trunk axis is the principal axis within `vertical_tolerance` of the vertical,
/// the first one being preferred. The result is `90 - axis_angle`, in `(-90, 90]`.
/// Fails with `NoTrunkFound` for masks where the decomposition is degenerate:
/// less than two distinct pixels, or all pixels on a single row.
#[allow(clippy::cast_precision_loss)]
pub fn rotation_angle(depth: &DepthGrid, config: &OrientationConfig) -> Result<Float, Error> {
    let pixels = helper::pixels(&helper::nonzero_mask(depth));
    let first_row = pixels.first().map(|&(row, _)| row);
    if pixels.iter().all(|&(row, _)| Some(row) == first_row) {
        return Err(Error::NoTrunkFound);
    }
    let points: Vec<Vec2> = pixels
        .iter()
        .map(|&(row, col)| Vec2::new(row as Float, col as Float))
        .collect();
    let principal = pca::principal_axes(&points).ok_or(Error::NoTrunkFound)?;

    let angles = [
        axis_angle(&principal.axes[0]),
        axis_angle(&principal.axes[1]),
    ];
    let is_upright = |angle: Float| (90.0 - angle).abs() < config.vertical_tolerance;
    let selected = if is_upright(angles[0]) {
        angles[0]
    } else if is_upright(angles[1]) {
        angles[1]
    } else {
        warn!(
            "no principal axis within {} degrees of vertical, using the first one",
            config.vertical_tolerance
        );
        angles[0]
    };
    let rotation = 90.0 - selected;
    debug!(
        "principal axes at {:.2} and {:.2} degrees (explained {:.3}), rotation {:.2}",
        angles[0], angles[1], principal.explained_variance_ratio[0], rotation
    );
    Ok(rotation)
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::core::config::DEFAULT_ORIENTATION_CONFIG;
    use approx;
    use nalgebra::DMatrix;
    use quickcheck_macros;

    /// Depth grid with a straight band of the given half width along a line
    /// going through the center with `slope` columns per row.
    fn band(shape: (usize, usize), slope: Float, half_width: Float) -> DepthGrid {
        let center_row = shape.0 as Float / 2.0;
        let center_col = shape.1 as Float / 2.0;
        DMatrix::from_fn(shape.0, shape.1, |r, c| {
            let axis_col = center_col + slope * (r as Float - center_row);
            if (c as Float - axis_col).abs() <= half_width {
                2.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn axis_angles() {
        assert!(approx::relative_eq!(90.0, axis_angle(&Vec2::new(1.0, 0.0))));
        assert!(approx::relative_eq!(90.0, axis_angle(&Vec2::new(-1.0, 0.0))));
        assert!(approx::relative_eq!(45.0, axis_angle(&Vec2::new(1.0, 1.0))));
        assert!(approx::relative_eq!(45.0, axis_angle(&Vec2::new(-1.0, -1.0))));
        assert!(approx::relative_eq!(135.0, axis_angle(&Vec2::new(1.0, -1.0))));
        assert_eq!(0.0, axis_angle(&Vec2::new(-1e-20, 1.0)));
    }

    #[test]
    fn vertical_trunk_needs_no_rotation() {
        let depth = band((120, 160), 0.0, 8.0);
        let angle = rotation_angle(&depth, &DEFAULT_ORIENTATION_CONFIG).unwrap();
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn leaning_trunk() {
        // One column to the right every two rows down: the axis is at atan2(2, 1) from
        // the horizontal, and needs a rotation of 90 - 63.43 degrees.
        let depth = band((200, 200), 0.5, 6.0);
        let angle = rotation_angle(&depth, &DEFAULT_ORIENTATION_CONFIG).unwrap();
        let expected = 90.0 - (2.0 as Float).atan2(1.0).to_degrees();
        assert!((angle - expected).abs() < 1.0);
    }

    #[test]
    fn wide_trunk_still_vertical() {
        // Wider than tall: the first axis is horizontal, the second one is picked.
        let depth = band((40, 200), 0.0, 60.0);
        let angle = rotation_angle(&depth, &DEFAULT_ORIENTATION_CONFIG).unwrap();
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn degenerate_masks() {
        let config = DEFAULT_ORIENTATION_CONFIG;
        let empty = DMatrix::zeros(10, 10);
        assert_eq!(Err(Error::NoTrunkFound), rotation_angle(&empty, &config));
        let mut single = DMatrix::zeros(10, 10);
        single[(4, 4)] = 1.0;
        assert_eq!(Err(Error::NoTrunkFound), rotation_angle(&single, &config));
        let mut horizontal = DMatrix::zeros(10, 10);
        for c in 2..8 {
            horizontal[(5, c)] = 1.0;
        }
        assert_eq!(Err(Error::NoTrunkFound), rotation_angle(&horizontal, &config));
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn angle_in_half_open_range(pixels: Vec<(u8, u8)>) -> bool {
        let mut depth = DMatrix::zeros(32, 32);
        for &(r, c) in &pixels {
            depth[(usize::from(r % 32), usize::from(c % 32))] = 1.0;
        }
        match rotation_angle(&depth, &DEFAULT_ORIENTATION_CONFIG) {
            Err(_) => true,
            Ok(angle) => angle > -90.0 && angle <= 90.0,
        }
    }
}
