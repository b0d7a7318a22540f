// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Metric width of the trunk from its pixel span.

use log::debug;

use crate::core::config::{Calibration, WidthModel};
use crate::core::error::Error;
use crate::misc::type_aliases::Float;

/// Width (m) of a trunk at `depth` (m) spanning columns `left` to `right`,
/// after a rotation of `angle` degrees.
///
/// The result is never negative, and zero only for an empty span.
/// Fails with `InvalidInput` if the model denominator is not positive,
/// which happens for a trunk lying horizontally, or for a span too wide
/// for the pixel corrected calibration.
#[allow(clippy::cast_precision_loss)]
pub fn estimate(
    depth: Float,
    (left, right): (usize, usize),
    angle: Float,
    calibration: &Calibration,
    model: WidthModel,
) -> Result<Float, Error> {
    let nb_pixels = right.saturating_sub(left) as Float;
    let reference = calibration.depth * calibration.pixels_per_meter;
    let width = match model {
        WidthModel::AngleCorrected => {
            let denominator = reference * angle.to_radians().cos();
            if !(denominator.abs() > Float::EPSILON) {
                return Err(Error::InvalidInput(format!(
                    "no angle corrected width at {} degrees",
                    angle
                )));
            }
            (depth * nb_pixels / denominator).abs() * calibration.width_scale_factor
        }
        WidthModel::PixelCorrected => {
            let denominator = reference - nb_pixels / 4.0;
            if !(denominator > 0.0) {
                return Err(Error::InvalidInput(format!(
                    "span of {} pixels too wide for the pixel corrected width",
                    nb_pixels
                )));
            }
            (depth * nb_pixels).abs() / denominator
        }
    };
    debug!("{:?} width of {} pixels at {:.3}m: {:.4}m", model, nb_pixels, depth, width);
    Ok(width)
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::core::config::DEFAULT_CALIBRATION;
    use approx;
    use quickcheck_macros;

    const EPSILON: Float = 1e-12;

    #[test]
    fn angle_corrected_at_reference_depth() {
        // 356.25 pixels at the calibration depth is one meter.
        let width = estimate(1.0, (0, 356), 0.0, &DEFAULT_CALIBRATION, WidthModel::AngleCorrected);
        assert!(approx::relative_eq!(
            356.0 / 356.25,
            width.unwrap(),
            epsilon = EPSILON
        ));
    }

    #[test]
    fn angle_corrected_grows_with_depth_and_lean() {
        let calib = DEFAULT_CALIBRATION;
        let straight = estimate(1.0, (100, 140), 0.0, &calib, WidthModel::AngleCorrected).unwrap();
        let far = estimate(2.0, (100, 140), 0.0, &calib, WidthModel::AngleCorrected).unwrap();
        let leaning = estimate(1.0, (100, 140), 60.0, &calib, WidthModel::AngleCorrected).unwrap();
        assert!(approx::relative_eq!(2.0 * straight, far, epsilon = EPSILON));
        assert!(approx::relative_eq!(2.0 * straight, leaning, epsilon = 1e-9));
        let scaled = Calibration {
            width_scale_factor: 1.1,
            ..calib
        };
        let corrected = estimate(1.0, (100, 140), 0.0, &scaled, WidthModel::AngleCorrected).unwrap();
        assert!(approx::relative_eq!(1.1 * straight, corrected, epsilon = EPSILON));
    }

    #[test]
    fn pixel_corrected() {
        let width = estimate(1.5, (220, 260), 12.0, &DEFAULT_CALIBRATION, WidthModel::PixelCorrected);
        let expected = 1.5 * 40.0 / (356.25 - 10.0);
        assert!(approx::relative_eq!(expected, width.unwrap(), epsilon = EPSILON));
    }

    #[test]
    fn degenerate_denominators() {
        let calib = DEFAULT_CALIBRATION;
        assert!(matches!(
            estimate(1.0, (0, 10), 90.0, &calib, WidthModel::AngleCorrected),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            estimate(1.0, (0, 2000), 0.0, &calib, WidthModel::PixelCorrected),
            Err(Error::InvalidInput(_))
        ));
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn width_is_zero_only_for_empty_span(left: u8, span: u8, depth: u8, angle: i8) -> bool {
        let depth = 0.5 + Float::from(depth) / 100.0;
        let angle = Float::from(angle) / 3.0;
        let left = usize::from(left);
        let right = left + usize::from(span);
        [WidthModel::AngleCorrected, WidthModel::PixelCorrected]
            .iter()
            .all(|&model| match estimate(depth, (left, right), angle, &DEFAULT_CALIBRATION, model) {
                Err(_) => false,
                Ok(width) => width >= 0.0 && ((width == 0.0) == (span == 0)),
            })
    }
}
