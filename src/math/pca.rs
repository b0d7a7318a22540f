// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Principal component analysis of a 2D point set.
//!
//! This is a pure function over the points, there is no fitted model kept around.

use crate::misc::type_aliases::{Float, Mat2, Vec2};

/// The two principal axes of a point set.
#[derive(Clone, Debug, PartialEq)]
pub struct PrincipalAxes {
    /// Centroid of the points.
    pub mean: Vec2,
    /// Unit directions, ranked by decreasing variance.
    pub axes: [Vec2; 2],
    /// Variance of the points along each axis.
    pub variances: [Float; 2],
    /// Fraction of the total variance explained by each axis.
    pub explained_variance_ratio: [Float; 2],
}

/// Compute the principal axes of a set of 2D points.
///
/// Returns `None` if the decomposition is not defined,
/// i.e. with less than two points or when all points are identical.
#[allow(clippy::cast_precision_loss)]
pub fn principal_axes(points: &[Vec2]) -> Option<PrincipalAxes> {
    let nb_points = points.len();
    if nb_points < 2 {
        return None;
    }

    // Two passes for the covariance: centroid first, then centered moments.
    let mean = points.iter().fold(Vec2::zeros(), |acc, p| acc + p) / nb_points as Float;
    let mut covariance = Mat2::zeros();
    for p in points {
        let centered = p - mean;
        covariance += centered * centered.transpose();
    }
    covariance /= (nb_points - 1) as Float;

    let total_variance = covariance.trace();
    if !(total_variance > 0.0) || !total_variance.is_finite() {
        return None;
    }

    let eigen = covariance.symmetric_eigen();
    let (first, second) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        (0, 1)
    } else {
        (1, 0)
    };
    // Numerical noise can produce tiny negative eigenvalues for collinear points.
    let variances = [
        eigen.eigenvalues[first].max(0.0),
        eigen.eigenvalues[second].max(0.0),
    ];
    let axes = [
        eigen.eigenvectors.column(first).normalize(),
        eigen.eigenvectors.column(second).normalize(),
    ];
    let sum = variances[0] + variances[1];
    Some(PrincipalAxes {
        mean,
        axes,
        variances,
        explained_variance_ratio: [variances[0] / sum, variances[1] / sum],
    })
}

// TESTS #############################################################
