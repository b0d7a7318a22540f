// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Removal of noise components from the filtered depth.
//!
//! At the working resolution a trunk silhouette is dense, while branches
//! and background fragments are sparse clusters around it.
//! Speckles are first pruned by size, then the components farthest
//! (horizontally) from the largest one are removed one at a time
//! until the remaining pixels densely fill their convex hull.

use image::Luma;
use imageproc::point::Point;
use imageproc::region_labelling::{connected_components, Connectivity};
use itertools::Itertools;
use log::debug;

use crate::core::config::DenoiseConfig;
use crate::core::error::Error;
use crate::math::hull;
use crate::misc::type_aliases::{DepthGrid, Float, Mask, Pixel};
use crate::misc::{helper, interop};

/// A 4-connected set of foreground pixels.
#[derive(Clone, Debug)]
pub struct Component {
    /// Label of the component, increasing in raster order.
    pub label: u32,
    /// `(row, column)` coordinates of its pixels.
    pub pixels: Vec<Pixel>,
    /// Mean column of its pixels.
    pub mean_column: Float,
}

/// Result of the denoising.
#[derive(Clone, Debug)]
pub struct Denoised {
    /// Filtered depth restricted to the retained components.
    pub depth: DepthGrid,
    /// Number of components left after pruning small ones.
    pub nb_components: usize,
    /// Number of components removed by the density iterations.
    pub nb_removed: usize,
    /// Number of inlier pixels at the start of each iteration, and at the end.
    pub inlier_counts: Vec<usize>,
}

/// Label the 4-connected components of a mask.
///
/// Components are returned in label order (raster order of their first pixel).
#[allow(clippy::cast_possible_truncation)]
pub fn components(mask: &Mask) -> Vec<Component> {
    let labels = connected_components(
        &interop::image_from_mask(mask),
        Connectivity::Four,
        Luma([0_u8]),
    );
    let labels = interop::matrix_from_labels(&labels);
    let nb_labels = labels.iter().max().copied().unwrap_or(0) as usize;
    let mut pixels: Vec<Vec<Pixel>> = vec![Vec::new(); nb_labels];
    let (nb_rows, nb_cols) = labels.shape();
    for row in 0..nb_rows {
        for col in 0..nb_cols {
            let label = labels[(row, col)] as usize;
            if label > 0 {
                pixels[label - 1].push((row, col));
            }
        }
    }
    pixels
        .into_iter()
        .enumerate()
        .filter(|(_, p)| !p.is_empty())
        .map(|(index, p)| Component {
            label: index as u32 + 1,
            mean_column: helper::mean_column(&p),
            pixels: p,
        })
        .collect()
}

/// Remove every component with less than `alpha` pixels.
pub fn prune_small(mask: &Mask, alpha: usize) -> Mask {
    let mut pruned = mask.clone();
    for component in components(mask) {
        if component.pixels.len() < alpha {
            for &p in &component.pixels {
                pruned[p] = false;
            }
        }
    }
    pruned
}

/// Order in which components are removed: farthest mean column
/// from the target first, ties in label order.
///
/// The target is the largest component, the first one in label order if several.
/// It always comes last, so it survives any run of at most `n - 1` removals.
pub fn removal_order(components: &[Component]) -> Vec<usize> {
    let target = match components
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
            Some((_, size)) if size >= c.pixels.len() => best,
            _ => Some((i, c.pixels.len())),
        }) {
        Some((i, _)) => i,
        None => return Vec::new(),
    };
    let target_column = components[target].mean_column;
    (0..components.len())
        .sorted_by(|&a, &b| {
            let da = (components[a].mean_column - target_column).abs();
            let db = (components[b].mean_column - target_column).abs();
            db.partial_cmp(&da)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then((a == target).cmp(&(b == target)))
                .then(components[a].label.cmp(&components[b].label))
        })
        .collect()
}

/// Denoise a filtered depth grid.
///
/// Fails with `NoTrunkFound` if no component has at least `alpha` pixels.
/// Otherwise at least one component is always retained.
pub fn denoise(filtered: &DepthGrid, config: &DenoiseConfig) -> Result<Denoised, Error> {
    let pruned = prune_small(&helper::nonzero_mask(filtered), config.alpha);
    let components = components(&pruned);
    if components.is_empty() {
        return Err(Error::NoTrunkFound);
    }
    let nb_components = components.len();
    debug!("{} components of at least {} pixels", nb_components, config.alpha);

    // The hull of a union is the hull of the union of hull vertices,
    // so only vertices are kept in the working set.
    let vertices: Vec<Vec<Point<i64>>> = components
        .iter()
        .map(|c| hull::convex_hull(&c.pixels))
        .collect();
    let order = removal_order(&components);
    let mut retained = vec![true; nb_components];
    let mut nb_retained = nb_components;
    let mut nb_inliers = helper::count(&pruned);
    let mut inlier_counts = vec![nb_inliers];
    let mut next = 0;

    while nb_retained > 1 {
        let union: Vec<Point<i64>> = vertices
            .iter()
            .zip(&retained)
            .filter(|&(_, &kept)| kept)
            .flat_map(|(v, _)| v.iter().copied())
            .collect();
        let hull_area = hull::area(&hull::hull_of_points(&union));
        #[allow(clippy::cast_precision_loss)]
        let density = if hull_area > 0.0 {
            nb_inliers as Float / hull_area
        } else {
            Float::INFINITY
        };
        debug!(
            "{} components, {} inliers, hull density {:.3}",
            nb_retained, nb_inliers, density
        );
        if density > config.beta {
            break;
        }
        let removed = order[next];
        next += 1;
        retained[removed] = false;
        nb_retained -= 1;
        nb_inliers -= components[removed].pixels.len();
        inlier_counts.push(nb_inliers);
    }

    let mut mask = Mask::from_element(filtered.nrows(), filtered.ncols(), false);
    for (component, _) in components.iter().zip(&retained).filter(|&(_, &kept)| kept) {
        for &p in &component.pixels {
            mask[p] = true;
        }
    }
    Ok(Denoised {
        depth: helper::masked(filtered, &mask),
        nb_components,
        nb_removed: nb_components - nb_retained,
        inlier_counts,
    })
}

// TESTS #############################################################
