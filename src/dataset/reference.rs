// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Evaluation of measurements against reference widths of field samples.
//!
//! Reference files have one `sample_num: width` line per sample,
//! width in meters. Captures of a sample are named `<prefix>_<sample>_<capture>`,
//! and all captures of a sample share its reference width.

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::pipeline::Measurement;
use crate::misc::type_aliases::Float;

/// Comparison of one measurement with its reference width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Reference width (m).
    pub reference_width: Float,
    /// Estimated width (m).
    pub estimated_width: Float,
    /// Estimated depth (m).
    pub depth: Float,
    /// Signed error, estimated minus reference (m).
    pub error: Float,
    /// Absolute error relative to the reference width (%).
    pub percent_error: Float,
}

impl Evaluation {
    /// Compare a measurement with a strictly positive reference width.
    pub fn new(measurement: &Measurement, reference_width: Float) -> Result<Self, Error> {
        if !(reference_width > 0.0) {
            return Err(Error::InvalidInput(format!(
                "reference width must be positive, got {}",
                reference_width
            )));
        }
        let error = measurement.width - reference_width;
        Ok(Self {
            reference_width,
            estimated_width: measurement.width,
            depth: measurement.depth,
            error,
            percent_error: error.abs() / reference_width * 100.0,
        })
    }
}

/// Aggregated errors over a batch of evaluations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// Number of evaluations.
    pub count: usize,
    /// Mean signed error (m).
    pub mean_error: Float,
    /// Median signed error (m).
    pub median_error: Float,
    /// Mean absolute error (m).
    pub mean_absolute_error: Float,
    /// Mean percent error (%).
    pub mean_percent_error: Float,
    /// Median percent error (%).
    pub median_percent_error: Float,
}

impl Summary {
    /// Summary of a batch of evaluations, `None` if there are none.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_evaluations(evaluations: &[Evaluation]) -> Option<Self> {
        if evaluations.is_empty() {
            return None;
        }
        let count = evaluations.len();
        let mean = |values: &[Float]| values.iter().sum::<Float>() / count as Float;
        let errors: Vec<Float> = evaluations.iter().map(|e| e.error).collect();
        let absolute: Vec<Float> = errors.iter().map(|e| e.abs()).collect();
        let percents: Vec<Float> = evaluations.iter().map(|e| e.percent_error).collect();
        Some(Self {
            count,
            mean_error: mean(&errors),
            mean_absolute_error: mean(&absolute),
            mean_percent_error: mean(&percents),
            median_error: median(errors),
            median_percent_error: median(percents),
        })
    }
}

/// Median of a non empty set of values, mean of the two middle ones for even sizes.
fn median(mut values: Vec<Float>) -> Float {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let middle = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[middle - 1] + values[middle]) / 2.0
    } else {
        values[middle]
    }
}

/// Sample and capture numbers of a capture named `<prefix>_<sample>_<capture>`.
pub fn sample_id(name: &str) -> Option<(u32, u32)> {
    let mut parts = name.rsplit('_');
    let capture = parts.next()?.parse().ok()?;
    let sample = parts.next()?.parse().ok()?;
    parts.next()?;
    Some((sample, capture))
}

/// Parse the content of a reference file into reference widths by sample number.
///
/// Blank lines and lines starting with `#` are ignored.
/// Widths must be strictly positive, and each sample listed once.
pub fn parse(file_content: &str) -> Result<HashMap<u32, Float>, String> {
    let mut widths = HashMap::new();
    for (index, line) in file_content.lines().enumerate() {
        match parser::reference_line(line) {
            Ok((_, None)) => (),
            Ok((_, Some((sample, width)))) => {
                if !(width > 0.0 && width.is_finite()) {
                    return Err(format!("Invalid width on line {}: [{}]", index + 1, line));
                }
                if widths.insert(sample, width).is_some() {
                    return Err(format!("Duplicate sample {} on line {}", sample, index + 1));
                }
            }
            Err(_) => return Err(format!("Parsing error on line {}: [{}]", index + 1, line)),
        }
    }
    Ok(widths)
}

mod parser {
    use crate::misc::type_aliases::Float;
    use nom::{
        branch::alt,
        character::complete::{char, digit1, space0},
        combinator::{all_consuming, map, map_res, rest, value},
        number::complete::double,
        sequence::{delimited, preceded, separated_pair, tuple},
        IResult,
    };

    // nom parsers #############################################################

    // A line is a comment, a blank line, or a sample reference width.
    pub fn reference_line(input: &str) -> IResult<&str, Option<(u32, Float)>> {
        all_consuming(alt((
            map(reference, Some),
            value(None, comment),
            value(None, space0),
        )))(input)
    }

    // Parse a comment.
    fn comment(input: &str) -> IResult<&str, &str> {
        preceded(tuple((space0, char('#'))), rest)(input)
    }

    // Parse a sample number and its width.
    fn reference(input: &str) -> IResult<&str, (u32, Float)> {
        separated_pair(
            delimited(space0, sample_num, space0),
            char(':'),
            delimited(space0, double, space0),
        )(input)
    }

    fn sample_num(input: &str) -> IResult<&str, u32> {
        map_res(digit1, |s: &str| s.parse::<u32>())(input)
    }
}

// TESTS #############################################################
