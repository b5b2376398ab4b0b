// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Year-parity weighting.
//!
//! A reference region is split into two halves by pixel order. Even years
//! favour the top half and odd years the bottom half, so that over two
//! consecutive years each half is preferentially observed exactly once.

use log::debug;

use super::{is_unseen, ConfigurationError, FilterTargetSet, SkyMap, TargetMap};

/// The split of a reference region into a "top" and "bottom" half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearPartition {
    num_pixels: usize,
    top: Vec<usize>,
    bottom: Vec<usize>,
}

impl YearPartition {
    /// Split the pixels of `reference` that equal exactly 1. The cumulative
    /// count of these pixels is taken in pixel order, and the split happens
    /// after the largest index whose cumulative count is strictly less than
    /// half of the total.
    pub fn from_reference(reference: &SkyMap) -> Result<YearPartition, ConfigurationError> {
        let mask: Vec<bool> = reference.values().iter().map(|&v| v == 1.0).collect();
        let prefix: Vec<usize> = mask
            .iter()
            .scan(0, |count, &m| {
                *count += usize::from(m);
                Some(*count)
            })
            .collect();
        let total = prefix.last().copied().unwrap_or(0);
        if total == 0 {
            return Err(ConfigurationError::EmptyReferenceMask);
        }

        let half = total as f64 / 2.0;
        let split = prefix.iter().rposition(|&c| (c as f64) < half);
        let (top, bottom): (Vec<usize>, Vec<usize>) = mask
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| i)
            .partition(|&i| split.map_or(false, |k| i <= k));
        debug!(
            "Year-parity split: {} top-half pixels, {} bottom-half pixels (split index {split:?})",
            top.len(),
            bottom.len()
        );

        Ok(YearPartition {
            num_pixels: reference.num_pixels(),
            top,
            bottom,
        })
    }

    /// Pixel indices of the top half, ascending.
    pub fn top(&self) -> &[usize] {
        &self.top
    }

    /// Pixel indices of the bottom half, ascending.
    pub fn bottom(&self) -> &[usize] {
        &self.bottom
    }

    pub fn num_pixels(&self) -> usize {
        self.num_pixels
    }

    /// Multiply the top-half pixels of `map` by `top_factor` and the
    /// bottom-half pixels by `bottom_factor`. Every other pixel, and any
    /// [`UNSEEN`](crate::constants::UNSEEN) pixel, is left alone.
    pub fn apply(
        &self,
        map: &TargetMap,
        top_factor: f64,
        bottom_factor: f64,
    ) -> Result<TargetMap, ConfigurationError> {
        if map.num_pixels() != self.num_pixels {
            return Err(ConfigurationError::PixelCountMismatch {
                expected: self.num_pixels,
                got: map.num_pixels(),
            });
        }
        let mut values = map.values().to_owned();
        let halves = [(&self.top, top_factor), (&self.bottom, bottom_factor)];
        for (pixels, factor) in halves {
            for &i in pixels {
                if !is_unseen(values[i]) {
                    values[i] *= factor;
                }
            }
        }
        SkyMap::new(map.nside(), values)
    }
}

/// Produce the even-year and odd-year variants of every map in `set`. In the
/// even-year variant, the top half of the reference region is multiplied by
/// `up_factor` and the bottom half by `down_factor`; the odd-year variant
/// swaps the multipliers.
pub fn split_year_parity(
    reference: &TargetMap,
    set: &FilterTargetSet,
    up_factor: f64,
    down_factor: f64,
) -> Result<(FilterTargetSet, FilterTargetSet), ConfigurationError> {
    check_parity_factors(up_factor, down_factor)?;

    let partition = YearPartition::from_reference(reference)?;
    let mut even = FilterTargetSet::new();
    let mut odd = FilterTargetSet::new();
    for (&filter, map) in set {
        even.insert(filter, partition.apply(map, up_factor, down_factor)?)?;
        odd.insert(filter, partition.apply(map, down_factor, up_factor)?)?;
    }
    Ok((even, odd))
}

/// The up factor must be greater than 1 and the down factor within (0, 1).
pub fn check_parity_factors(up_factor: f64, down_factor: f64) -> Result<(), ConfigurationError> {
    // NaN fails both checks.
    if !(up_factor > 1.0 && up_factor.is_finite()) {
        return Err(ConfigurationError::UpFactorTooSmall(up_factor));
    }
    if !(down_factor > 0.0 && down_factor < 1.0) {
        return Err(ConfigurationError::DownFactorOutOfRange(down_factor));
    }
    Ok(())
}
