// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-filter target maps, their normalisation, and year-parity variants.
//!
//! A target map holds the relative desired exposure density of every sky
//! pixel. Pixels that are out of bounds hold [`UNSEEN`]; they are never
//! scaled and never contribute to sums.

mod builder;
mod error;
mod year_parity;

pub use builder::{build_target_map, FilterGoalMaps, TargetMapBuilder};
pub use error::{ConfigurationError, DegenerateMapError, TargetMapError};
pub use year_parity::{check_parity_factors, split_year_parity, YearPartition};

use indexmap::IndexMap;
use log::trace;
use ndarray::{Array1, ArrayView1};

use crate::{
    constants::{PI, UNSEEN},
    filter::Filter,
    healpix::Nside,
};

/// Is this pixel value the out-of-bounds sentinel?
#[inline]
pub fn is_unseen(v: f64) -> bool {
    v == UNSEEN
}

/// Per-pixel values over the whole sky, in HEALPix RING order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyMap {
    nside: Nside,
    values: Array1<f64>,
}

/// A [`SkyMap`] of relative desired exposure density for one filter.
pub type TargetMap = SkyMap;

impl SkyMap {
    pub fn new(nside: Nside, values: Array1<f64>) -> Result<SkyMap, ConfigurationError> {
        if values.len() != nside.num_pixels() {
            return Err(ConfigurationError::PixelCountMismatch {
                expected: nside.num_pixels(),
                got: values.len(),
            });
        }
        Ok(SkyMap { nside, values })
    }

    /// Make a map from values alone; the resolution is inferred from the
    /// number of values.
    pub fn from_values(values: Vec<f64>) -> Result<SkyMap, ConfigurationError> {
        let nside = Nside::from_num_pixels(values.len())?;
        SkyMap::new(nside, Array1::from(values))
    }

    pub fn filled(nside: Nside, value: f64) -> SkyMap {
        SkyMap {
            nside,
            values: Array1::from_elem(nside.num_pixels(), value),
        }
    }

    pub fn nside(&self) -> Nside {
        self.nside
    }

    pub fn num_pixels(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> ArrayView1<f64> {
        self.values.view()
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    /// The sum of all pixels that aren't out of bounds.
    pub fn in_bounds_sum(&self) -> f64 {
        self.values.iter().filter(|&&v| !is_unseen(v)).sum()
    }

    /// Multiply every in-bounds pixel by `factor`.
    pub fn scaled(&self, factor: f64) -> SkyMap {
        SkyMap {
            nside: self.nside,
            values: self
                .values
                .mapv(|v| if is_unseen(v) { v } else { v * factor }),
        }
    }

    fn check_same_shape(&self, other: &SkyMap) -> Result<(), ConfigurationError> {
        if self.num_pixels() != other.num_pixels() {
            return Err(ConfigurationError::PixelCountMismatch {
                expected: self.num_pixels(),
                got: other.num_pixels(),
            });
        }
        Ok(())
    }
}

/// Target maps keyed by filter. Insertion order is kept, and all maps share
/// the same resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterTargetSet {
    maps: IndexMap<Filter, TargetMap>,
}

impl FilterTargetSet {
    pub fn new() -> FilterTargetSet {
        FilterTargetSet::default()
    }

    /// Add a map for a filter, replacing (and returning) any previous map for
    /// that filter.
    pub fn insert(
        &mut self,
        filter: Filter,
        map: TargetMap,
    ) -> Result<Option<TargetMap>, ConfigurationError> {
        if let Some(existing) = self.maps.values().next() {
            existing.check_same_shape(&map)?;
        }
        Ok(self.maps.insert(filter, map))
    }

    pub fn get(&self, filter: Filter) -> Option<&TargetMap> {
        self.maps.get(&filter)
    }

    pub fn iter(&self) -> indexmap::map::Iter<Filter, TargetMap> {
        self.maps.iter()
    }

    pub fn filters(&self) -> impl Iterator<Item = Filter> + '_ {
        self.maps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// The common resolution of the maps, if there are any.
    pub fn nside(&self) -> Option<Nside> {
        self.maps.values().next().map(|m| m.nside())
    }
}

impl<'a> IntoIterator for &'a FilterTargetSet {
    type Item = (&'a Filter, &'a TargetMap);
    type IntoIter = indexmap::map::Iter<'a, Filter, TargetMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.iter()
    }
}

/// Per-filter scalars that make the total weight of every filter's target
/// map equal. Derived once by [`normalize`] and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct NormFactor {
    factors: IndexMap<Filter, f64>,
}

impl NormFactor {
    pub fn get(&self, filter: Filter) -> Option<f64> {
        self.factors.get(&filter).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Filter, f64)> + '_ {
        self.factors.iter().map(|(&f, &v)| (f, v))
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Rescale the factors by the number of pixels that fit in a circular
    /// field of view of radius `fov_radius_deg`. This is the normalisation
    /// the target-map basis function expects: a normalised map then sums to
    /// the area of one pointing, in pixels.
    pub fn scaled_to_fov(
        &self,
        fov_radius_deg: f64,
        nside: Nside,
    ) -> Result<NormFactor, ConfigurationError> {
        if !(fov_radius_deg > 0.0 && fov_radius_deg.is_finite()) {
            return Err(ConfigurationError::InvalidFovRadius(fov_radius_deg));
        }
        let fov_area = PI * fov_radius_deg * fov_radius_deg;
        let scale = fov_area / nside.pixel_area_deg2();
        Ok(NormFactor {
            factors: self.factors.iter().map(|(&f, &v)| (f, v * scale)).collect(),
        })
    }
}

/// Derive the factor that rescales each filter's target map so that its
/// in-bounds weighted sum is 1. Without this, a filter whose map covers
/// more sky would be implicitly favoured.
pub fn normalize(set: &FilterTargetSet) -> Result<NormFactor, DegenerateMapError> {
    let mut factors = IndexMap::with_capacity(set.len());
    for (&filter, map) in set {
        let total = map.in_bounds_sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(DegenerateMapError { filter, total });
        }
        trace!("Filter {filter}: total target-map weight {total}");
        factors.insert(filter, total.recip());
    }
    Ok(NormFactor { factors })
}
