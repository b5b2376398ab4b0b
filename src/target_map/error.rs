// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with building and transforming target maps.

use thiserror::Error;

use crate::{filter::Filter, footprint::Region, healpix::HealpixError};

/// Malformed or out-of-range input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("The coverage fraction for region {region} was {value}, but it must be within [0, 1]")]
    FractionOutOfRange { region: Region, value: f64 },

    #[error(transparent)]
    UnsupportedResolution(#[from] HealpixError),

    #[error("Invalid region bounds: {0}")]
    InvalidRegionBounds(String),

    #[error("The year-parity reference map has no pixels with a value of 1; the sky can't be split")]
    EmptyReferenceMask,

    #[error("The year-parity up factor must be greater than 1, but it was {0}")]
    UpFactorTooSmall(f64),

    #[error("The year-parity down factor must be within (0, 1), but it was {0}")]
    DownFactorOutOfRange(f64),

    #[error("The field-of-view radius must be positive, but it was {0}°")]
    InvalidFovRadius(f64),

    #[error("Expected a map with {expected} pixels, but got {got}")]
    PixelCountMismatch { expected: usize, got: usize },

    #[error("No coverage fractions were supplied for filter '{0}'")]
    MissingFilter(Filter),

    #[error("Filter '{0}' was specified more than once")]
    DuplicateFilter(Filter),
}

/// Normalisation is impossible because a map has no positive weight.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("The target map for filter '{filter}' has a total weight of {total}; it cannot be normalised")]
pub struct DegenerateMapError {
    pub filter: Filter,
    pub total: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TargetMapError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    DegenerateMap(#[from] DegenerateMapError),
}
