// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::num::NonZeroUsize;

use serde::Serialize;
use thiserror::Error;
use vec1::Vec1;

use super::{BasisFunction, WeightedBasisFunction};
use crate::{
    constants::{DEFAULT_BLOCK_SIZE, DEFAULT_IGNORE_OBS},
    filter::Filter,
    footprint::{GoalMap, Region},
    healpix::Nside,
};

/// A greedy survey over fields in a single filter. The engine picks the
/// highest-scoring fields by the weighted sum of the basis functions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Survey {
    basis_functions: Vec1<WeightedBasisFunction>,
    block_size: NonZeroUsize,
    filter: Filter,
    dither: bool,
    nside: Nside,
    tag_fields: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_map: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tag_names: Vec<(u8, Region)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_obs: Option<String>,
}

impl Survey {
    /// Pair each basis function with its weight. The surveys made here
    /// dither, use a block size of 1, don't tag fields, and ignore "DD"
    /// observations; use the other methods to change that.
    pub fn greedy(
        basis_functions: Vec<BasisFunction>,
        weights: &[f64],
        filter: Filter,
        nside: Nside,
    ) -> Result<Survey, SurveyError> {
        if basis_functions.len() != weights.len() {
            return Err(SurveyError::WeightCountMismatch {
                num_basis_functions: basis_functions.len(),
                num_weights: weights.len(),
            });
        }
        let mut weighted = Vec::with_capacity(weights.len());
        for (basis_function, &weight) in basis_functions.into_iter().zip(weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SurveyError::InvalidWeight {
                    basis_function: basis_function.name(),
                    weight,
                });
            }
            if let Some(bf_nside) = basis_function.nside() {
                if bf_nside != nside {
                    return Err(SurveyError::NsideMismatch {
                        scheduler: nside,
                        survey: bf_nside,
                    });
                }
            }
            weighted.push(WeightedBasisFunction {
                basis_function,
                weight,
            });
        }
        let basis_functions =
            Vec1::try_from_vec(weighted).map_err(|_| SurveyError::NoBasisFunctions)?;

        Ok(Survey {
            basis_functions,
            block_size: DEFAULT_BLOCK_SIZE,
            filter,
            dither: true,
            nside,
            tag_fields: false,
            tag_map: None,
            tag_names: vec![],
            ignore_obs: Some(DEFAULT_IGNORE_OBS.to_string()),
        })
    }

    pub fn block_size(mut self, block_size: NonZeroUsize) -> Survey {
        self.block_size = block_size;
        self
    }

    pub fn dither(mut self, dither: bool) -> Survey {
        self.dither = dither;
        self
    }

    /// Tag fields with the region ids of a goal map.
    pub fn tag_with(mut self, goal_map: &GoalMap) -> Result<Survey, SurveyError> {
        if goal_map.target_map.nside() != self.nside {
            return Err(SurveyError::NsideMismatch {
                scheduler: self.nside,
                survey: goal_map.target_map.nside(),
            });
        }
        self.tag_fields = true;
        self.tag_map = Some(goal_map.region_ids.to_vec());
        self.tag_names = goal_map
            .region_names
            .iter()
            .map(|(&id, &region)| (id, region))
            .collect();
        Ok(self)
    }

    /// Observations whose note contains this string are ignored. `None`
    /// ignores nothing.
    pub fn ignore_obs(mut self, ignore_obs: Option<String>) -> Survey {
        self.ignore_obs = ignore_obs;
        self
    }

    pub fn basis_functions(&self) -> &[WeightedBasisFunction] {
        self.basis_functions.as_slice()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn nside(&self) -> Nside {
        self.nside
    }

    pub fn get_block_size(&self) -> NonZeroUsize {
        self.block_size
    }

    pub fn is_dithered(&self) -> bool {
        self.dither
    }

    pub fn tag_map(&self) -> Option<&[u8]> {
        self.tag_map.as_deref()
    }

    pub fn tag_names(&self) -> &[(u8, Region)] {
        &self.tag_names
    }

    pub fn get_ignore_obs(&self) -> Option<&str> {
        self.ignore_obs.as_deref()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("A survey needs at least one basis function")]
    NoBasisFunctions,

    #[error("A scheduler tier needs at least one survey")]
    NoSurveys,

    #[error("Got {num_basis_functions} basis functions but {num_weights} weights; there must be one weight per basis function")]
    WeightCountMismatch {
        num_basis_functions: usize,
        num_weights: usize,
    },

    #[error("The weight of the {basis_function} basis function ({weight}) must be finite and non-negative")]
    InvalidWeight {
        basis_function: &'static str,
        weight: f64,
    },

    #[error("Resolution mismatch: expected nside {scheduler}, but got nside {survey}")]
    NsideMismatch { scheduler: Nside, survey: Nside },
}
