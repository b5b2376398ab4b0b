// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::{
    filter::Filter,
    footprint::{GoalMap, Region, RegionFractions},
    healpix::Nside,
    io::write::{write_document, WriteError},
    target_map::{
        normalize, split_year_parity, ConfigurationError, FilterGoalMaps, FilterTargetSet,
        NormFactor, TargetMapBuilder, TargetMapError,
    },
};

pub(crate) struct YearParityParams {
    /// The filter whose target map supplies the reference mask.
    pub(crate) reference_filter: Filter,
    pub(crate) up_factor: f64,
    pub(crate) down_factor: f64,
}

pub(crate) struct TargetMapsParams {
    /// Region classification is done when the builder is made.
    pub(crate) builder: TargetMapBuilder,

    /// Coverage fractions for every filter, in output order.
    pub(crate) fractions: IndexMap<Filter, RegionFractions>,

    /// \[degrees\]
    pub(crate) fov_radius: f64,

    pub(crate) year_parity: Option<YearParityParams>,

    pub(crate) output: Option<PathBuf>,
}

/// Everything derived from [`TargetMapsParams`].
pub(crate) struct TargetMapProducts {
    pub(crate) goal_maps: FilterGoalMaps,
    pub(crate) norm_factor: NormFactor,
    pub(crate) fov_norm_factor: NormFactor,
    /// Even-year and odd-year maps.
    pub(crate) year_parity: Option<(FilterTargetSet, FilterTargetSet)>,
}

impl TargetMapsParams {
    pub(crate) fn nside(&self) -> Nside {
        self.builder.nside()
    }

    pub(crate) fn make(&self) -> Result<TargetMapProducts, TargetMapError> {
        let goal_maps = self.builder.build_filter_goal_maps(&self.fractions)?;
        let targets = goal_maps.target_set();

        let norm_factor = normalize(&targets)?;
        let fov_norm_factor = norm_factor.scaled_to_fov(self.fov_radius, self.nside())?;
        for (filter, factor) in fov_norm_factor.iter() {
            debug!("Filter {filter}: norm factor {factor}");
        }

        let year_parity = match &self.year_parity {
            Some(yp) => {
                let reference = targets
                    .get(yp.reference_filter)
                    .ok_or(ConfigurationError::MissingFilter(yp.reference_filter))?;
                let (even, odd) =
                    split_year_parity(reference, &targets, yp.up_factor, yp.down_factor)?;
                Some((even, odd))
            }
            None => None,
        };

        Ok(TargetMapProducts {
            goal_maps,
            norm_factor,
            fov_norm_factor,
            year_parity,
        })
    }

    pub(crate) fn run(&self) -> Result<(), TargetMapsError> {
        let products = self.make()?;
        let document = TargetMapsDocument::new(self, &products);

        match &self.output {
            Some(output) => {
                write_document(&document, output)?;
                info!("Target maps written to {}", output.display());
            }
            None => info!("No output file was specified; not writing the target maps"),
        }
        Ok(())
    }
}

/// The serialisable form of the target maps. Maps are keyed by filter name.
#[derive(Debug, Serialize)]
pub(crate) struct TargetMapsDocument {
    nside: Nside,
    full_map: bool,
    fov_radius: f64,
    norm_factors: IndexMap<String, f64>,
    fov_norm_factors: IndexMap<String, f64>,
    goal_maps: IndexMap<String, GoalMapDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_parity: Option<YearParityDocument>,
}

#[derive(Debug, Serialize)]
struct GoalMapDocument {
    fractions: RegionFractions,
    values: Vec<f64>,
    region_ids: Vec<u8>,
    region_names: Vec<(u8, Region)>,
}

#[derive(Debug, Serialize)]
struct YearParityDocument {
    reference_filter: Filter,
    up_factor: f64,
    down_factor: f64,
    even: IndexMap<String, Vec<f64>>,
    odd: IndexMap<String, Vec<f64>>,
}

fn by_filter_name(set: &FilterTargetSet) -> IndexMap<String, Vec<f64>> {
    set.iter()
        .map(|(f, m)| (f.to_string(), m.values().to_vec()))
        .collect()
}

impl TargetMapsDocument {
    pub(crate) fn new(params: &TargetMapsParams, products: &TargetMapProducts) -> Self {
        let goal_map_doc = |fractions: RegionFractions, g: &GoalMap| GoalMapDocument {
            fractions,
            values: g.target_map.values().to_vec(),
            region_ids: g.region_ids.to_vec(),
            region_names: g.region_names.iter().map(|(&id, &r)| (id, r)).collect(),
        };

        TargetMapsDocument {
            nside: params.nside(),
            full_map: params.builder.is_full_map(),
            fov_radius: params.fov_radius,
            norm_factors: products
                .norm_factor
                .iter()
                .map(|(f, v)| (f.to_string(), v))
                .collect(),
            fov_norm_factors: products
                .fov_norm_factor
                .iter()
                .map(|(f, v)| (f.to_string(), v))
                .collect(),
            goal_maps: products
                .goal_maps
                .iter()
                .map(|(f, g)| {
                    let fractions = params.fractions.get(f).copied().unwrap_or_default();
                    (f.to_string(), goal_map_doc(fractions, g))
                })
                .collect(),
            year_parity: match (&params.year_parity, &products.year_parity) {
                (Some(yp), Some((even, odd))) => Some(YearParityDocument {
                    reference_filter: yp.reference_filter,
                    up_factor: yp.up_factor,
                    down_factor: yp.down_factor,
                    even: by_filter_name(even),
                    odd: by_filter_name(odd),
                }),
                _ => None,
            },
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum TargetMapsError {
    #[error(transparent)]
    TargetMap(#[from] TargetMapError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
