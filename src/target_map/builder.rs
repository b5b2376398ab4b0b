// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indexmap::IndexMap;
use log::debug;

use super::{ConfigurationError, FilterTargetSet, TargetMap};
use crate::{
    filter::Filter,
    footprint::{GoalMap, RegionBounds, RegionFractions, RegionMasks},
    healpix::Nside,
};

/// Builds target maps from region coverage fractions. Pixel classification
/// is done once, when the builder is made, so building a map per filter is
/// cheap.
#[derive(Debug, Clone)]
pub struct TargetMapBuilder {
    masks: RegionMasks,
    full_map: bool,
}

impl TargetMapBuilder {
    pub fn new(nside: u32) -> Result<TargetMapBuilder, ConfigurationError> {
        TargetMapBuilder::with_bounds(nside, RegionBounds::default())
    }

    pub fn with_bounds(
        nside: u32,
        bounds: RegionBounds,
    ) -> Result<TargetMapBuilder, ConfigurationError> {
        let nside = Nside::new(nside)?;
        Ok(TargetMapBuilder {
            masks: RegionMasks::new(nside, bounds)?,
            full_map: false,
        })
    }

    /// Give pixels outside every region the out-of-bounds sentinel rather
    /// than 0.
    pub fn full_map(mut self, full_map: bool) -> TargetMapBuilder {
        self.full_map = full_map;
        self
    }

    pub fn is_full_map(&self) -> bool {
        self.full_map
    }

    pub fn nside(&self) -> Nside {
        self.masks.nside()
    }

    pub fn masks(&self) -> &RegionMasks {
        &self.masks
    }

    pub fn build_goal_map(
        &self,
        fractions: &RegionFractions,
    ) -> Result<GoalMap, ConfigurationError> {
        self.masks.goal_map(fractions, self.full_map)
    }

    pub fn build_target_map(
        &self,
        fractions: &RegionFractions,
    ) -> Result<TargetMap, ConfigurationError> {
        self.build_goal_map(fractions).map(|g| g.target_map)
    }

    /// Build a goal map for every filter that has coverage fractions.
    pub fn build_filter_goal_maps(
        &self,
        fractions: &IndexMap<Filter, RegionFractions>,
    ) -> Result<FilterGoalMaps, ConfigurationError> {
        let mut goal_maps = IndexMap::with_capacity(fractions.len());
        for (&filter, f) in fractions {
            debug!("Building the goal map for filter {filter}");
            goal_maps.insert(filter, self.build_goal_map(f)?);
        }
        Ok(FilterGoalMaps { goal_maps })
    }
}

/// Build a single target map at resolution `nside`.
pub fn build_target_map(
    fractions: &RegionFractions,
    nside: u32,
    full_map: bool,
) -> Result<TargetMap, ConfigurationError> {
    TargetMapBuilder::new(nside)?
        .full_map(full_map)
        .build_target_map(fractions)
}

/// Goal maps keyed by filter.
#[derive(Debug, Clone)]
pub struct FilterGoalMaps {
    goal_maps: IndexMap<Filter, GoalMap>,
}

impl FilterGoalMaps {
    pub fn get(&self, filter: Filter) -> Option<&GoalMap> {
        self.goal_maps.get(&filter)
    }

    pub fn iter(&self) -> indexmap::map::Iter<Filter, GoalMap> {
        self.goal_maps.iter()
    }

    pub fn filters(&self) -> impl Iterator<Item = Filter> + '_ {
        self.goal_maps.keys().copied()
    }

    /// The target maps alone.
    pub fn target_set(&self) -> FilterTargetSet {
        let mut set = FilterTargetSet::new();
        for (&filter, goal) in &self.goal_maps {
            set.insert(filter, goal.target_map.clone())
                .expect("all goal maps come from the same builder");
        }
        set
    }
}
