// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Target maps and configuration assembly for a feature-based telescope
scheduler.

The scheduler engine itself is external; this crate builds the per-filter
target maps (with their normalisation factors and year-parity variants) and
the validated configuration records the engine is started with.
 */

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod filter;
pub mod footprint;
pub mod healpix;
mod io;
mod params;
pub mod scheduler;
pub mod target_map;

// Re-exports.
pub use cli::{FbsConfig, FbsConfigError};
pub use config::{ParkPosition, SchedulerDriverConfig, StartupType};
pub use filter::Filter;
pub use footprint::{GoalMap, Region, RegionBounds, RegionFractions};
pub use healpix::Nside;
pub use target_map::{
    normalize, split_year_parity, ConfigurationError, DegenerateMapError, FilterTargetSet,
    NormFactor, SkyMap, TargetMap, TargetMapError, YearPartition,
};
