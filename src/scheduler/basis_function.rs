// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::{constants::*, filter::Filter, healpix::Nside};

/// A basis function the engine should build. The target map of a
/// [`BasisFunction::TargetMap`] is the one written for its filter alongside
/// the scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BasisFunction {
    /// Favour fields close to the meridian, up to `max_hourangle` hours.
    HourAngleBonus { max_hourangle: f64 },

    /// Favour fields that are behind their target-map goal.
    TargetMap {
        filter: Filter,
        nside: Nside,
        norm_factor: f64,
        out_of_bounds_val: f64,
    },

    /// Restrict observing to stripes around the meridian. The lists are
    /// parallel; each entry describes one stripe.
    MeridianStripe {
        nside: Nside,
        width: Vec<f64>,
        weight: Vec<f64>,
        height: Vec<f64>,
        zenith_pad: Vec<f64>,
    },

    /// Penalise slews \[seconds\].
    AggressiveSlewtime {
        filter: Filter,
        nside: Nside,
        order: f64,
        hard_max: f64,
    },

    /// Hide recently observed fields for `gap_min` minutes. No filter means
    /// observations in any filter count.
    AvoidFastRevisits {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<Filter>,
        nside: Nside,
        gap_min: f64,
    },
}

impl BasisFunction {
    pub fn name(&self) -> &'static str {
        match self {
            BasisFunction::HourAngleBonus { .. } => "hour_angle_bonus",
            BasisFunction::TargetMap { .. } => "target_map",
            BasisFunction::MeridianStripe { .. } => "meridian_stripe",
            BasisFunction::AggressiveSlewtime { .. } => "aggressive_slewtime",
            BasisFunction::AvoidFastRevisits { .. } => "avoid_fast_revisits",
        }
    }

    pub fn filter(&self) -> Option<Filter> {
        match self {
            BasisFunction::TargetMap { filter, .. }
            | BasisFunction::AggressiveSlewtime { filter, .. } => Some(*filter),
            BasisFunction::AvoidFastRevisits { filter, .. } => *filter,
            BasisFunction::HourAngleBonus { .. } | BasisFunction::MeridianStripe { .. } => None,
        }
    }

    pub fn nside(&self) -> Option<Nside> {
        match self {
            BasisFunction::HourAngleBonus { .. } => None,
            BasisFunction::TargetMap { nside, .. }
            | BasisFunction::MeridianStripe { nside, .. }
            | BasisFunction::AggressiveSlewtime { nside, .. }
            | BasisFunction::AvoidFastRevisits { nside, .. } => Some(*nside),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedBasisFunction {
    pub basis_function: BasisFunction,
    pub weight: f64,
}

/// The tunable parameters of the standard per-filter basis-function list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasisFunctionSettings {
    pub max_hourangle: f64,
    pub stripe_width: f64,
    pub stripe_zenith_pad: f64,
    pub stripe_weight: f64,
    pub stripe_height: f64,
    pub slewtime_order: f64,
    pub slewtime_hard_max: f64,
    /// Minutes.
    pub revisit_gap_min: f64,
    /// The weight given to each basis function, in the order they're made by
    /// [`BasisFunctionSettings::basis_functions`].
    pub weights: Vec<f64>,
}

impl Default for BasisFunctionSettings {
    fn default() -> Self {
        Self {
            max_hourangle: DEFAULT_MAX_HOURANGLE,
            stripe_width: DEFAULT_STRIPE_WIDTH,
            stripe_zenith_pad: DEFAULT_STRIPE_ZENITH_PAD,
            stripe_weight: DEFAULT_STRIPE_WEIGHT,
            stripe_height: DEFAULT_STRIPE_HEIGHT,
            slewtime_order: DEFAULT_SLEWTIME_ORDER,
            slewtime_hard_max: DEFAULT_SLEWTIME_HARD_MAX,
            revisit_gap_min: DEFAULT_REVISIT_GAP_MIN,
            weights: DEFAULT_BASIS_FUNCTION_WEIGHTS.to_vec(),
        }
    }
}

impl BasisFunctionSettings {
    /// The standard basis functions for a survey in `filter`: hour-angle
    /// bonus, target map, meridian stripe, aggressive slewtime and avoid fast
    /// revisits, in that order.
    pub fn basis_functions(
        &self,
        filter: Filter,
        nside: Nside,
        norm_factor: f64,
    ) -> Vec<BasisFunction> {
        vec![
            BasisFunction::HourAngleBonus {
                max_hourangle: self.max_hourangle,
            },
            BasisFunction::TargetMap {
                filter,
                nside,
                norm_factor,
                out_of_bounds_val: UNSEEN,
            },
            BasisFunction::MeridianStripe {
                nside,
                width: vec![self.stripe_width],
                weight: vec![self.stripe_weight],
                height: vec![self.stripe_height],
                zenith_pad: vec![self.stripe_zenith_pad],
            },
            BasisFunction::AggressiveSlewtime {
                filter,
                nside,
                order: self.slewtime_order,
                hard_max: self.slewtime_hard_max,
            },
            BasisFunction::AvoidFastRevisits {
                filter: None,
                nside,
                gap_min: self.revisit_gap_min,
            },
        ]
    }
}
