// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants::*, filter::Filter};

/// The telescope and dome position used when parking. All angles are in
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkPosition {
    telescope_azimuth: f64,
    telescope_altitude: f64,
    telescope_rotator: f64,
    dome_azimuth: f64,
    dome_altitude: f64,
    filter_position: Filter,
}

impl Default for ParkPosition {
    fn default() -> Self {
        Self {
            telescope_azimuth: DEFAULT_PARK_TELESCOPE_AZIMUTH,
            telescope_altitude: DEFAULT_PARK_TELESCOPE_ALTITUDE,
            telescope_rotator: DEFAULT_PARK_TELESCOPE_ROTATOR,
            dome_azimuth: DEFAULT_PARK_DOME_AZIMUTH,
            dome_altitude: DEFAULT_PARK_DOME_ALTITUDE,
            filter_position: Filter::Z,
        }
    }
}

impl ParkPosition {
    pub fn builder() -> ParkPositionBuilder {
        ParkPositionBuilder::default()
    }

    pub fn telescope_azimuth(&self) -> f64 {
        self.telescope_azimuth
    }

    pub fn telescope_altitude(&self) -> f64 {
        self.telescope_altitude
    }

    pub fn telescope_rotator(&self) -> f64 {
        self.telescope_rotator
    }

    pub fn dome_azimuth(&self) -> f64 {
        self.dome_azimuth
    }

    pub fn dome_altitude(&self) -> f64 {
        self.dome_altitude
    }

    pub fn filter_position(&self) -> Filter {
        self.filter_position
    }
}

/// Anything not set takes the default park position's value.
#[derive(Debug, Clone, Default)]
pub struct ParkPositionBuilder {
    telescope_azimuth: Option<f64>,
    telescope_altitude: Option<f64>,
    telescope_rotator: Option<f64>,
    dome_azimuth: Option<f64>,
    dome_altitude: Option<f64>,
    filter_position: Option<Filter>,
}

impl ParkPositionBuilder {
    pub fn telescope_azimuth(mut self, deg: f64) -> Self {
        self.telescope_azimuth = Some(deg);
        self
    }

    pub fn telescope_altitude(mut self, deg: f64) -> Self {
        self.telescope_altitude = Some(deg);
        self
    }

    pub fn telescope_rotator(mut self, deg: f64) -> Self {
        self.telescope_rotator = Some(deg);
        self
    }

    pub fn dome_azimuth(mut self, deg: f64) -> Self {
        self.dome_azimuth = Some(deg);
        self
    }

    pub fn dome_altitude(mut self, deg: f64) -> Self {
        self.dome_altitude = Some(deg);
        self
    }

    pub fn filter_position(mut self, filter: Filter) -> Self {
        self.filter_position = Some(filter);
        self
    }

    pub fn build(self) -> Result<ParkPosition, ParkError> {
        let d = ParkPosition::default();
        let park = ParkPosition {
            telescope_azimuth: self.telescope_azimuth.unwrap_or(d.telescope_azimuth),
            telescope_altitude: self.telescope_altitude.unwrap_or(d.telescope_altitude),
            telescope_rotator: self.telescope_rotator.unwrap_or(d.telescope_rotator),
            dome_azimuth: self.dome_azimuth.unwrap_or(d.dome_azimuth),
            dome_altitude: self.dome_altitude.unwrap_or(d.dome_altitude),
            filter_position: self.filter_position.unwrap_or(d.filter_position),
        };

        for (axis, value) in [
            ("telescope", park.telescope_azimuth),
            ("dome", park.dome_azimuth),
        ] {
            if !(0.0..360.0).contains(&value) {
                return Err(ParkError::Azimuth { axis, value });
            }
        }
        for (axis, value) in [
            ("telescope", park.telescope_altitude),
            ("dome", park.dome_altitude),
        ] {
            if !(0.0..=90.0).contains(&value) {
                return Err(ParkError::Altitude { axis, value });
            }
        }
        if !(-90.0..=90.0).contains(&park.telescope_rotator) {
            return Err(ParkError::Rotator(park.telescope_rotator));
        }

        Ok(park)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParkError {
    #[error("The {axis} park azimuth must be within [0, 360) degrees, but it was {value}")]
    Azimuth { axis: &'static str, value: f64 },

    #[error("The {axis} park altitude must be within [0, 90] degrees, but it was {value}")]
    Altitude { axis: &'static str, value: f64 },

    #[error("The park rotator angle must be within [-90, 90] degrees, but it was {0}")]
    Rotator(f64),
}
