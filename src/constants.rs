// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All angles here are in degrees unless otherwise stated.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

use std::num::NonZeroUsize;

/// The value given to pixels outside of all sky regions when a full map is
/// generated. This matches the HEALPix "UNSEEN" convention.
pub const UNSEEN: f64 = -1.6375e30;

/// The sky resolution used when nothing else is specified (12,288 pixels).
pub const DEFAULT_NSIDE: u32 = 32;

/// The largest supported HEALPix nside.
pub const MAX_NSIDE: u32 = 8192;

/// The radius of the camera's field of view.
pub const DEFAULT_FOV_RADIUS_DEG: f64 = 1.75;

/// Year-parity multiplier for the favoured half of the reference region.
pub const DEFAULT_UP_FACTOR: f64 = 1.75;

/// Year-parity multiplier for the disfavoured half of the reference region.
pub const DEFAULT_DOWN_FACTOR: f64 = 0.25;

/// Mean obliquity of the ecliptic at J2000.
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291_1;

// Region boundaries.
pub const DEFAULT_WFD_DEC_MIN: f64 = -62.5;
pub const DEFAULT_WFD_DEC_MAX: f64 = 3.6;
pub const DEFAULT_WFD_UPPER_EDGE_DEC: f64 = -30.0;
pub const DEFAULT_NES_MIN_EB: f64 = -30.0;
pub const DEFAULT_NES_MAX_EB: f64 = 10.0;
pub const DEFAULT_NES_DEC_MIN: f64 = 3.6;
pub const DEFAULT_SCP_DEC_MAX: f64 = -62.5;
pub const DEFAULT_GP_CENTER_WIDTH: f64 = 10.0;
pub const DEFAULT_GP_END_WIDTH: f64 = 4.0;
pub const DEFAULT_GP_LONG1: f64 = 70.0;
pub const DEFAULT_GP_LONG2: f64 = 290.0;

// Park position.
pub const DEFAULT_PARK_TELESCOPE_AZIMUTH: f64 = 45.0;
pub const DEFAULT_PARK_TELESCOPE_ALTITUDE: f64 = 86.5;
pub const DEFAULT_PARK_DOME_AZIMUTH: f64 = 45.0;
pub const DEFAULT_PARK_DOME_ALTITUDE: f64 = 90.0;
pub const DEFAULT_PARK_TELESCOPE_ROTATOR: f64 = 0.0;

// Basis-function and survey defaults.
pub const DEFAULT_MAX_HOURANGLE: f64 = 4.0;
pub const DEFAULT_STRIPE_WIDTH: f64 = 20.0;
pub const DEFAULT_STRIPE_ZENITH_PAD: f64 = 28.0;
pub const DEFAULT_STRIPE_WEIGHT: f64 = 1.0;
pub const DEFAULT_STRIPE_HEIGHT: f64 = 80.0;
pub const DEFAULT_SLEWTIME_ORDER: f64 = 6.0;
pub const DEFAULT_SLEWTIME_HARD_MAX: f64 = 120.0;
/// Minutes.
pub const DEFAULT_REVISIT_GAP_MIN: f64 = 480.0;
pub const DEFAULT_BASIS_FUNCTION_WEIGHTS: [f64; 5] = [1.0, 0.1, 1.0, 1.0, 1.0];
pub const DEFAULT_BLOCK_SIZE: NonZeroUsize = NonZeroUsize::MIN;
pub const DEFAULT_IGNORE_OBS: &str = "DD";
