// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! HEALPix sky pixelisation in the RING ordering scheme.
//!
//! Only what is needed to classify sky regions is implemented here: pixel
//! counts, pixel areas and pixel-centre coordinates. Pixel indices run from
//! the north pole to the south pole, ring by ring, in increasing right
//! ascension within each ring.


use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::{FRAC_PI_2, MAX_NSIDE, PI},
    coord::RADec,
};

/// A validated HEALPix resolution parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Nside(u32);

impl Nside {
    /// Only powers of two up to [`MAX_NSIDE`] are supported.
    pub fn new(nside: u32) -> Result<Nside, HealpixError> {
        if nside == 0 || !nside.is_power_of_two() || nside > MAX_NSIDE {
            return Err(HealpixError::UnsupportedNside(nside));
        }
        Ok(Nside(nside))
    }

    /// Recover the resolution from the length of a full-sky map.
    pub fn from_num_pixels(num_pixels: usize) -> Result<Nside, HealpixError> {
        if num_pixels % 12 != 0 {
            return Err(HealpixError::NotAHealpixMap(num_pixels));
        }
        let nside_sq = num_pixels / 12;
        let nside = isqrt(nside_sq as u64);
        if nside * nside != nside_sq as u64 {
            return Err(HealpixError::NotAHealpixMap(num_pixels));
        }
        u32::try_from(nside)
            .map_err(|_| HealpixError::NotAHealpixMap(num_pixels))
            .and_then(Nside::new)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn num_pixels(self) -> usize {
        12 * (self.0 as usize) * (self.0 as usize)
    }

    /// The solid angle of every pixel \[steradians\].
    pub fn pixel_area(self) -> f64 {
        4.0 * PI / self.num_pixels() as f64
    }

    /// The solid angle of every pixel \[square degrees\].
    pub fn pixel_area_deg2(self) -> f64 {
        self.pixel_area() * (180.0 / PI).powi(2)
    }

    /// Get the coordinates of the centre of pixel `pixel`.
    ///
    /// # Panics
    ///
    /// Panics if `pixel` is not smaller than the number of pixels.
    pub fn pixel_centre(self, pixel: usize) -> RADec {
        let npix = self.num_pixels() as u64;
        let p = pixel as u64;
        assert!(p < npix, "pixel {pixel} is out of range for nside {}", self.0);

        let nside = self.0 as u64;
        let ncap = 2 * nside * (nside - 1);
        let fact2 = 4.0 / npix as f64;

        let (z, phi) = if p < ncap {
            // North polar cap.
            let iring = (1 + isqrt(1 + 2 * p)) / 2;
            let iphi = p + 1 - 2 * iring * (iring - 1);
            let z = 1.0 - (iring * iring) as f64 * fact2;
            let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
            (z, phi)
        } else if p < npix - ncap {
            // Equatorial belt.
            let ip = p - ncap;
            let iring = ip / (4 * nside) + nside;
            let iphi = ip % (4 * nside) + 1;
            let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
            let fact1 = 2.0 / (3.0 * nside as f64);
            let z = (2 * nside) as f64 * fact1 - iring as f64 * fact1;
            let phi = (iphi as f64 - fodd) * FRAC_PI_2 / nside as f64;
            (z, phi)
        } else {
            // South polar cap.
            let ip = npix - p;
            let iring = (1 + isqrt(2 * ip - 1)) / 2;
            let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
            let z = -1.0 + (iring * iring) as f64 * fact2;
            let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
            (z, phi)
        };

        RADec::new(phi, FRAC_PI_2 - z.clamp(-1.0, 1.0).acos())
    }

    /// The coordinates of all pixel centres, in pixel order.
    pub fn pixel_centres(self) -> Vec<RADec> {
        (0..self.num_pixels()).map(|p| self.pixel_centre(p)).collect()
    }
}

impl TryFrom<u32> for Nside {
    type Error = HealpixError;

    fn try_from(nside: u32) -> Result<Self, Self::Error> {
        Nside::new(nside)
    }
}

impl From<Nside> for u32 {
    fn from(nside: Nside) -> u32 {
        nside.0
    }
}

impl std::fmt::Display for Nside {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer square root (floor).
fn isqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    // Fix up any float rounding.
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealpixError {
    #[error("nside {0} is not supported; it must be a power of two between 1 and {MAX_NSIDE}")]
    UnsupportedNside(u32),

    #[error("A map with {0} pixels does not correspond to any supported HEALPix resolution")]
    NotAHealpixMap(usize),
}
