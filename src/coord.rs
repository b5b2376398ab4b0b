// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Handle (right ascension, declination) coordinates and their conversion to
galactic and ecliptic frames.
 */

use serde::{Deserialize, Serialize};

use crate::constants::{OBLIQUITY_J2000_DEG, TAU};

/// Rotation from J2000 equatorial to galactic Cartesian coordinates.
const EQ_TO_GAL: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// A struct containing a Right Ascension and Declination. All units are in
/// radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RADec {
    /// Right ascension \[radians\]
    pub ra: f64,
    /// Declination \[radians\]
    pub dec: f64,
}

/// Galactic longitude and latitude \[radians\]. The longitude is within
/// `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Galactic {
    pub l: f64,
    pub b: f64,
}

impl RADec {
    /// Make a new `RADec` struct from values in radians.
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Make a new `RADec` struct from values in degrees.
    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        Self::new(ra.to_radians(), dec.to_radians())
    }

    fn to_cartesian(self) -> [f64; 3] {
        let (s_ra, c_ra) = self.ra.sin_cos();
        let (s_dec, c_dec) = self.dec.sin_cos();
        [c_dec * c_ra, c_dec * s_ra, s_dec]
    }

    /// Convert these (J2000) coordinates to galactic coordinates.
    pub fn to_galactic(self) -> Galactic {
        let v = self.to_cartesian();
        let mut g = [0.0; 3];
        for (g, row) in g.iter_mut().zip(EQ_TO_GAL.iter()) {
            *g = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        }
        let l = g[1].atan2(g[0]).rem_euclid(TAU);
        let b = g[2].clamp(-1.0, 1.0).asin();
        Galactic { l, b }
    }

    /// The ecliptic latitude of these (J2000) coordinates \[radians\], using
    /// the mean obliquity at J2000.
    pub fn ecliptic_latitude(self) -> f64 {
        let [_, y, z] = self.to_cartesian();
        let (s_eps, c_eps) = OBLIQUITY_J2000_DEG.to_radians().sin_cos();
        (z * c_eps - y * s_eps).clamp(-1.0, 1.0).asin()
    }
}

impl std::fmt::Display for RADec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}°, {}°)", self.ra.to_degrees(), self.dec.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_galactic_centre() {
        // The galactic centre defined by the Hipparcos frame.
        let gc = RADec::from_degrees(266.405_066_55, -28.936_162_41).to_galactic();
        let l = gc.l.to_degrees();
        let l = if l > 180.0 { l - 360.0 } else { l };
        assert_abs_diff_eq!(l, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(gc.b.to_degrees(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_galactic_north_pole() {
        let ngp = RADec::from_degrees(192.859_48, 27.128_25).to_galactic();
        assert_abs_diff_eq!(ngp.b.to_degrees(), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ecliptic_latitude() {
        // The north ecliptic pole.
        let nep = RADec::from_degrees(270.0, 90.0 - OBLIQUITY_J2000_DEG);
        assert_abs_diff_eq!(nep.ecliptic_latitude().to_degrees(), 90.0, epsilon = 1e-5);
        // The vernal equinox is on the ecliptic.
        assert_abs_diff_eq!(RADec::new(0.0, 0.0).ecliptic_latitude(), 0.0, epsilon = 1e-12);
        // The summer solstice point is on the ecliptic.
        let solstice = RADec::from_degrees(90.0, OBLIQUITY_J2000_DEG);
        assert_abs_diff_eq!(solstice.ecliptic_latitude(), 0.0, epsilon = 1e-12);
        // The north celestial pole is at an ecliptic latitude of 90 - obliquity.
        assert_abs_diff_eq!(
            RADec::from_degrees(0.0, 90.0).ecliptic_latitude().to_degrees(),
            90.0 - OBLIQUITY_J2000_DEG,
            epsilon = 1e-9
        );
    }
}
