// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Named sky regions ("footprints") and the goal maps built from them.
//!
//! Regions can overlap. When they do, the region laid down last wins; the
//! order is WFD (always), then NES, SCP and the galactic plane, each only if
//! its fraction is positive.


use std::collections::BTreeMap;

use log::{debug, trace};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::{
    constants::*,
    coord::RADec,
    healpix::Nside,
    target_map::{ConfigurationError, SkyMap, TargetMap},
};

/// The named sky regions. The discriminants are the values used in region id
/// maps; 0 means "no region".
#[derive(
    Debug,
    Display,
    EnumIter,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Region {
    #[strum(serialize = "NES")]
    #[serde(rename = "NES")]
    NorthEclipticSpur = 1,

    #[strum(serialize = "SCP")]
    #[serde(rename = "SCP")]
    SouthCelestialPole = 2,

    #[strum(serialize = "WFD")]
    #[serde(rename = "WFD")]
    WideFastDeep = 3,

    #[strum(serialize = "GP")]
    #[serde(rename = "GP")]
    GalacticPlane = 4,

    #[strum(serialize = "WFD_upper_edge")]
    #[serde(rename = "WFD_upper_edge")]
    WfdUpperEdge = 5,
}

impl Region {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Region> {
        match id {
            1 => Some(Region::NorthEclipticSpur),
            2 => Some(Region::SouthCelestialPole),
            3 => Some(Region::WideFastDeep),
            4 => Some(Region::GalacticPlane),
            5 => Some(Region::WfdUpperEdge),
            _ => None,
        }
    }
}

/// The desired fraction of coverage of each sky region. Every fraction must
/// be within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionFractions {
    pub wfd: f64,
    pub nes: f64,
    pub scp: f64,
    pub gp: f64,
    #[serde(default)]
    pub wfd_upper_edge: f64,
}

impl Default for RegionFractions {
    fn default() -> Self {
        Self {
            wfd: 1.0,
            nes: 0.3,
            scp: 0.4,
            gp: 0.2,
            wfd_upper_edge: 0.0,
        }
    }
}

impl RegionFractions {
    /// Only the wide-fast-deep region is wanted.
    pub fn wfd_only() -> Self {
        Self {
            wfd: 1.0,
            nes: 0.0,
            scp: 0.0,
            gp: 0.0,
            wfd_upper_edge: 0.0,
        }
    }

    pub fn get(&self, region: Region) -> f64 {
        match region {
            Region::NorthEclipticSpur => self.nes,
            Region::SouthCelestialPole => self.scp,
            Region::WideFastDeep => self.wfd,
            Region::GalacticPlane => self.gp,
            Region::WfdUpperEdge => self.wfd_upper_edge,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (region, value) in [
            (Region::WideFastDeep, self.wfd),
            (Region::NorthEclipticSpur, self.nes),
            (Region::SouthCelestialPole, self.scp),
            (Region::GalacticPlane, self.gp),
            (Region::WfdUpperEdge, self.wfd_upper_edge),
        ] {
            // NaN is never contained in the range.
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::FractionOutOfRange { region, value });
            }
        }
        Ok(())
    }
}

/// The geometry of the sky regions \[degrees\].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionBounds {
    pub wfd_dec_min: f64,
    pub wfd_dec_max: f64,
    /// WFD pixels at or above this declination belong to the "upper edge".
    pub wfd_upper_edge_dec: f64,
    pub nes_min_eb: f64,
    pub nes_max_eb: f64,
    pub nes_dec_min: f64,
    pub scp_dec_max: f64,
    pub gp_center_width: f64,
    pub gp_end_width: f64,
    pub gp_long1: f64,
    pub gp_long2: f64,
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self {
            wfd_dec_min: DEFAULT_WFD_DEC_MIN,
            wfd_dec_max: DEFAULT_WFD_DEC_MAX,
            wfd_upper_edge_dec: DEFAULT_WFD_UPPER_EDGE_DEC,
            nes_min_eb: DEFAULT_NES_MIN_EB,
            nes_max_eb: DEFAULT_NES_MAX_EB,
            nes_dec_min: DEFAULT_NES_DEC_MIN,
            scp_dec_max: DEFAULT_SCP_DEC_MAX,
            gp_center_width: DEFAULT_GP_CENTER_WIDTH,
            gp_end_width: DEFAULT_GP_END_WIDTH,
            gp_long1: DEFAULT_GP_LONG1,
            gp_long2: DEFAULT_GP_LONG2,
        }
    }
}

impl RegionBounds {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let bad = |msg: String| Err(ConfigurationError::InvalidRegionBounds(msg));
        let all = [
            self.wfd_dec_min,
            self.wfd_dec_max,
            self.wfd_upper_edge_dec,
            self.nes_min_eb,
            self.nes_max_eb,
            self.nes_dec_min,
            self.scp_dec_max,
            self.gp_center_width,
            self.gp_end_width,
            self.gp_long1,
            self.gp_long2,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return bad("all region bounds must be finite".to_string());
        }
        if self.wfd_dec_min >= self.wfd_dec_max {
            return bad(format!(
                "the WFD declination minimum ({}°) must be below its maximum ({}°)",
                self.wfd_dec_min, self.wfd_dec_max
            ));
        }
        if self.nes_min_eb >= self.nes_max_eb {
            return bad(format!(
                "the NES ecliptic latitude minimum ({}°) must be below its maximum ({}°)",
                self.nes_min_eb, self.nes_max_eb
            ));
        }
        if self.gp_center_width < 0.0 || self.gp_end_width < 0.0 {
            return bad("galactic plane widths cannot be negative".to_string());
        }
        if !(0.0 < self.gp_long1 && self.gp_long1 < self.gp_long2 && self.gp_long2 < 360.0) {
            return bad(format!(
                "galactic plane longitudes must satisfy 0 < {} < {} < 360",
                self.gp_long1, self.gp_long2
            ));
        }
        Ok(())
    }

    fn in_wfd(&self, dec_deg: f64) -> bool {
        (self.wfd_dec_min..=self.wfd_dec_max).contains(&dec_deg)
    }

    fn in_scp(&self, dec_deg: f64) -> bool {
        dec_deg < self.scp_dec_max
    }

    fn in_nes(&self, dec_deg: f64, ecliptic_lat_deg: f64) -> bool {
        ecliptic_lat_deg > self.nes_min_eb
            && ecliptic_lat_deg < self.nes_max_eb
            && dec_deg > self.nes_dec_min
    }

    /// The galactic-latitude half-width of the plane tapers linearly from the
    /// centre width at l = 0 to the end width at each longitude limit.
    fn in_galactic_plane(&self, l_deg: f64, b_deg: f64) -> bool {
        let taper = self.gp_center_width - self.gp_end_width;
        let half_width = if l_deg <= self.gp_long1 {
            self.gp_center_width - taper * l_deg / self.gp_long1
        } else if l_deg >= self.gp_long2 {
            self.gp_end_width + taper * (l_deg - self.gp_long2) / (360.0 - self.gp_long2)
        } else {
            return false;
        };
        b_deg.abs() < half_width
    }
}

/// Per-pixel membership of every region, computed once per resolution.
#[derive(Debug, Clone)]
pub struct RegionMasks {
    nside: Nside,
    bounds: RegionBounds,
    wfd: Vec<bool>,
    wfd_upper_edge: Vec<bool>,
    nes: Vec<bool>,
    scp: Vec<bool>,
    gp: Vec<bool>,
}

impl RegionMasks {
    pub fn new(nside: Nside, bounds: RegionBounds) -> Result<RegionMasks, ConfigurationError> {
        bounds.validate()?;
        debug!("Classifying {} pixels (nside {nside}) into sky regions", nside.num_pixels());

        let n = nside.num_pixels();
        let mut masks = RegionMasks {
            nside,
            bounds,
            wfd: Vec::with_capacity(n),
            wfd_upper_edge: Vec::with_capacity(n),
            nes: Vec::with_capacity(n),
            scp: Vec::with_capacity(n),
            gp: Vec::with_capacity(n),
        };
        for centre in nside.pixel_centres() {
            masks.classify(centre);
        }
        trace!(
            "Region pixel counts: WFD {}, WFD upper edge {}, NES {}, SCP {}, GP {}",
            masks.count(Region::WideFastDeep),
            masks.count(Region::WfdUpperEdge),
            masks.count(Region::NorthEclipticSpur),
            masks.count(Region::SouthCelestialPole),
            masks.count(Region::GalacticPlane),
        );
        Ok(masks)
    }

    fn classify(&mut self, centre: RADec) {
        let b = &self.bounds;
        let dec = centre.dec.to_degrees();
        let in_wfd = b.in_wfd(dec);
        self.wfd.push(in_wfd);
        self.wfd_upper_edge.push(in_wfd && dec >= b.wfd_upper_edge_dec);
        self.scp.push(b.in_scp(dec));
        self.nes.push(b.in_nes(dec, centre.ecliptic_latitude().to_degrees()));
        let gal = centre.to_galactic();
        self.gp.push(b.in_galactic_plane(gal.l.to_degrees(), gal.b.to_degrees()));
    }

    pub fn nside(&self) -> Nside {
        self.nside
    }

    pub fn bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    /// The membership mask of a single region.
    pub fn mask(&self, region: Region) -> &[bool] {
        match region {
            Region::NorthEclipticSpur => &self.nes,
            Region::SouthCelestialPole => &self.scp,
            Region::WideFastDeep => &self.wfd,
            Region::GalacticPlane => &self.gp,
            Region::WfdUpperEdge => &self.wfd_upper_edge,
        }
    }

    pub fn count(&self, region: Region) -> usize {
        self.mask(region).iter().filter(|&&m| m).count()
    }

    /// Lay the regions down with their fractions. If `full_map` is set,
    /// pixels outside every region get [`UNSEEN`], otherwise 0.
    pub fn goal_map(
        &self,
        fractions: &RegionFractions,
        full_map: bool,
    ) -> Result<GoalMap, ConfigurationError> {
        fractions.validate()?;

        let n = self.nside.num_pixels();
        let mut values = Array1::zeros(n);
        let mut ids = Array1::<u8>::zeros(n);

        let mut lay_down = |mask: &[bool], region: Region, fraction: f64| {
            for ((v, id), &m) in values.iter_mut().zip(ids.iter_mut()).zip(mask) {
                if m {
                    *v = fraction;
                    *id = region.id();
                }
            }
        };

        lay_down(&self.wfd, Region::WideFastDeep, fractions.wfd);
        if fractions.wfd_upper_edge > 0.0 {
            lay_down(
                &self.wfd_upper_edge,
                Region::WfdUpperEdge,
                fractions.wfd_upper_edge,
            );
        }
        for region in [
            Region::NorthEclipticSpur,
            Region::SouthCelestialPole,
            Region::GalacticPlane,
        ] {
            let fraction = fractions.get(region);
            if fraction > 0.0 {
                lay_down(self.mask(region), region, fraction);
            }
        }

        if full_map {
            values.zip_mut_with(&ids, |v, &id| {
                if id == 0 {
                    *v = UNSEEN;
                }
            });
        }

        let region_names = ids
            .iter()
            .filter_map(|&id| Region::from_id(id))
            .map(|r| (r.id(), r))
            .collect();

        Ok(GoalMap {
            target_map: SkyMap::new(self.nside, values)?,
            region_ids: ids,
            region_names,
        })
    }
}

/// A target map along with the region each pixel was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalMap {
    pub target_map: TargetMap,
    /// Per-pixel region ids; 0 means the pixel is in no region.
    pub region_ids: Array1<u8>,
    /// The regions that appear in `region_ids`, keyed by id.
    pub region_names: BTreeMap<u8, Region>,
}
