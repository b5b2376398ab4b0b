// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Both the `target-maps` and
//! `assemble` subcommands make target maps, so the same target-map arguments
//! are shared between them.

mod printers;

#[cfg(test)]
pub(crate) use printers::take_warnings;
pub(crate) use printers::{display_warnings, InfoPrinter, Warn};

use std::str::FromStr;

use clap::Parser;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{trace, Level::Trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{DEFAULT_DOWN_FACTOR, DEFAULT_FOV_RADIUS_DEG, DEFAULT_NSIDE, DEFAULT_UP_FACTOR},
    filter::{Filter, FILTERS_COMMA_SEPARATED},
    footprint::{RegionBounds, RegionFractions},
    params::{TargetMapsParams, YearParityParams},
    target_map::{check_parity_factors, ConfigurationError, TargetMapBuilder},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref NSIDE_HELP: String =
        format!("The HEALPix nside of the target maps. Must be a power of two. Default: {DEFAULT_NSIDE}");

    static ref FILTERS_HELP: String =
        format!("The filters to make target maps for. Supported filters: {}. Default: r", *FILTERS_COMMA_SEPARATED);

    static ref FOV_RADIUS_HELP: String =
        format!("The radius of the camera's field of view, used to scale the normalisation factors [degrees]. Default: {DEFAULT_FOV_RADIUS_DEG}");

    static ref UP_FACTOR_HELP: String =
        format!("The multiplier for the favoured half of the reference region. Must be greater than 1. Default: {DEFAULT_UP_FACTOR}");

    static ref DOWN_FACTOR_HELP: String =
        format!("The multiplier for the disfavoured half of the reference region. Must be within (0, 1). Default: {DEFAULT_DOWN_FACTOR}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::{common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED}, FbsConfigError};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FbsConfigError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FbsConfigError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(FbsConfigError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct TargetMapArgs {
    #[clap(long, help = NSIDE_HELP.as_str(), help_heading = "TARGET MAPS")]
    pub(super) nside: Option<u32>,

    #[clap(long, multiple_values(true), help = FILTERS_HELP.as_str(), help_heading = "TARGET MAPS")]
    pub(super) filters: Option<Vec<String>>,

    /// Give pixels outside of every sky region the UNSEEN value rather than
    /// 0.
    #[clap(long, help_heading = "TARGET MAPS")]
    #[serde(default)]
    pub(super) full_map: bool,

    #[clap(long, help = FOV_RADIUS_HELP.as_str(), help_heading = "TARGET MAPS")]
    pub(super) fov_radius: Option<f64>,

    /// The desired coverage fraction of the wide-fast-deep region. Default:
    /// 1.0
    #[clap(long, help_heading = "REGION FRACTIONS")]
    pub(super) wfd_fraction: Option<f64>,

    /// The desired coverage fraction of the north ecliptic spur. Default: 0.3
    #[clap(long, help_heading = "REGION FRACTIONS")]
    pub(super) nes_fraction: Option<f64>,

    /// The desired coverage fraction of the south celestial pole. Default:
    /// 0.4
    #[clap(long, help_heading = "REGION FRACTIONS")]
    pub(super) scp_fraction: Option<f64>,

    /// The desired coverage fraction of the galactic plane. Default: 0.2
    #[clap(long, help_heading = "REGION FRACTIONS")]
    pub(super) gp_fraction: Option<f64>,

    /// The desired coverage fraction of the upper (northern) edge of the
    /// wide-fast-deep region. If this is 0, the upper edge is part of the
    /// wide-fast-deep region. Default: 0.0
    #[clap(long, help_heading = "REGION FRACTIONS")]
    pub(super) wfd_upper_edge_fraction: Option<f64>,

    /// Coverage fractions for individual filters. These can only be given in
    /// an argument file, and take precedence over the fractions above.
    #[clap(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) filter_fractions: Option<IndexMap<String, RegionFractions>>,

    /// The geometry of the sky regions. This can only be given in an argument
    /// file.
    #[clap(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) region_bounds: Option<RegionBounds>,

    /// Also make even-year and odd-year variants of the target maps.
    #[clap(long, help_heading = "YEAR PARITY")]
    #[serde(default)]
    pub(super) year_parity: bool,

    #[clap(long, help = UP_FACTOR_HELP.as_str(), help_heading = "YEAR PARITY")]
    pub(super) up_factor: Option<f64>,

    #[clap(long, help = DOWN_FACTOR_HELP.as_str(), help_heading = "YEAR PARITY")]
    pub(super) down_factor: Option<f64>,

    /// The filter whose target map is split into halves. Pixels of this map
    /// with a value of exactly 1 form the reference region. Default: the
    /// first filter.
    #[clap(long, help_heading = "YEAR PARITY")]
    pub(super) parity_reference_filter: Option<String>,
}

impl TargetMapArgs {
    /// Merge two sets of arguments, preferring `self` where both have a value.
    pub(super) fn merge(self, other: Self) -> Self {
        TargetMapArgs {
            nside: self.nside.or(other.nside),
            filters: self.filters.or(other.filters),
            full_map: self.full_map || other.full_map,
            fov_radius: self.fov_radius.or(other.fov_radius),
            wfd_fraction: self.wfd_fraction.or(other.wfd_fraction),
            nes_fraction: self.nes_fraction.or(other.nes_fraction),
            scp_fraction: self.scp_fraction.or(other.scp_fraction),
            gp_fraction: self.gp_fraction.or(other.gp_fraction),
            wfd_upper_edge_fraction: self
                .wfd_upper_edge_fraction
                .or(other.wfd_upper_edge_fraction),
            filter_fractions: self.filter_fractions.or(other.filter_fractions),
            region_bounds: self.region_bounds.or(other.region_bounds),
            year_parity: self.year_parity || other.year_parity,
            up_factor: self.up_factor.or(other.up_factor),
            down_factor: self.down_factor.or(other.down_factor),
            parity_reference_filter: self
                .parity_reference_filter
                .or(other.parity_reference_filter),
        }
    }

    pub(super) fn parse(self) -> Result<TargetMapsParams, TargetMapArgsError> {
        let TargetMapArgs {
            nside,
            filters,
            full_map,
            fov_radius,
            wfd_fraction,
            nes_fraction,
            scp_fraction,
            gp_fraction,
            wfd_upper_edge_fraction,
            filter_fractions,
            region_bounds,
            year_parity,
            up_factor,
            down_factor,
            parity_reference_filter,
        } = self;

        let filters = match filters {
            None => vec![Filter::R],
            Some(filters) if filters.is_empty() => return Err(TargetMapArgsError::NoFilters),
            Some(filters) => filters
                .iter()
                .map(|f| parse_filter(f))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let default_fractions = {
            let d = RegionFractions::default();
            RegionFractions {
                wfd: wfd_fraction.unwrap_or(d.wfd),
                nes: nes_fraction.unwrap_or(d.nes),
                scp: scp_fraction.unwrap_or(d.scp),
                gp: gp_fraction.unwrap_or(d.gp),
                wfd_upper_edge: wfd_upper_edge_fraction.unwrap_or(d.wfd_upper_edge),
            }
        };
        default_fractions.validate()?;

        let mut per_filter = IndexMap::new();
        for (name, fractions) in filter_fractions.unwrap_or_default() {
            let filter = parse_filter(&name)?;
            if !filters.contains(&filter) {
                format!("Coverage fractions were given for filter '{filter}', but it isn't being used; ignoring").warn();
                continue;
            }
            fractions.validate()?;
            per_filter.insert(filter, fractions);
        }

        let mut fractions = IndexMap::with_capacity(filters.len());
        for filter in filters {
            let f = per_filter.get(&filter).copied().unwrap_or(default_fractions);
            if fractions.insert(filter, f).is_some() {
                return Err(ConfigurationError::DuplicateFilter(filter).into());
            }
        }

        let fov_radius = fov_radius.unwrap_or(DEFAULT_FOV_RADIUS_DEG);
        if !(fov_radius > 0.0 && fov_radius.is_finite()) {
            return Err(ConfigurationError::InvalidFovRadius(fov_radius).into());
        }

        let year_parity = if year_parity {
            let reference_filter = match parity_reference_filter {
                Some(f) => parse_filter(&f)?,
                // There's always at least one filter.
                None => *fractions.keys().next().unwrap_or(&Filter::R),
            };
            if !fractions.contains_key(&reference_filter) {
                return Err(ConfigurationError::MissingFilter(reference_filter).into());
            }
            let up_factor = up_factor.unwrap_or(DEFAULT_UP_FACTOR);
            let down_factor = down_factor.unwrap_or(DEFAULT_DOWN_FACTOR);
            check_parity_factors(up_factor, down_factor)?;
            Some(YearParityParams {
                reference_filter,
                up_factor,
                down_factor,
            })
        } else {
            if up_factor.is_some() || down_factor.is_some() || parity_reference_filter.is_some() {
                "Year-parity options were given without --year-parity; ignoring them".warn();
            }
            None
        };

        let nside = nside.unwrap_or(DEFAULT_NSIDE);
        let builder = TargetMapBuilder::with_bounds(nside, region_bounds.unwrap_or_default())?
            .full_map(full_map);

        let mut printer = InfoPrinter::new("Target maps".into());
        printer.push_line(
            format!(
                "nside {} ({} pixels of {:.4} deg²)",
                builder.nside(),
                builder.nside().num_pixels(),
                builder.nside().pixel_area_deg2()
            )
            .into(),
        );
        let mut block = vec![];
        for (filter, f) in &fractions {
            block.push(
                format!(
                    "{filter}: WFD {}, NES {}, SCP {}, GP {}, WFD upper edge {}",
                    f.wfd, f.nes, f.scp, f.gp, f.wfd_upper_edge
                )
                .into(),
            );
        }
        printer.push_block(block);
        printer.push_line(format!("FOV radius {fov_radius}°").into());
        if full_map {
            printer.push_line("Out-of-bounds pixels are UNSEEN".into());
        }
        if let Some(yp) = &year_parity {
            printer.push_line(
                format!(
                    "Year parity: reference filter {}, up {}, down {}",
                    yp.reference_filter, yp.up_factor, yp.down_factor
                )
                .into(),
            );
        }
        printer.display();

        if log::log_enabled!(Trace) {
            trace!("Coverage fractions: {fractions:?}");
        }

        Ok(TargetMapsParams {
            builder,
            fractions,
            fov_radius,
            year_parity,
            output: None,
        })
    }
}

fn parse_filter(s: &str) -> Result<Filter, TargetMapArgsError> {
    Filter::from_str(&s.to_lowercase()).map_err(|_| TargetMapArgsError::InvalidFilter(s.to_string()))
}

#[derive(thiserror::Error, Debug)]
pub(super) enum TargetMapArgsError {
    #[error("Filter '{0}' isn't recognised; supported filters: {filters}", filters = *FILTERS_COMMA_SEPARATED)]
    InvalidFilter(String),

    #[error("An empty list of filters was given")]
    NoFilters,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
