// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    display_warnings, InfoPrinter, TargetMapArgs, TargetMapArgsError, Warn, ARG_FILE_HELP,
};
use crate::{
    config::{
        DriverError, ParkError, ParkPosition, SchedulerDriverConfig, StartupType,
        STARTUP_TYPES_COMMA_SEPARATED,
    },
    constants::{DEFAULT_BASIS_FUNCTION_WEIGHTS, DEFAULT_BLOCK_SIZE, DEFAULT_IGNORE_OBS},
    filter::Filter,
    io::write::{can_write_to_file, OutputType, OUTPUT_EXTENSIONS},
    params::AssembleParams,
    scheduler::{BasisFunctionSettings, SurveyTopology},
    FbsConfigError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_HELP: String =
        format!("Path to the output scheduler configuration. Supported formats: {}", *OUTPUT_EXTENSIONS);

    static ref STARTUP_TYPE_HELP: String =
        format!("How the scheduler driver starts. Supported types: {}. Default: COLD", *STARTUP_TYPES_COMMA_SEPARATED);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AssembleArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "target_maps")]
    #[serde(default)]
    pub(super) target_map_args: TargetMapArgs,

    /// The names of the general proposals.
    #[clap(long, multiple_values(true), help_heading = "SURVEY TOPOLOGY")]
    pub(super) general_proposals: Option<Vec<String>>,

    /// The names of the sequence proposals.
    #[clap(long, multiple_values(true), help_heading = "SURVEY TOPOLOGY")]
    pub(super) sequence_proposals: Option<Vec<String>>,

    #[clap(long, help = STARTUP_TYPE_HELP.as_str(), help_heading = "SCHEDULER DRIVER")]
    pub(super) startup_type: Option<String>,

    /// The observation database of a previous run. Required for HOT and WARM
    /// starts.
    #[clap(long, help_heading = "SCHEDULER DRIVER")]
    pub(super) startup_database: Option<PathBuf>,

    /// The telescope azimuth when parked [degrees]. Default: 45
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_telescope_azimuth: Option<f64>,

    /// The telescope altitude when parked [degrees]. Default: 86.5
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_telescope_altitude: Option<f64>,

    /// The telescope rotator angle when parked [degrees]. Default: 0
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_telescope_rotator: Option<f64>,

    /// The dome azimuth when parked [degrees]. Default: 45
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_dome_azimuth: Option<f64>,

    /// The dome altitude when parked [degrees]. Default: 90
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_dome_altitude: Option<f64>,

    /// The filter in place when parked. Default: z
    #[clap(long, help_heading = "PARK POSITION")]
    pub(super) park_filter: Option<String>,

    /// The weights of the hour-angle bonus, target map, meridian stripe,
    /// aggressive slewtime and avoid-fast-revisits basis functions. Default:
    /// 1.0 0.1 1.0 1.0 1.0
    #[clap(long, multiple_values(true), help_heading = "SURVEYS")]
    pub(super) weights: Option<Vec<f64>>,

    /// The number of observations a survey requests at a time. Default: 1
    #[clap(long, help_heading = "SURVEYS")]
    pub(super) block_size: Option<usize>,

    /// Don't dither pointings.
    #[clap(long, help_heading = "SURVEYS")]
    #[serde(default)]
    pub(super) no_dither: bool,

    /// Observations with this note are ignored by the surveys. An empty
    /// string ignores nothing. Default: DD
    #[clap(long, help_heading = "SURVEYS")]
    pub(super) ignore_obs: Option<String>,

    /// Basis-function parameters. These can only be given in an argument
    /// file.
    #[clap(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) basis_functions: Option<BasisFunctionSettings>,

    #[clap(short = 'o', long, help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl AssembleArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<AssembleArgs, FbsConfigError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let AssembleArgs {
                args_file: _,
                target_map_args,
                general_proposals,
                sequence_proposals,
                startup_type,
                startup_database,
                park_telescope_azimuth,
                park_telescope_altitude,
                park_telescope_rotator,
                park_dome_azimuth,
                park_dome_altitude,
                park_filter,
                weights,
                block_size,
                no_dither,
                ignore_obs,
                basis_functions,
                output,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(AssembleArgs {
                args_file: None,
                target_map_args: cli_args.target_map_args.merge(target_map_args),
                general_proposals: cli_args.general_proposals.or(general_proposals),
                sequence_proposals: cli_args.sequence_proposals.or(sequence_proposals),
                startup_type: cli_args.startup_type.or(startup_type),
                startup_database: cli_args.startup_database.or(startup_database),
                park_telescope_azimuth: cli_args.park_telescope_azimuth.or(park_telescope_azimuth),
                park_telescope_altitude: cli_args
                    .park_telescope_altitude
                    .or(park_telescope_altitude),
                park_telescope_rotator: cli_args.park_telescope_rotator.or(park_telescope_rotator),
                park_dome_azimuth: cli_args.park_dome_azimuth.or(park_dome_azimuth),
                park_dome_altitude: cli_args.park_dome_altitude.or(park_dome_altitude),
                park_filter: cli_args.park_filter.or(park_filter),
                weights: cli_args.weights.or(weights),
                block_size: cli_args.block_size.or(block_size),
                no_dither: cli_args.no_dither || no_dither,
                ignore_obs: cli_args.ignore_obs.or(ignore_obs),
                basis_functions: cli_args.basis_functions.or(basis_functions),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<AssembleParams, AssembleArgsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            target_map_args,
            general_proposals,
            sequence_proposals,
            startup_type,
            startup_database,
            park_telescope_azimuth,
            park_telescope_altitude,
            park_telescope_rotator,
            park_dome_azimuth,
            park_dome_altitude,
            park_filter,
            weights,
            block_size,
            no_dither,
            ignore_obs,
            basis_functions,
            output,
        } = self;

        let output = output.ok_or(AssembleArgsError::NoOutput)?;
        // Make sure the output can be written before doing any work.
        OutputType::from_path(&output).map_err(|e| AssembleArgsError::Output(e.to_string()))?;
        can_write_to_file(&output).map_err(|e| AssembleArgsError::Output(e.to_string()))?;

        let target_maps = target_map_args.parse()?;

        let topology = SurveyTopology::new(
            general_proposals.unwrap_or_default(),
            sequence_proposals.unwrap_or_default(),
        );
        if topology.num_general_props() == 0 && topology.num_seq_props() == 0 {
            "No proposals were named in the survey topology".warn();
        }

        let startup_type = match startup_type {
            Some(s) => StartupType::from_str(&s).map_err(|_| DriverError::UnknownStartupType(s))?,
            None => StartupType::Cold,
        };
        let driver = SchedulerDriverConfig::new(startup_type, startup_database)?;

        let park = {
            let mut builder = ParkPosition::builder();
            if let Some(v) = park_telescope_azimuth {
                builder = builder.telescope_azimuth(v);
            }
            if let Some(v) = park_telescope_altitude {
                builder = builder.telescope_altitude(v);
            }
            if let Some(v) = park_telescope_rotator {
                builder = builder.telescope_rotator(v);
            }
            if let Some(v) = park_dome_azimuth {
                builder = builder.dome_azimuth(v);
            }
            if let Some(v) = park_dome_altitude {
                builder = builder.dome_altitude(v);
            }
            if let Some(f) = park_filter {
                let filter = Filter::from_str(&f.to_lowercase())
                    .map_err(|_| TargetMapArgsError::InvalidFilter(f))?;
                builder = builder.filter_position(filter);
            }
            builder.build()?
        };

        let mut basis_functions = basis_functions.unwrap_or_default();
        if let Some(weights) = weights {
            basis_functions.weights = weights;
        }
        let num_basis_functions = DEFAULT_BASIS_FUNCTION_WEIGHTS.len();
        if basis_functions.weights.len() != num_basis_functions {
            return Err(AssembleArgsError::WeightCountMismatch {
                expected: num_basis_functions,
                got: basis_functions.weights.len(),
            });
        }

        let block_size = match block_size {
            Some(b) => NonZeroUsize::new(b).ok_or(AssembleArgsError::ZeroBlockSize)?,
            None => DEFAULT_BLOCK_SIZE,
        };
        let ignore_obs = match ignore_obs {
            Some(s) if s.is_empty() => None,
            Some(s) => Some(s),
            None => Some(DEFAULT_IGNORE_OBS.to_string()),
        };

        let mut printer = InfoPrinter::new("Scheduler".into());
        printer.push_block(vec![
            format!(
                "General proposals: [{}]",
                topology.general_proposals().iter().join(", ")
            )
            .into(),
            format!(
                "Sequence proposals: [{}]",
                topology.sequence_proposals().iter().join(", ")
            )
            .into(),
        ]);
        let mut driver_block = vec![format!("{} start", driver.startup_type()).into()];
        if let Some(db) = driver.startup_database() {
            driver_block.push(format!("with database {}", db.display()).into());
        }
        printer.push_block(driver_block);
        printer.push_line(
            format!(
                "Park: telescope ({}°, {}°), rotator {}°, dome ({}°, {}°), filter {}",
                park.telescope_azimuth(),
                park.telescope_altitude(),
                park.telescope_rotator(),
                park.dome_azimuth(),
                park.dome_altitude(),
                park.filter_position()
            )
            .into(),
        );
        printer.push_line(
            format!(
                "Basis-function weights: [{}]",
                basis_functions.weights.iter().join(", ")
            )
            .into(),
        );
        printer.push_line(format!("Writing to {}", output.display()).into());
        printer.display();

        display_warnings();

        Ok(AssembleParams {
            target_maps,
            topology,
            park,
            driver,
            basis_functions,
            block_size,
            dither: !no_dither,
            ignore_obs,
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), FbsConfigError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum AssembleArgsError {
    #[error("No output file was specified for the scheduler configuration")]
    NoOutput,

    #[error("The survey block size cannot be 0")]
    ZeroBlockSize,

    #[error("{got} basis-function weights were given, but {expected} are needed")]
    WeightCountMismatch { expected: usize, got: usize },

    #[error("{0}")]
    Output(String),

    #[error(transparent)]
    TargetMapArgs(#[from] TargetMapArgsError),

    #[error(transparent)]
    Park(#[from] ParkError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
