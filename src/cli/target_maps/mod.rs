// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, TargetMapArgs, ARG_FILE_HELP};
use crate::{
    io::write::{can_write_to_file, OutputType, OUTPUT_EXTENSIONS},
    params::TargetMapsParams,
    FbsConfigError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_HELP: String =
        format!("Path to the output target-map file. Supported formats: {}", *OUTPUT_EXTENSIONS);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct TargetMapsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "target_maps")]
    #[serde(default)]
    pub(super) target_map_args: TargetMapArgs,

    #[clap(short = 'o', long, help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl TargetMapsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<TargetMapsArgs, FbsConfigError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let TargetMapsArgs {
                args_file: _,
                target_map_args,
                output,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(TargetMapsArgs {
                args_file: None,
                target_map_args: cli_args.target_map_args.merge(target_map_args),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<TargetMapsParams, FbsConfigError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            target_map_args,
            output,
        } = self;

        if let Some(output) = &output {
            // Complain about the extension before any maps are made.
            OutputType::from_path(output)?;
            can_write_to_file(output)?;
        }

        let mut params = target_map_args.parse()?;
        params.output = output;

        display_warnings();

        Ok(params)
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
