// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all fbs-config-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{assemble::AssembleArgsError, common::TargetMapArgsError};
use crate::{
    config::{DriverError, ParkError},
    io::write::{FileWriteError, WriteError},
    params::{AssembleError, TargetMapsError},
    scheduler::SurveyError,
    target_map::{ConfigurationError, DegenerateMapError, TargetMapError},
};

/// The *only* publicly visible error from fbs-config.
#[derive(Error, Debug)]
pub enum FbsConfigError {
    /// An error related to target-map configuration (fractions, resolution,
    /// year parity).
    #[error("{0}")]
    TargetMap(String),

    /// A target map can't be normalised.
    #[error("{0}\n\nEvery filter needs a target map with some positive in-bounds weight.")]
    DegenerateMap(String),

    /// An error related to the park position or the scheduler driver.
    #[error("{0}")]
    Observatory(String),

    /// An error related to basis functions, surveys or the core scheduler.
    #[error("{0}")]
    Scheduler(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// An error related to writing files.
    #[error("{0}")]
    Write(String),

    /// An IO error.
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ConfigurationError> for FbsConfigError {
    fn from(e: ConfigurationError) -> Self {
        Self::TargetMap(e.to_string())
    }
}

impl From<DegenerateMapError> for FbsConfigError {
    fn from(e: DegenerateMapError) -> Self {
        Self::DegenerateMap(e.to_string())
    }
}

impl From<TargetMapError> for FbsConfigError {
    fn from(e: TargetMapError) -> Self {
        match e {
            TargetMapError::Configuration(e) => Self::from(e),
            TargetMapError::DegenerateMap(e) => Self::from(e),
        }
    }
}

impl From<TargetMapArgsError> for FbsConfigError {
    fn from(e: TargetMapArgsError) -> Self {
        match e {
            TargetMapArgsError::Configuration(e) => Self::from(e),
            TargetMapArgsError::InvalidFilter(_) | TargetMapArgsError::NoFilters => {
                Self::TargetMap(e.to_string())
            }
        }
    }
}

impl From<AssembleArgsError> for FbsConfigError {
    fn from(e: AssembleArgsError) -> Self {
        match e {
            AssembleArgsError::TargetMapArgs(e) => Self::from(e),
            AssembleArgsError::Park(e) => Self::from(e),
            AssembleArgsError::Driver(e) => Self::from(e),
            AssembleArgsError::Output(_) => Self::Write(e.to_string()),
            AssembleArgsError::NoOutput
            | AssembleArgsError::ZeroBlockSize
            | AssembleArgsError::WeightCountMismatch { .. } => Self::Scheduler(e.to_string()),
        }
    }
}

impl From<ParkError> for FbsConfigError {
    fn from(e: ParkError) -> Self {
        Self::Observatory(e.to_string())
    }
}

impl From<DriverError> for FbsConfigError {
    fn from(e: DriverError) -> Self {
        Self::Observatory(e.to_string())
    }
}

impl From<SurveyError> for FbsConfigError {
    fn from(e: SurveyError) -> Self {
        Self::Scheduler(e.to_string())
    }
}

impl From<FileWriteError> for FbsConfigError {
    fn from(e: FileWriteError) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<WriteError> for FbsConfigError {
    fn from(e: WriteError) -> Self {
        match e {
            WriteError::IO(e) => Self::from(e),
            _ => Self::Write(e.to_string()),
        }
    }
}

impl From<TargetMapsError> for FbsConfigError {
    fn from(e: TargetMapsError) -> Self {
        match e {
            TargetMapsError::TargetMap(e) => Self::from(e),
            TargetMapsError::Write(e) => Self::from(e),
        }
    }
}

impl From<AssembleError> for FbsConfigError {
    fn from(e: AssembleError) -> Self {
        match e {
            AssembleError::TargetMap(e) => Self::from(e),
            AssembleError::Survey(e) => Self::from(e),
            AssembleError::Write(e) => Self::from(e),
        }
    }
}

impl From<toml::ser::Error> for FbsConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::ArgFile(format!("Couldn't serialise the arguments to toml: {e}"))
    }
}
