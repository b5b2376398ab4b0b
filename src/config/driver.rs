// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::cli::Warn;

lazy_static::lazy_static! {
    pub static ref STARTUP_TYPES_COMMA_SEPARATED: String = StartupType::iter().join(", ");
}

/// How the scheduler driver starts.
#[derive(
    Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum StartupType {
    /// Resume from the previous run's state and its observation database.
    #[strum(serialize = "HOT")]
    Hot,

    /// Rebuild the state from a previous run's observation database.
    #[strum(serialize = "WARM")]
    Warm,

    /// Start from nothing.
    #[strum(serialize = "COLD")]
    Cold,
}

impl StartupType {
    /// Does this startup need an observation database from a prior run?
    pub fn needs_database(self) -> bool {
        matches!(self, StartupType::Hot | StartupType::Warm)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerDriverConfig {
    startup_type: StartupType,
    #[serde(skip_serializing_if = "Option::is_none")]
    startup_database: Option<PathBuf>,
}

impl SchedulerDriverConfig {
    /// HOT and WARM starts need a database; a database given to a COLD start
    /// is dropped with a warning.
    pub fn new(
        startup_type: StartupType,
        startup_database: Option<PathBuf>,
    ) -> Result<SchedulerDriverConfig, DriverError> {
        let startup_database = match (startup_type.needs_database(), startup_database) {
            (true, None) => return Err(DriverError::MissingDatabase(startup_type)),
            (true, Some(db)) => {
                if db.as_os_str().is_empty() {
                    return Err(DriverError::MissingDatabase(startup_type));
                }
                if !db.exists() {
                    format!(
                        "The startup database '{}' doesn't exist on this machine",
                        db.display()
                    )
                    .warn();
                }
                Some(db)
            }
            (false, Some(db)) => {
                format!(
                    "Ignoring the startup database '{}' for a {startup_type} start",
                    db.display()
                )
                .warn();
                None
            }
            (false, None) => None,
        };
        debug!("Scheduler driver: {startup_type} start, database {startup_database:?}");

        Ok(SchedulerDriverConfig {
            startup_type,
            startup_database,
        })
    }

    pub fn startup_type(&self) -> StartupType {
        self.startup_type
    }

    pub fn startup_database(&self) -> Option<&Path> {
        self.startup_database.as_deref()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    #[error("A {0} start needs the observation database of a previous run, but none was given")]
    MissingDatabase(StartupType),

    #[error("Unrecognised startup type '{0}'; valid types are: {types}", types = *STARTUP_TYPES_COMMA_SEPARATED)]
    UnknownStartupType(String),
}
