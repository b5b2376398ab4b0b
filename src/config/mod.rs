// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Operator-facing settings: where the telescope parks, and how the
//! scheduler driver starts up. These are plain records, but they can only be
//! made through validating constructors.

mod driver;
mod park;
#[cfg(test)]
mod tests;

pub use driver::{DriverError, SchedulerDriverConfig, StartupType, STARTUP_TYPES_COMMA_SEPARATED};
pub use park::{ParkError, ParkPosition, ParkPositionBuilder};
