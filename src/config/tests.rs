// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{path::PathBuf, str::FromStr};

use serial_test::serial;

use super::*;
use crate::filter::Filter;

#[test]
fn test_default_park_position() {
    let park = ParkPosition::default();
    assert_eq!(park.telescope_azimuth(), 45.0);
    assert_eq!(park.telescope_altitude(), 86.5);
    assert_eq!(park.dome_azimuth(), 45.0);
    assert_eq!(park.dome_altitude(), 90.0);
    assert_eq!(park.telescope_rotator(), 0.0);
    assert_eq!(park.filter_position(), Filter::Z);

    // An empty builder gives the defaults.
    assert_eq!(ParkPosition::builder().build().unwrap(), park);
}

#[test]
fn test_park_builder_overrides() {
    let park = ParkPosition::builder()
        .telescope_azimuth(180.0)
        .dome_altitude(0.0)
        .filter_position(Filter::R)
        .build()
        .unwrap();
    assert_eq!(park.telescope_azimuth(), 180.0);
    assert_eq!(park.dome_altitude(), 0.0);
    assert_eq!(park.filter_position(), Filter::R);
    // Untouched values are still the defaults.
    assert_eq!(park.telescope_altitude(), 86.5);
}

#[test]
fn test_park_rejects_bad_angles() {
    let result = ParkPosition::builder().telescope_azimuth(360.0).build();
    assert_eq!(
        result,
        Err(ParkError::Azimuth {
            axis: "telescope",
            value: 360.0
        })
    );

    let result = ParkPosition::builder().dome_azimuth(-1.0).build();
    assert!(matches!(result, Err(ParkError::Azimuth { axis: "dome", .. })));

    let result = ParkPosition::builder().telescope_altitude(90.5).build();
    assert!(matches!(result, Err(ParkError::Altitude { axis: "telescope", .. })));

    let result = ParkPosition::builder().dome_altitude(f64::NAN).build();
    assert!(matches!(result, Err(ParkError::Altitude { axis: "dome", .. })));

    let result = ParkPosition::builder().telescope_rotator(91.0).build();
    assert_eq!(result, Err(ParkError::Rotator(91.0)));
}

#[test]
fn test_startup_type_parsing() {
    assert_eq!(StartupType::from_str("HOT").unwrap(), StartupType::Hot);
    assert_eq!(StartupType::from_str("warm").unwrap(), StartupType::Warm);
    assert_eq!(StartupType::from_str("Cold").unwrap(), StartupType::Cold);
    assert!(StartupType::from_str("lukewarm").is_err());
    assert_eq!(StartupType::Warm.to_string(), "WARM");
    assert_eq!(STARTUP_TYPES_COMMA_SEPARATED.as_str(), "HOT, WARM, COLD");

    assert_eq!(serde_json::to_string(&StartupType::Hot).unwrap(), "\"HOT\"");
}

#[test]
#[serial]
fn test_hot_and_warm_starts_need_a_database() {
    for startup in [StartupType::Hot, StartupType::Warm] {
        assert_eq!(
            SchedulerDriverConfig::new(startup, None),
            Err(DriverError::MissingDatabase(startup))
        );
        assert_eq!(
            SchedulerDriverConfig::new(startup, Some(PathBuf::new())),
            Err(DriverError::MissingDatabase(startup))
        );
    }

    let tmp = tempfile::NamedTempFile::new().unwrap();
    let config = SchedulerDriverConfig::new(StartupType::Warm, Some(tmp.path().to_path_buf()))
        .unwrap();
    assert_eq!(config.startup_type(), StartupType::Warm);
    assert_eq!(config.startup_database(), Some(tmp.path()));
}

#[test]
#[serial]
fn test_cold_start_drops_the_database() {
    let config = SchedulerDriverConfig::new(StartupType::Cold, None).unwrap();
    assert_eq!(config.startup_database(), None);

    let config =
        SchedulerDriverConfig::new(StartupType::Cold, Some(PathBuf::from("/tmp/prev.db"))).unwrap();
    assert_eq!(config.startup_type(), StartupType::Cold);
    assert_eq!(config.startup_database(), None);
}
