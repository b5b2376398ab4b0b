// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests for assembling scheduler configurations.

use std::io::Write;

use indoc::indoc;
use tempfile::TempDir;

use crate::*;

#[test]
fn test_assemble_baseline_configuration() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("scheduler.yaml");
    let (arg_file, mut f) = make_file_in_dir("baseline.json", tmp_dir.path());
    f.write_all(
        indoc! {r#"
            {
                "general_proposals": ["TMA_test"],
                "sequence_proposals": [],
                "target_maps": {
                    "nside": 32,
                    "filters": ["r"],
                    "wfd_fraction": 1.0,
                    "nes_fraction": 0.0,
                    "scp_fraction": 0.0,
                    "gp_fraction": 0.0
                }
            }
        "#}
        .as_bytes(),
    )
    .unwrap();
    drop(f);

    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "assemble",
            &format!("{}", arg_file.display()),
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "assemble failed: {}", get_cmd_output(cmd).1);

    let doc: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["survey_topology"]["num_general_props"].as_u64(), Some(1));
    assert_eq!(doc["survey_topology"]["num_seq_props"].as_u64(), Some(0));
    assert_eq!(doc["park"]["telescope_altitude"].as_f64(), Some(86.5));
    assert_eq!(doc["driver"]["startup_type"].as_str(), Some("COLD"));
    assert_eq!(doc["scheduler"]["nside"].as_u64(), Some(32));

    let survey = &doc["scheduler"]["surveys"][0][0];
    assert_eq!(survey["filter"].as_str(), Some("r"));
    assert_eq!(survey["block_size"].as_u64(), Some(1));
    assert_eq!(survey["dither"].as_bool(), Some(true));
    assert_eq!(survey["ignore_obs"].as_str(), Some("DD"));
    let bfs = survey["basis_functions"].as_sequence().unwrap();
    let types: Vec<_> = bfs
        .iter()
        .map(|bf| bf["basis_function"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        [
            "hour_angle_bonus",
            "target_map",
            "meridian_stripe",
            "aggressive_slewtime",
            "avoid_fast_revisits"
        ]
    );
    let weights: Vec<_> = bfs.iter().map(|bf| bf["weight"].as_f64().unwrap()).collect();
    assert_eq!(weights, [1.0, 0.1, 1.0, 1.0, 1.0]);
    assert_eq!(
        survey["tag_map"].as_sequence().unwrap().len(),
        12_288
    );
}

#[test]
fn test_hot_start_needs_a_database() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("scheduler.json");

    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "assemble",
            "--nside", "4",
            "--startup-type", "HOT",
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("HOT"), "{stderr}");
    assert!(!output.exists());

    let (db, _) = make_file_in_dir("prev.db", tmp_dir.path());
    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "assemble",
            "--nside", "4",
            "--startup-type", "HOT",
            "--startup-database", &format!("{}", db.display()),
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "assemble failed: {}", get_cmd_output(cmd).1);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["driver"]["startup_type"], "HOT");
    assert_eq!(
        json["driver"]["startup_database"].as_str(),
        Some(format!("{}", db.display()).as_str())
    );
}

#[test]
fn test_bad_park_position_is_reported() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "assemble",
            "--nside", "4",
            "--park-telescope-azimuth", "400",
            "-o", &format!("{}", tmp_dir.path().join("s.json").display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("azimuth"), "{stderr}");
}
