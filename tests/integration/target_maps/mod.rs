// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests for making target maps.

use std::io::Write;

use approx::assert_abs_diff_eq;
use indoc::indoc;
use tempfile::TempDir;

use crate::*;

const UNSEEN: f64 = -1.6375e30;

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_wfd_only_map_normalises_to_one() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("maps.json");

    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "target-maps",
            "--nside", "32",
            "--filters", "r",
            "--wfd-fraction", "1",
            "--nes-fraction", "0",
            "--scp-fraction", "0",
            "--gp-fraction", "0",
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "target-maps failed on simple test data: {}", get_cmd_output(cmd).1);

    let json = read_json(&output);
    let values: Vec<f64> = json["goal_maps"]["r"]["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(values.len(), 12_288);
    // Only WFD is laid down, so the map is all ones and zeros.
    assert!(values.iter().all(|&v| v == 0.0 || v == 1.0));

    let norm = json["norm_factors"]["r"].as_f64().unwrap();
    let sum: f64 = values.iter().sum();
    assert_abs_diff_eq!(sum * norm, 1.0, epsilon = 1e-12);

    let ids = json["goal_maps"]["r"]["region_ids"].as_array().unwrap();
    for (v, id) in values.iter().zip(ids) {
        let id = id.as_u64().unwrap();
        assert_eq!(*v == 1.0, id == 3);
    }
}

#[test]
fn test_full_map_and_year_parity_from_an_arg_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("maps.json");
    let (arg_file, mut f) = make_file_in_dir("args.toml", tmp_dir.path());
    f.write_all(
        format!(
            indoc! {r#"
                output = "{}"

                [target_maps]
                nside = 16
                filters = ["r", "g"]
                full_map = true
                year_parity = true
                up_factor = 1.75
                down_factor = 0.25

                [target_maps.filter_fractions.r]
                wfd = 1.0
                nes = 0.0
                scp = 0.0
                gp = 0.0
            "#},
            output.display()
        )
        .as_bytes(),
    )
    .unwrap();
    drop(f);

    let cmd = fbs_config()
        .args(["target-maps", &format!("{}", arg_file.display())])
        .ok();
    assert!(cmd.is_ok(), "target-maps failed: {}", get_cmd_output(cmd).1);

    let json = read_json(&output);
    assert_eq!(json["full_map"], true);
    let yp = &json["year_parity"];
    assert_eq!(yp["reference_filter"], "r");

    let to_vec = |v: &serde_json::Value| -> Vec<f64> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect()
    };
    let reference = to_vec(&json["goal_maps"]["r"]["values"]);
    for filter in ["r", "g"] {
        let orig = to_vec(&json["goal_maps"][filter]["values"]);
        let even = to_vec(&yp["even"][filter]);
        let odd = to_vec(&yp["odd"][filter]);
        for i in 0..orig.len() {
            if reference[i] == 1.0 {
                assert_abs_diff_eq!(even[i] + odd[i], 2.0 * orig[i], epsilon = 1e-12);
            } else {
                assert_eq!(even[i], orig[i]);
                assert_eq!(odd[i], orig[i]);
            }
        }
    }
    // Out-of-bounds pixels keep the sentinel in both years.
    assert!(reference.iter().any(|&v| v == UNSEEN));
}

#[test]
fn test_dry_run_and_save_toml() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("maps.toml");
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "--dry-run",
            "--save-toml", &format!("{}", saved.display()),
            "target-maps",
            "--nside", "8",
            "--filters", "u", "g",
            "-o", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "target-maps failed: {}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"));
    assert!(!output.exists());

    // The saved arguments reproduce the run.
    let saved_contents = std::fs::read_to_string(&saved).unwrap();
    assert!(saved_contents.contains("nside = 8"));
    let cmd = fbs_config()
        .args(["target-maps", &format!("{}", saved.display())])
        .ok();
    assert!(cmd.is_ok(), "target-maps failed: {}", get_cmd_output(cmd).1);
    let doc: toml::Value = toml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["nside"].as_integer(), Some(8));
    assert!(doc["goal_maps"].get("u").is_some());
}

#[test]
fn test_bad_input_is_reported() {
    #[rustfmt::skip]
    let cmd = fbs_config()
        .args(["target-maps", "--nside", "24"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("nside"), "{stderr}");

    let cmd = fbs_config()
        .args(["target-maps", "--nes-fraction", "1.5"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("1.5"), "{stderr}");

    // Everything is outside the map; nothing to normalise.
    #[rustfmt::skip]
    let cmd = fbs_config()
        .args([
            "target-maps",
            "--nside", "4",
            "--wfd-fraction", "0",
            "--nes-fraction", "0",
            "--scp-fraction", "0",
            "--gp-fraction", "0",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error"), "{stderr}");
}
