// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use indexmap::{indexmap, IndexMap};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::constants::UNSEEN;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Document {
    nside: u32,
    norm_factors: IndexMap<String, f64>,
    values: Vec<f64>,
}

fn document() -> Document {
    Document {
        nside: 1,
        norm_factors: indexmap! { "r".to_string() => 0.125, "g".to_string() => 0.5 },
        values: vec![1.0, 0.0, UNSEEN],
    }
}

#[test]
fn test_output_type_from_path() {
    assert_eq!(
        OutputType::from_path(&PathBuf::from("maps.json")).unwrap(),
        OutputType::Json
    );
    assert_eq!(
        OutputType::from_path(&PathBuf::from("maps.YML")).unwrap(),
        OutputType::Yaml
    );
    assert_eq!(
        OutputType::from_path(&PathBuf::from("/tmp/a.b/maps.toml")).unwrap(),
        OutputType::Toml
    );
    assert!(matches!(
        OutputType::from_path(&PathBuf::from("maps")),
        Err(WriteError::NoExtension(_))
    ));
    assert!(matches!(
        OutputType::from_path(&PathBuf::from("maps.fits")),
        Err(WriteError::UnsupportedExtension(_))
    ));
    assert_eq!(OUTPUT_EXTENSIONS.as_str(), "json, yaml, toml");
}

#[test]
fn test_serialised_documents_parse_back() {
    let doc = document();

    let s = serialise(&doc, OutputType::Json).unwrap();
    assert_eq!(serde_json::from_str::<Document>(&s).unwrap(), doc);
    // The sentinel must come back bit-exact.
    let parsed: Document = serde_json::from_str(&s).unwrap();
    assert_eq!(parsed.values[2].to_bits(), UNSEEN.to_bits());

    let s = serialise(&doc, OutputType::Yaml).unwrap();
    assert_eq!(serde_yaml::from_str::<Document>(&s).unwrap(), doc);

    let s = serialise(&doc, OutputType::Toml).unwrap();
    let parsed: Document = toml::from_str(&s).unwrap();
    assert_eq!(parsed, doc);
    // Insertion order is kept.
    assert!(s.find("r = ").unwrap() < s.find("g = ").unwrap());
}

#[test]
fn test_write_document_makes_directories() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("nested").join("dir").join("maps.json");

    can_write_to_file(&file).unwrap();
    // Checking doesn't leave an empty file behind, but does make the
    // directories.
    assert!(!file.exists());
    assert!(file.parent().unwrap().is_dir());

    write_document(&document(), &file).unwrap();
    let contents = std::fs::read_to_string(&file).unwrap();
    assert_eq!(serde_json::from_str::<Document>(&contents).unwrap(), document());
}

#[test]
#[serial]
fn test_can_write_to_file_leaves_existing_files_alone() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("maps.toml");
    std::fs::write(&file, "nside = 1\n").unwrap();

    can_write_to_file(&file).unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "nside = 1\n");

    // A directory isn't a file.
    assert!(can_write_to_file(tmp_dir.path()).is_err());
}

#[test]
fn test_write_document_reports_io_errors() {
    let tmp_dir = TempDir::new().unwrap();
    // Without a check first, the missing parent directory isn't made.
    let file = tmp_dir.path().join("missing").join("maps.yaml");
    assert!(matches!(
        write_document(&document(), &file),
        Err(WriteError::IO(_))
    ));
    assert!(!file.exists());
}
