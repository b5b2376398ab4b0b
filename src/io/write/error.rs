// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from writing files.

use std::path::PathBuf;

use thiserror::Error;

use super::OUTPUT_EXTENSIONS;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Output file '{0}' has no extension; supported formats: {exts}", exts = *OUTPUT_EXTENSIONS)]
    NoExtension(PathBuf),

    #[error("Output file '{0}' has an unsupported extension; supported formats: {exts}", exts = *OUTPUT_EXTENSIONS)]
    UnsupportedExtension(PathBuf),

    #[error("Couldn't serialise json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Couldn't serialise yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Couldn't serialise toml: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FileWriteError {
    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error(
        "Couldn't create directory '{0}' for output files. Do you have write permissions set?"
    )]
    NewDirectory(PathBuf),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
