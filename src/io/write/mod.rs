// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to handle writing out configuration documents.

mod error;
#[cfg(test)]
mod tests;
pub(crate) use error::{FileWriteError, WriteError};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, trace};
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::cli::Warn;

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
/// All supported output formats.
pub(crate) enum OutputType {
    #[strum(serialize = "json")]
    Json,
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
    #[strum(serialize = "toml")]
    Toml,
}

lazy_static::lazy_static! {
    pub(crate) static ref OUTPUT_EXTENSIONS: String = OutputType::iter().join(", ");
}

impl OutputType {
    /// Work out the output type from a file's extension (case insensitive).
    pub(crate) fn from_path(file: &Path) -> Result<OutputType, WriteError> {
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| WriteError::NoExtension(file.to_path_buf()))?;
        OutputType::from_str(&ext.to_lowercase())
            .map_err(|_| WriteError::UnsupportedExtension(file.to_path_buf()))
    }
}

/// Serialise `document` in the given format.
pub(crate) fn serialise<T: Serialize>(
    document: &T,
    output_type: OutputType,
) -> Result<String, WriteError> {
    let s = match output_type {
        OutputType::Json => serde_json::to_string_pretty(document)?,
        OutputType::Yaml => serde_yaml::to_string(document)?,
        OutputType::Toml => toml::to_string(document)?,
    };
    Ok(s)
}

/// Write `document` to `file`, in the format given by the file's extension.
pub(crate) fn write_document<T: Serialize>(document: &T, file: &Path) -> Result<(), WriteError> {
    let output_type = OutputType::from_path(file)?;
    debug!("Writing {output_type} to {}", file.display());
    let contents = serialise(document, output_type)?;
    let mut f = BufWriter::new(File::create(file)?);
    f.write_all(contents.as_bytes())?;
    f.flush()?;
    Ok(())
}

/// Check if we are able to write to a file path. If we aren't able to write to
/// the file, it's either because the directory containing the file doesn't
/// exist, or there's another issue (probably bad permissions). In the former
/// case, create the parent directories, otherwise return an error.
/// Additionally, if the file exists, emit a warning that it will be
/// overwritten.
///
/// This code _doesn't_ alter the file if it exists.
pub(crate) fn can_write_to_file(file: &Path) -> Result<(), FileWriteError> {
    trace!("Testing whether we can write to {}", file.display());

    if file.is_dir() {
        return Err(FileWriteError::FileNotWritable {
            file: file.display().to_string(),
        });
    }
    let exists = can_write_to_file_inner(file)?;
    if exists {
        format!("Will overwrite the existing file '{}'", file.display()).warn();
    }

    Ok(())
}

fn can_write_to_file_inner(file: &Path) -> Result<bool, FileWriteError> {
    let file_exists = file.exists();

    match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(file)
        .map_err(|e| e.kind())
    {
        // File is writable.
        Ok(_) => {
            // If the file in question didn't already exist, `OpenOptions::new`
            // creates it as part of its work. We don't want to keep the 0-sized
            // file; remove it if it didn't exist before.
            if !file_exists {
                std::fs::remove_file(file).map_err(FileWriteError::IO)?;
            }
        }

        // File doesn't exist. Attempt to make the directories leading up to the
        // file; if this fails, then we can't write the file anyway.
        Err(std::io::ErrorKind::NotFound) => {
            if let Some(p) = file.parent() {
                match std::fs::DirBuilder::new()
                    .recursive(true)
                    .create(p)
                    .map_err(|e| e.kind())
                {
                    Ok(()) => (),
                    Err(std::io::ErrorKind::PermissionDenied) => {
                        return Err(FileWriteError::NewDirectory(p.to_path_buf()))
                    }
                    Err(e) => return Err(FileWriteError::IO(e.into())),
                }
            }
        }

        Err(std::io::ErrorKind::PermissionDenied) => {
            return Err(FileWriteError::FileNotWritable {
                file: file.display().to_string(),
            })
        }

        Err(e) => {
            return Err(FileWriteError::IO(e.into()));
        }
    }

    Ok(file_exists)
}
