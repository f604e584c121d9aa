//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from files, directories and strings.

use crate::parser::parse_with_mode;
use crate::types::{MachineSpec, Mode, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of machine description files.
pub const DESCRIPTION_EXTENSION: &str = "tm";

/// `MachineLoader` is a utility struct for loading machine descriptions.
/// It provides methods to load a description from a file or from string content,
/// and to discover and load all `.tm` files within a specified directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine description from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the description file to load.
    /// * `mode` - The policy applied to analyzer findings.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineSpec)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be opened or read.
    /// * Any parsing or validation error of the content otherwise.
    pub fn load_machine(path: &Path, mode: Mode) -> Result<MachineSpec, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Cannot open file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), bytes = content.len(), "read machine description");

        parse_with_mode(&content, mode)
    }

    /// Loads a machine description from the provided string content.
    pub fn load_machine_from_string(
        content: &str,
        mode: Mode,
    ) -> Result<MachineSpec, TuringMachineError> {
        parse_with_mode(content, mode)
    }

    /// Loads all description files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Entries are returned sorted by
    /// path so the result does not depend on directory iteration order.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, MachineSpec), TuringMachineError>>` - one element per description
    ///   file, or a single `FileError` if the directory cannot be read.
    pub fn load_machines(
        directory: &Path,
        mode: Mode,
    ) -> Vec<Result<(PathBuf, MachineSpec), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(TuringMachineError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.retain(|path| {
            !path.is_dir()
                && path
                    .extension()
                    .is_some_and(|ext| ext == DESCRIPTION_EXTENSION)
        });
        paths.sort();

        results.extend(paths.into_iter().map(|path| {
            Self::load_machine(&path, mode)
                .map(|spec| (path.clone(), spec))
                .map_err(|e| {
                    TuringMachineError::FileError(format!(
                        "Failed to load machine from {}: {}",
                        path.display(),
                        e
                    ))
                })
        }));

        results
    }
}
