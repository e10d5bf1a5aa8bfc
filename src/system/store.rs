// src/system/store.rs

use crate::{constants::TEMPLATE_EXTENSION, models::ScriptStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur while loading or saving the script store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("Could not read the script store at '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The store file is not valid JSON, or does not have the expected shape.
    #[error("The script store at '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The store could not be written back to disk.
    #[error("Could not write the script store to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize the script store: {0}")]
    Serialize(#[from] serde_json::Error),
}

type StoreResult<T> = Result<T, StoreError>;

/// Persistence seam for the scope-keyed script collection.
pub trait Store {
    fn read(&self) -> StoreResult<ScriptStore>;
    fn write(&self, store: &ScriptStore) -> StoreResult<()>;
}

/// Loads command templates referenced by script definitions.
pub trait FileReader {
    fn read_file(&self, path: &Path) -> std::io::Result<String>;
}

/// The flat-file JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    /// A missing (or empty) file is an empty store. Anything unparsable is an error.
    fn read(&self) -> StoreResult<ScriptStore> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "No store at '{}'. Starting with an empty one.",
                    self.path.display()
                );
                return Ok(ScriptStore::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(ScriptStore::default());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes through a temporary file in the same directory, then renames it over
    /// the store, so a crash never leaves a half-written file behind.
    fn write(&self, store: &ScriptStore) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(store)?;
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let mut temp_file = NamedTempFile::new_in(&parent).map_err(write_err)?;
        temp_file.write_all(json.as_bytes()).map_err(write_err)?;
        temp_file.write_all(b"\n").map_err(write_err)?;
        temp_file.flush().map_err(write_err)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| write_err(e.error))?;

        log::debug!("Store saved to '{}'.", self.path.display());
        Ok(())
    }
}

/// Reads templates from disk, resolving relative paths against the scripts directory.
#[derive(Debug, Clone)]
pub struct FsFileReader {
    base_dir: PathBuf,
}

impl FsFileReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl FileReader for FsFileReader {
    fn read_file(&self, path: &Path) -> std::io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }
}

/// Writes a new template file into `scripts_dir` and returns its path relative to it.
/// File names are derived from the script name plus a random suffix, so two scripts
/// with the same name in different scopes never share a file.
pub fn write_template_file(
    scripts_dir: &Path,
    script_name: &str,
    content: &str,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(scripts_dir)?;
    let file_name = format!(
        "{}-{}.{}",
        sanitize_file_stem(script_name),
        Uuid::new_v4().simple(),
        TEMPLATE_EXTENSION
    );
    let relative = PathBuf::from(file_name);
    fs::write(scripts_dir.join(&relative), content)?;
    Ok(relative)
}

/// Deletes a template file. A file that is already gone is not an error.
pub fn remove_template_file(reader: &FsFileReader, path: &Path) -> std::io::Result<()> {
    match fs::remove_file(reader.resolve(path)) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Template file '{}' was already missing.", path.display());
            Ok(())
        }
        other => other,
    }
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(40)
        .collect();
    if stem.is_empty() {
        "script".to_string()
    } else {
        stem
    }
}
