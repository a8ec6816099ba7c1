use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use mrlens_series::KeyValueStore;
use mrlens_series::error::StoreError;
use serde_json::Map;
use serde_json::Value;
use tracing::warn;

use crate::cli::PathExt;
use crate::error::CliError;

const DEFAULT_STORE_FILE: &str = ".mrlens-storage.json";

/// A [`KeyValueStore`] kept as a JSON object in a file, one string value per
/// key, the way a browser keeps its local storage.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> FileStore {
        Self { path: path.into() }
    }

    /// Opens the store at `path`, or the default store of the current
    /// working directory.
    pub(crate) fn open(path: Option<PathBuf>) -> Result<FileStore, CliError> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(None::<PathBuf>.or_current_dir()?.join(DEFAULT_STORE_FILE))),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(error) => Err(error.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.read()?;

        Ok(entries.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = match self.read() {
            Ok(entries) => entries,
            Err(StoreError::Json(error)) => {
                warn!(%error, path = %self.path.display(), "the store is malformed; starting it over");
                Map::new()
            }
            Err(error) => return Err(error),
        };
        entries.insert(key.to_owned(), Value::String(value.to_owned()));

        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
