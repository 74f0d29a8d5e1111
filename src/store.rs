use std::{
    fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

pub const SETTINGS_FILE: &str = "window-settings.json";
pub const TASKS_FILE: &str = "tasks.json";
pub const NOTES_FILE: &str = "notes.json";

/// A single durable JSON document. Services own one of these per file and
/// never touch the filesystem directly.
pub trait Document<T>: Send + Sync {
    /// `Ok(None)` when the document has never been written.
    fn read(&self) -> Result<Option<T>, StoreError>;
    /// Replace the whole document.
    fn write(&self, value: &T) -> Result<(), StoreError>;
}

pub struct JsonFile<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }
}

impl<T> Document<T> for JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    fn read(&self) -> Result<Option<T>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::json(&self.path, e))
    }

    // write to a sibling tmp file, then rename over the target
    fn write(&self, value: &T) -> Result<(), StoreError> {
        let text =
            serde_json::to_string_pretty(value).map_err(|e| StoreError::json(&self.path, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, text).map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "document written");
        Ok(())
    }
}

/// Locations of the three durable documents under one data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn tasks(&self) -> PathBuf {
        self.root.join(TASKS_FILE)
    }

    pub fn notes(&self) -> PathBuf {
        self.root.join(NOTES_FILE)
    }
}
