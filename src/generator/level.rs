use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MapError, Result};
use crate::placement::Placement;

/// A generated level saved under a unique name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level<Id> {
    pub name: String,
    /// Size of the source map in cells.
    pub width: u32,
    pub height: u32,
    /// Placements in spawn order.
    pub placements: Vec<Placement<Id>>,
}

impl<Id> Level<Id> {
    /// Fails with `InvalidInput` for an empty name or one containing a path
    /// separator.
    pub fn new(name: impl Into<String>, width: u32, height: u32, placements: Vec<Placement<Id>>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self { name, width, height, placements })
    }

    /// File a level called `name` is stored in under `dir`.
    pub fn file_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }
}

impl<Id: Serialize> Level<Id> {
    /// Write `<dir>/<name>.json`. Never overwrites: an existing file fails
    /// with [`MapError::LevelExists`] and is left untouched.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        check_name(&self.name)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)?;

        let path = Self::file_path(dir, &self.name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(MapError::LevelExists(path)),
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(json.as_bytes()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        info!(level = %self.name, placements = self.placements.len(), path = %path.display(), "level saved");
        Ok(path)
    }
}

impl Level<()> {
    /// Remove `<dir>/<name>.json`. A missing file is an `Io` error with
    /// `NotFound`.
    ///
    /// Independent of the placement type, so callers write `Level::delete(dir, name)`.
    pub fn delete(dir: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        let path = Self::file_path(dir.as_ref(), name);
        fs::remove_file(&path)?;
        info!(level = %name, path = %path.display(), "level deleted");
        Ok(path)
    }
}

impl<Id: DeserializeOwned> Level<Id> {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let level: Self = serde_json::from_str(&text)?;
        check_name(&level.name)?;
        Ok(level)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MapError::invalid("level name must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(MapError::invalid(format!("level name '{name}' must not contain path separators")));
    }
    Ok(())
}
