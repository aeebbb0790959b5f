use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AssetError;

/// Maps sound names to files, so gameplay code can refer to `"door_open"`
/// while the file layout stays free to change.
///
/// ```toml
/// [sounds]
/// door_open = "sfx/doors/open_03.ogg"
/// jump = "sfx/jump.wav"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipManifest {
    #[serde(default)]
    sounds: HashMap<String, PathBuf>,
}

impl ClipManifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(source: &str, origin: &Path) -> Result<Self, AssetError> {
        toml::from_str(source).map_err(|e| AssetError::Manifest(origin.to_path_buf(), e.to_string()))
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let source = fs::read_to_string(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&source, path)
    }

    /// The file registered for a sound name, relative to the asset root.
    pub fn path_for(&self, name: &str) -> Option<&Path> {
        self.sounds.get(name).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.sounds.insert(name.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
