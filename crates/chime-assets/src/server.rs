use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::clip::AudioClip;
use crate::error::AssetError;
use crate::handle::{next_asset_id, AssetHandle, AssetId};
use crate::manifest::ClipManifest;

/// Extensions probed, in order, when a sound name has none.
const CLIP_EXTENSIONS: [&str; 4] = ["ogg", "wav", "flac", "mp3"];

/// Central clip registry. Loads clips by name, owns the decoded data, and
/// hands out typed handles.
pub struct AssetServer {
    base_path: PathBuf,
    manifest: ClipManifest,
    clips: HashMap<AssetId, AudioClip>,
    name_to_clip: HashMap<String, AssetHandle<AudioClip>>,
    load_requests: u64,
}

impl AssetServer {
    /// Create a new AssetServer rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("AssetServer created with base path: {}", base_path.display());
        Self {
            base_path,
            manifest: ClipManifest::default(),
            clips: HashMap::new(),
            name_to_clip: HashMap::new(),
            load_requests: 0,
        }
    }

    /// Use a manifest to map sound names to files.
    pub fn with_manifest(mut self, manifest: ClipManifest) -> Self {
        info!("Using clip manifest with {} entries", manifest.len());
        self.manifest = manifest;
        self
    }

    /// Resolve a relative asset path against the base path.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Candidate files for a sound name: the manifest entry if there is one,
    /// else the name itself when it has an extension, else the name with each
    /// known audio extension.
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        if let Some(path) = self.manifest.path_for(name) {
            return vec![self.resolve(path)];
        }
        let path = Path::new(name);
        if path.extension().is_some() {
            return vec![self.resolve(path)];
        }
        CLIP_EXTENSIONS
            .iter()
            .map(|ext| self.resolve(&path.with_extension(ext)))
            .collect()
    }

    /// Load the clip registered under `name`.
    /// Subsequent loads of the same name return the same handle.
    pub fn load_clip(&mut self, name: &str) -> Result<AssetHandle<AudioClip>, AssetError> {
        self.load_requests += 1;

        if let Some(&handle) = self.name_to_clip.get(name) {
            return Ok(handle);
        }

        let path = self
            .candidates(name)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;

        let clip = AudioClip::from_file(name, &path)?;
        debug!(
            "Loaded clip '{}' from {} ({:.2}s)",
            name,
            path.display(),
            clip.duration().as_secs_f32()
        );
        Ok(self.insert_clip(name, clip))
    }

    /// Register an already decoded clip under a name, replacing any previous one.
    pub fn insert_clip(&mut self, name: impl Into<String>, clip: AudioClip) -> AssetHandle<AudioClip> {
        let handle = AssetHandle::new(next_asset_id());
        self.clips.insert(handle.id(), clip);
        self.name_to_clip.insert(name.into(), handle);
        handle
    }

    /// Get a reference to a loaded clip by its handle.
    pub fn get_clip(&self, handle: AssetHandle<AudioClip>) -> Option<&AudioClip> {
        self.clips.get(&handle.id())
    }

    pub fn is_clip_loaded(&self, handle: AssetHandle<AudioClip>) -> bool {
        self.clips.contains_key(&handle.id())
    }

    /// How many times [`load_clip`](Self::load_clip) has been called.
    pub fn load_requests(&self) -> u64 {
        self.load_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::silent_wav;
    use std::fs;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chime-assets-{}-{}", std::process::id(), test));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_clip_returns_not_found() {
        let mut server = AssetServer::new("/nonexistent");
        match server.load_clip("does_not_exist") {
            Err(AssetError::NotFound(name)) => assert_eq!(name, "does_not_exist"),
            other => panic!("expected NotFound, got: {:?}", other),
        }
        assert_eq!(server.load_requests(), 1);
    }

    #[test]
    fn probes_extensions_and_dedupes() {
        let dir = scratch_dir("probe");
        fs::write(dir.join("click.wav"), silent_wav(8000, 800)).unwrap();

        let mut server = AssetServer::new(&dir);
        let first = server.load_clip("click").unwrap();
        let second = server.load_clip("click").unwrap();
        assert_eq!(first, second);
        assert_eq!(server.load_requests(), 2);

        let clip = server.get_clip(first).unwrap();
        assert!((clip.duration().as_secs_f64() - 0.1).abs() < 1e-3);
    }

    #[test]
    fn manifest_entry_wins() {
        let dir = scratch_dir("manifest");
        fs::create_dir_all(dir.join("sfx")).unwrap();
        fs::write(dir.join("sfx").join("boing_02.wav"), silent_wav(8000, 400)).unwrap();

        let mut manifest = ClipManifest::default();
        manifest.insert("boing", "sfx/boing_02.wav");
        let mut server = AssetServer::new(&dir).with_manifest(manifest);
        let handle = server.load_clip("boing").unwrap();
        assert!(server.is_clip_loaded(handle));
        assert_eq!(server.get_clip(handle).unwrap().name(), "boing");
    }

    #[test]
    fn inserted_clip_resolves_by_name() {
        let mut server = AssetServer::new("/nonexistent");
        let clip = AudioClip::from_bytes("tone", silent_wav(8000, 80)).unwrap();
        let inserted = server.insert_clip("tone", clip);
        assert_eq!(server.load_clip("tone").unwrap(), inserted);
    }

    #[test]
    fn resolve_relative_and_absolute_paths() {
        let server = AssetServer::new("/home/user/assets");
        assert_eq!(
            server.resolve(Path::new("sfx/hit.ogg")),
            PathBuf::from("/home/user/assets/sfx/hit.ogg")
        );
        assert_eq!(
            server.resolve(Path::new("/absolute/hit.ogg")),
            PathBuf::from("/absolute/hit.ogg")
        );
    }

    #[test]
    fn candidates_without_extension_probe_all_formats() {
        let server = AssetServer::new("/a");
        let candidates = server.candidates("ui/click");
        assert_eq!(candidates.len(), CLIP_EXTENSIONS.len());
        assert_eq!(candidates[0], PathBuf::from("/a/ui/click.ogg"));
    }
}
