//=========================================================================
// Asset Source
//=========================================================================
//
// Read-only hierarchical file store handed to the native engine through
// `bind_asset_source`. Paths are relative and `/`-separated
// (e.g. "shaders/deferred.frag"), independent of the host filesystem.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::trace;
use thiserror::Error;

//=== AssetError ==========================================================

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    #[error("failed to read asset {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

//=== AssetSource =========================================================

/// A read-only store of files addressed by relative path.
pub trait AssetSource: Send + Sync {
    /// Reads the whole file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;

    fn exists(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}

//--- Path Validation -----------------------------------------------------

/// Normalizes an asset path and rejects anything escaping the store.
fn normalize(path: &str) -> Result<String, AssetError> {
    let trimmed = path.trim_start_matches("./");
    if trimmed.is_empty() {
        return Err(AssetError::InvalidPath(path.to_string()));
    }

    let mut parts = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(AssetError::InvalidPath(path.to_string())),
            },
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AssetError::InvalidPath(path.to_string()));
            }
        }
    }

    if parts.is_empty() {
        return Err(AssetError::InvalidPath(path.to_string()));
    }
    Ok(parts.join("/"))
}

//=== DirAssetSource ======================================================

/// Serves assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let relative = normalize(path)?;
        let full = self.root.join(&relative);
        trace!(target: "bridge", "Reading asset {}", full.display());

        std::fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(relative),
            _ => AssetError::Io {
                path: relative,
                source,
            },
        })
    }

    fn exists(&self, path: &str) -> bool {
        normalize(path)
            .map(|relative| self.root.join(relative).is_file())
            .unwrap_or(false)
    }
}

//=== MemoryAssetSource ===================================================

/// Serves assets from memory. Useful for embedded data and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, returning the store for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid relative asset path.
    pub fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        let key = match normalize(path) {
            Ok(key) => key,
            Err(e) => panic!("{}", e),
        };
        self.files.insert(key, data.into());
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let key = normalize(path)?;
        self.files
            .get(&key)
            .cloned()
            .ok_or(AssetError::NotFound(key))
    }

    fn exists(&self, path: &str) -> bool {
        normalize(path)
            .map(|key| self.files.contains_key(&key))
            .unwrap_or(false)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
