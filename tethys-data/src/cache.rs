//! Versioned on-disk dataset cache
//!
//! Datasets are addressed by (name, version) and stored under
//! `<cache>/<name>/<version>/<file>` with a `provenance.json` sidecar, so a
//! populated cache directory is self-describing and a run can be repeated
//! offline against exactly the bytes a previous run fetched.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tethys_core::{Provenance, TethysError};
use tracing::{debug, info};

const PROVENANCE_FILE: &str = "provenance.json";

/// Addressing key for a cached dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub name: String,
    pub version: String,
}

impl DatasetKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Local dataset cache rooted at a directory
#[derive(Debug, Clone)]
pub struct DatasetCache {
    root: PathBuf,
}

impl DatasetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache directory for a dataset key
    pub fn dataset_dir(&self, key: &DatasetKey) -> PathBuf {
        self.root.join(&key.name).join(&key.version)
    }

    /// Path of a cached file for a dataset key
    pub fn file_path(&self, key: &DatasetKey, filename: &str) -> PathBuf {
        self.dataset_dir(key).join(filename)
    }

    /// Whether the dataset is fully cached (payload and sidecar present)
    pub fn contains(&self, key: &DatasetKey, filename: &str) -> bool {
        self.file_path(key, filename).exists()
            && self.dataset_dir(key).join(PROVENANCE_FILE).exists()
    }

    /// Read the provenance sidecar of a cached dataset
    pub fn provenance(&self, key: &DatasetKey) -> Result<Provenance> {
        let path = self.dataset_dir(key).join(PROVENANCE_FILE);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read provenance sidecar: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Malformed provenance sidecar: {}", path.display()))
    }

    /// Retrieve a dataset, fetching on a cache miss.
    ///
    /// On a hit the fetch closure is never invoked. On a miss the closure
    /// runs exactly once and its bytes land in the cache with the
    /// provenance sidecar. Single writer assumed.
    pub fn get_or_fetch<F>(
        &self,
        key: &DatasetKey,
        filename: &str,
        fetch: F,
    ) -> Result<(PathBuf, Provenance)>
    where
        F: FnOnce() -> Result<(Vec<u8>, Provenance)>,
    {
        let path = self.file_path(key, filename);
        if self.contains(key, filename) {
            let prov = self.provenance(key)?;
            debug!(
                dataset = %key.name,
                version = %key.version,
                "cache hit: {}",
                path.display()
            );
            return Ok((path, prov));
        }

        info!(dataset = %key.name, version = %key.version, "cache miss, fetching");
        let (bytes, prov) = fetch()?;
        self.store(key, filename, &bytes, &prov)?;
        Ok((path, prov))
    }

    /// Retrieve from the cache only; a miss is an error naming the dataset.
    pub fn get_offline(&self, key: &DatasetKey, filename: &str) -> Result<(PathBuf, Provenance)> {
        if !self.contains(key, filename) {
            return Err(TethysError::Dataset(format!(
                "dataset '{}' (version {}) is not in the local cache at {}",
                key.name,
                key.version,
                self.root.display()
            ))
            .into());
        }
        Ok((self.file_path(key, filename), self.provenance(key)?))
    }

    /// Write a dataset payload and its provenance sidecar
    pub fn store(
        &self,
        key: &DatasetKey,
        filename: &str,
        bytes: &[u8],
        provenance: &Provenance,
    ) -> Result<PathBuf> {
        let dir = self.dataset_dir(key);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

        let path = dir.join(filename);
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write cached dataset: {}", path.display()))?;

        let sidecar = dir.join(PROVENANCE_FILE);
        let json = serde_json::to_string_pretty(provenance)?;
        fs::write(&sidecar, json)
            .with_context(|| format!("Failed to write provenance sidecar: {}", sidecar.display()))?;

        info!(
            dataset = %key.name,
            version = %key.version,
            bytes = bytes.len(),
            "cached {}",
            path.display()
        );
        Ok(path)
    }

    /// Remove a cached dataset version (used by forced refetch)
    pub fn evict(&self, key: &DatasetKey) -> Result<()> {
        let dir = self.dataset_dir(key);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to evict cache entry: {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
