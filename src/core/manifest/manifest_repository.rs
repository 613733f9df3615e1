use std::path::PathBuf;

use anyhow::Result;

use super::chart_manifest_entity::ChartManifest;
use super::manifest_fs_adapter::read_manifest;

/// Source of chart manifests. The production impl reads from disk;
/// tests substitute an in-memory one.
pub trait ManifestRepository {
    fn load(&self) -> Result<ChartManifest>;
}

pub struct ManifestRepositoryImpl {
    path: PathBuf,
}

impl ManifestRepositoryImpl {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ManifestRepository for ManifestRepositoryImpl {
    fn load(&self) -> Result<ChartManifest> {
        read_manifest(&self.path)
    }
}
