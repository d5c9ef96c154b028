//! Incremental caches as seen by package-part lookup.

use crate::mapping::{MappingError, ModuleMapping, PackageParts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tessel_core::InternalName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache snapshot {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid cache snapshot {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Per-module state left behind by the previous build.
pub trait IncrementalCache: Send + Sync {
    /// Serialized module mapping; empty when the module has none.
    fn module_mapping_data(&self) -> Vec<u8>;

    /// Binary names of parts whose sources changed since they were compiled.
    fn obsolete_package_parts(&self) -> Vec<InternalName>;
}

/// Source of incremental caches, one per module id.
pub trait IncrementalCompilationComponents: Send + Sync {
    fn incremental_cache(&self, module_id: &str) -> Arc<dyn IncrementalCache>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryIncrementalCache {
    mapping_data: Vec<u8>,
    obsolete: Vec<InternalName>,
}

impl InMemoryIncrementalCache {
    pub fn new(mapping_data: Vec<u8>, obsolete: Vec<InternalName>) -> Self {
        Self { mapping_data, obsolete }
    }

    /// Cache holding an encoded mapping of `packages`.
    pub fn with_packages(
        packages: &[PackageParts],
        obsolete: Vec<InternalName>,
    ) -> Result<Self, CacheError> {
        Ok(Self::new(ModuleMapping::encode(packages)?, obsolete))
    }
}

impl IncrementalCache for InMemoryIncrementalCache {
    fn module_mapping_data(&self) -> Vec<u8> {
        self.mapping_data.clone()
    }

    fn obsolete_package_parts(&self) -> Vec<InternalName> {
        self.obsolete.clone()
    }
}

/// Caches keyed by module id. An unknown module gets an empty cache.
#[derive(Default, Clone)]
pub struct InMemoryComponents {
    caches: HashMap<String, Arc<dyn IncrementalCache>>,
}

impl InMemoryComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module_id: impl Into<String>, cache: Arc<dyn IncrementalCache>) {
        self.caches.insert(module_id.into(), cache);
    }

    /// Load `<dir>/<module-id>.json` for each id. Modules without a snapshot
    /// file are left out and read as empty caches.
    pub fn load_dir(dir: &Path, module_ids: &[String]) -> Result<Self, CacheError> {
        let mut components = Self::new();
        for module_id in module_ids {
            let path = dir.join(format!("{}.json", module_id));
            if !path.exists() {
                tracing::debug!(module = %module_id, path = %path.display(), "no cache snapshot");
                continue;
            }
            let snapshot = IncrementalCacheSnapshot::load(&path)?;
            components.insert(module_id.clone(), Arc::new(snapshot.into_cache()?));
        }
        Ok(components)
    }
}

impl IncrementalCompilationComponents for InMemoryComponents {
    fn incremental_cache(&self, module_id: &str) -> Arc<dyn IncrementalCache> {
        match self.caches.get(module_id) {
            Some(cache) => Arc::clone(cache),
            None => Arc::new(InMemoryIncrementalCache::default()),
        }
    }
}

/// On-disk form of one module's cache.
///
/// ```json
/// {
///   "packages": [{"package": "com.baz", "parts": ["com/baz/BazKt"]}],
///   "obsolete_package_parts": ["com/foo/FooKt"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementalCacheSnapshot {
    #[serde(default)]
    pub packages: Vec<PackageParts>,
    #[serde(default)]
    pub obsolete_package_parts: Vec<InternalName>,
}

impl IncrementalCacheSnapshot {
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CacheError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&content)
            .map_err(|source| CacheError::Json { path: path.to_path_buf(), source })
    }

    pub fn into_cache(self) -> Result<InMemoryIncrementalCache, CacheError> {
        InMemoryIncrementalCache::with_packages(&self.packages, self.obsolete_package_parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::FqName;

    #[test]
    fn test_unknown_module_reads_as_empty() {
        let components = InMemoryComponents::new();
        let cache = components.incremental_cache("missing");
        assert!(cache.module_mapping_data().is_empty());
        assert!(cache.obsolete_package_parts().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip_through_cache() {
        let json = r#"{
            "packages": [{"package": "com.baz", "parts": ["com/baz/BazKt"]}],
            "obsolete_package_parts": ["com/foo/FooKt"]
        }"#;
        let snapshot: IncrementalCacheSnapshot = serde_json::from_str(json).unwrap();
        let cache = snapshot.into_cache().unwrap();

        let mapping = ModuleMapping::parse(&cache.module_mapping_data()).unwrap();
        assert_eq!(mapping.find_package_parts("com.baz").unwrap().parts, vec!["com/baz/BazKt"]);
        assert_eq!(
            cache.obsolete_package_parts()[0].package_fq_name(),
            FqName::new("com.foo")
        );
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot: IncrementalCacheSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, IncrementalCacheSnapshot::default());
    }

    #[test]
    fn test_load_dir_skips_missing_and_rejects_corrupt() {
        let dir = std::env::temp_dir().join(format!("tessel-cache-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("app.json"), r#"{"obsolete_package_parts": ["a/AKt"]}"#).unwrap();
        std::fs::write(dir.join("broken.json"), "{").unwrap();

        let ids = vec!["app".to_string(), "absent".to_string()];
        let components = InMemoryComponents::load_dir(&dir, &ids).unwrap();
        assert_eq!(components.incremental_cache("app").obsolete_package_parts().len(), 1);

        let err = InMemoryComponents::load_dir(&dir, &["broken".to_string()]).err().unwrap();
        assert!(matches!(err, CacheError::Json { .. }), "{}", err);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
