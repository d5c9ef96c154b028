//! Package-part lookup with incremental caches layered over a delegate.

use crate::cache::{IncrementalCache, IncrementalCompilationComponents};
use crate::mapping::ModuleMapping;
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tessel_core::FqName;

/// Answers which compiled parts (binary class names) make up a package.
pub trait PackagePartProvider: Send + Sync {
    fn find_package_parts(&self, package: &str) -> Vec<String>;
}

/// Knows no packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPackagePartProvider;

impl PackagePartProvider for EmptyPackagePartProvider {
    fn find_package_parts(&self, _package: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Fixed package → parts table.
#[derive(Debug, Clone, Default)]
pub struct StaticPackagePartProvider {
    parts: HashMap<String, Vec<String>>,
}

impl StaticPackagePartProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: impl Into<String>, parts: Vec<String>) {
        self.parts.entry(package.into()).or_default().extend(parts);
    }
}

impl FromIterator<(String, Vec<String>)> for StaticPackagePartProvider {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut provider = Self::new();
        for (package, parts) in iter {
            provider.insert(package, parts);
        }
        provider
    }
}

impl PackagePartProvider for StaticPackagePartProvider {
    fn find_package_parts(&self, package: &str) -> Vec<String> {
        self.parts.get(package).cloned().unwrap_or_default()
    }
}

/// A source file being compiled in the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: FqName,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, package: FqName) -> Self {
        Self { path: path.into(), package }
    }
}

struct Index {
    mappings: Vec<ModuleMapping>,
    excluded: HashSet<String>,
}

/// Serves parts recorded by the previous build for packages nothing in this
/// build touches, and falls back to the delegate for the rest.
///
/// A package is excluded (delegate only) when any cache lists one of its
/// parts as obsolete or when a session source unit declares it.
pub struct IncrementalPackagePartProvider {
    parent: Arc<dyn PackagePartProvider>,
    sources: Vec<SourceUnit>,
    caches: Vec<Arc<dyn IncrementalCache>>,
    index: OnceCell<Index>,
}

impl IncrementalPackagePartProvider {
    pub fn new(
        parent: Arc<dyn PackagePartProvider>,
        sources: Vec<SourceUnit>,
        caches: Vec<Arc<dyn IncrementalCache>>,
    ) -> Self {
        Self { parent, sources, caches, index: OnceCell::new() }
    }

    pub fn is_excluded(&self, package: &str) -> bool {
        self.index().excluded.contains(package)
    }

    fn index(&self) -> &Index {
        self.index.get_or_init(|| self.build_index())
    }

    fn build_index(&self) -> Index {
        let mappings: Vec<ModuleMapping> =
            self.caches.iter().enumerate().map(|(i, cache)| decode_mapping(i, cache)).collect();

        let obsolete = self
            .caches
            .iter()
            .flat_map(|cache| cache.obsolete_package_parts())
            .map(|part| part.package_fq_name());
        let sources = self.sources.iter().map(|unit| unit.package.clone());
        let excluded: HashSet<String> =
            obsolete.chain(sources).map(|fq| fq.as_str().to_string()).collect();

        tracing::debug!(
            caches = mappings.len(),
            excluded = excluded.len(),
            fingerprints = ?mappings.iter().map(ModuleMapping::fingerprint).collect::<Vec<_>>(),
            "incremental package index built"
        );
        Index { mappings, excluded }
    }
}

/// A corrupt mapping contributes nothing; the delegate still answers.
fn decode_mapping(position: usize, cache: &Arc<dyn IncrementalCache>) -> ModuleMapping {
    match ModuleMapping::parse(&cache.module_mapping_data()) {
        Ok(mapping) => mapping,
        Err(e) => {
            tracing::warn!(cache = position, error = %e, "ignoring corrupt module mapping");
            ModuleMapping::empty()
        }
    }
}

impl PackagePartProvider for IncrementalPackagePartProvider {
    fn find_package_parts(&self, package: &str) -> Vec<String> {
        let index = self.index();
        if index.excluded.contains(package) {
            tracing::trace!(package, "package excluded, asking delegate");
            return self.parent.find_package_parts(package);
        }

        let cached = index
            .mappings
            .iter()
            .filter_map(|mapping| mapping.find_package_parts(package))
            .flat_map(|entry| entry.parts.iter().cloned());
        let mut seen = HashSet::new();
        let parts: Vec<String> = cached
            .chain(self.parent.find_package_parts(package))
            .filter(|part| seen.insert(part.clone()))
            .collect();
        tracing::trace!(package, parts = parts.len(), "package parts resolved");
        parts
    }
}

/// Layer the caches of `module_ids` over `parent`. Without module ids or
/// without incremental components there is nothing to layer and `parent`
/// itself is returned.
pub fn incremental_package_part_provider(
    parent: Arc<dyn PackagePartProvider>,
    sources: Vec<SourceUnit>,
    module_ids: Option<&[String]>,
    components: Option<&dyn IncrementalCompilationComponents>,
) -> Arc<dyn PackagePartProvider> {
    let (Some(module_ids), Some(components)) = (module_ids, components) else {
        return parent;
    };
    let caches = module_ids.iter().map(|id| components.incremental_cache(id)).collect();
    Arc::new(IncrementalPackagePartProvider::new(parent, sources, caches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_merges_inserts() {
        let mut provider = StaticPackagePartProvider::new();
        provider.insert("com.a", vec!["com/a/AKt".into()]);
        provider.insert("com.a", vec!["com/a/BKt".into()]);
        assert_eq!(provider.find_package_parts("com.a"), vec!["com/a/AKt", "com/a/BKt"]);
        assert!(provider.find_package_parts("com.b").is_empty());
        assert!(EmptyPackagePartProvider.find_package_parts("com.a").is_empty());
    }

    #[test]
    fn test_session_sources_are_excluded() {
        let parent: Arc<dyn PackagePartProvider> = Arc::new(EmptyPackagePartProvider);
        let provider = IncrementalPackagePartProvider::new(
            parent,
            vec![SourceUnit::new("a.kt", FqName::new("com.a"))],
            Vec::new(),
        );
        assert!(provider.is_excluded("com.a"));
        assert!(!provider.is_excluded("com.b"));
    }
}
