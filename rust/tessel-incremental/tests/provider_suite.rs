//! Package-part lookup over incremental caches.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tessel_core::{FqName, InternalName};
use tessel_incremental::{
    incremental_package_part_provider, InMemoryComponents, InMemoryIncrementalCache,
    IncrementalCache, IncrementalCompilationComponents, PackagePartProvider, PackageParts,
    SourceUnit, StaticPackagePartProvider,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn entry(package: &str, parts: &[&str]) -> PackageParts {
    PackageParts { package: FqName::new(package), parts: strings(parts) }
}

fn delegate() -> Arc<dyn PackagePartProvider> {
    Arc::new(StaticPackagePartProvider::from_iter([
        ("com.foo".to_string(), strings(&["com/foo/FooKt"])),
        ("com.bar".to_string(), strings(&["com/bar/LibKt"])),
        ("com.baz".to_string(), strings(&["com/baz/LibKt"])),
    ]))
}

fn components() -> InMemoryComponents {
    let app = InMemoryIncrementalCache::with_packages(
        &[
            entry("com.baz", &["com/baz/BazKt", "com/baz/LibKt"]),
            entry("com.foo", &["com/foo/OldKt"]),
            entry("com.bar", &["com/bar/BarKt"]),
        ],
        vec![InternalName::new("com/bar/BarKt")],
    )
    .unwrap();
    let lib = InMemoryIncrementalCache::with_packages(
        &[entry("com.baz", &["com/baz/ExtraKt", "com/baz/BazKt"])],
        Vec::new(),
    )
    .unwrap();
    let mut components = InMemoryComponents::new();
    components.insert("app", Arc::new(app));
    components.insert("lib", Arc::new(lib));
    components
}

/// Layer `components` for `module_ids` over the delegate, without session
/// sources.
fn layered(
    module_ids: &[&str],
    components: &dyn IncrementalCompilationComponents,
) -> Arc<dyn PackagePartProvider> {
    let ids = strings(module_ids);
    incremental_package_part_provider(delegate(), Vec::new(), Some(&ids[..]), Some(components))
}

fn provider(module_ids: &[&str]) -> Arc<dyn PackagePartProvider> {
    let source: &dyn IncrementalCompilationComponents = &components();
    let ids = strings(module_ids);
    incremental_package_part_provider(
        delegate(),
        vec![SourceUnit::new("src/foo.kt", FqName::new("com.foo"))],
        Some(&ids[..]),
        Some(source),
    )
}

#[test]
fn session_packages_use_only_the_delegate() {
    let provider = provider(&["app"]);
    assert_eq!(provider.find_package_parts("com.foo"), vec!["com/foo/FooKt"]);
}

#[test]
fn obsolete_packages_use_only_the_delegate() {
    let provider = provider(&["app"]);
    assert_eq!(provider.find_package_parts("com.bar"), vec!["com/bar/LibKt"]);
}

#[test]
fn cached_parts_come_first_and_are_deduplicated() {
    let provider = provider(&["app"]);
    assert_eq!(provider.find_package_parts("com.baz"), vec!["com/baz/BazKt", "com/baz/LibKt"]);
}

#[test]
fn caches_contribute_in_module_order() {
    let provider = provider(&["lib", "app"]);
    assert_eq!(
        provider.find_package_parts("com.baz"),
        vec!["com/baz/ExtraKt", "com/baz/BazKt", "com/baz/LibKt"]
    );
    let provider = self::provider(&["app", "lib"]);
    assert_eq!(
        provider.find_package_parts("com.baz"),
        vec!["com/baz/BazKt", "com/baz/LibKt", "com/baz/ExtraKt"]
    );
}

#[test]
fn unknown_packages_and_modules_fall_through() {
    let provider = provider(&["app", "never-built"]);
    assert!(provider.find_package_parts("org.none").is_empty());
    assert_eq!(provider.find_package_parts("com.baz").len(), 2);
}

#[test]
fn missing_inputs_return_the_parent_itself() {
    let parent = delegate();
    let source: &dyn IncrementalCompilationComponents = &components();
    let ids = strings(&["app"]);

    let same = incremental_package_part_provider(parent.clone(), Vec::new(), None, Some(source));
    assert!(Arc::ptr_eq(&same, &parent));

    let same = incremental_package_part_provider(parent.clone(), Vec::new(), Some(&ids[..]), None);
    assert!(Arc::ptr_eq(&same, &parent));

    let both =
        incremental_package_part_provider(parent.clone(), Vec::new(), Some(&ids[..]), Some(source));
    assert!(!Arc::ptr_eq(&both, &parent));
}

#[test]
fn corrupt_mapping_contributes_nothing() {
    let mut components = InMemoryComponents::new();
    components.insert(
        "app",
        Arc::new(InMemoryIncrementalCache::new(b"{not json".to_vec(), Vec::new())),
    );
    let provider = layered(&["app"], &components);
    assert_eq!(provider.find_package_parts("com.baz"), vec!["com/baz/LibKt"]);
}

/// Counts how often its mapping is read.
struct CountingCache {
    reads: AtomicUsize,
    data: Vec<u8>,
}

impl IncrementalCache for CountingCache {
    fn module_mapping_data(&self) -> Vec<u8> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.data.clone()
    }

    fn obsolete_package_parts(&self) -> Vec<InternalName> {
        Vec::new()
    }
}

struct Single(Arc<CountingCache>);

impl IncrementalCompilationComponents for Single {
    fn incremental_cache(&self, _module_id: &str) -> Arc<dyn IncrementalCache> {
        self.0.clone()
    }
}

#[test]
fn index_is_built_once_across_threads() {
    let data = tessel_incremental::ModuleMapping::encode(&[entry("com.baz", &["com/baz/BazKt"])])
        .unwrap();
    let cache = Arc::new(CountingCache { reads: AtomicUsize::new(0), data });
    let components = Single(cache.clone());
    let provider = layered(&["app"], &components);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || provider.find_package_parts("com.baz"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["com/baz/BazKt", "com/baz/LibKt"]);
    }
    assert_eq!(cache.reads.load(Ordering::SeqCst), 1);
}
