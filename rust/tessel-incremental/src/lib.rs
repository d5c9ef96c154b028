//! Incremental package-part lookup.
//!
//! A build that reuses output of a previous build asks a
//! [`PackagePartProvider`] which compiled parts make up a package. The
//! [`IncrementalPackagePartProvider`] answers from the module mappings kept
//! in incremental caches, except for packages the current build touches.

pub mod cache;
pub mod mapping;
pub mod provider;

pub use cache::{
    CacheError, InMemoryComponents, InMemoryIncrementalCache, IncrementalCache,
    IncrementalCacheSnapshot, IncrementalCompilationComponents,
};
pub use mapping::{MappingError, ModuleMapping, PackageParts};
pub use provider::{
    incremental_package_part_provider, EmptyPackagePartProvider, IncrementalPackagePartProvider,
    PackagePartProvider, SourceUnit, StaticPackagePartProvider,
};
