//! Module mappings: which compiled package parts a module holds per package.
//!
//! The blob stored by an incremental cache is a JSON document:
//!
//! ```json
//! {"packages": [{"package": "com.baz", "parts": ["com/baz/BazKt"]}]}
//! ```
//!
//! An empty blob is an empty mapping.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tessel_core::FqName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("module mapping is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Part names of one package, in mapping order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageParts {
    pub package: FqName,
    #[serde(default)]
    pub parts: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    packages: Vec<PackageParts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMapping {
    packages: Vec<PackageParts>,
    index: HashMap<String, usize>,
    fingerprint: String,
}

impl ModuleMapping {
    pub fn empty() -> Self {
        Self::from_packages(Vec::new(), &[])
    }

    /// Decode a mapping blob. Entries naming the same package twice are
    /// merged in order.
    pub fn parse(data: &[u8]) -> Result<Self, MappingError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::from_packages(Vec::new(), data));
        }
        let document: MappingDocument = serde_json::from_slice(data)?;
        Ok(Self::from_packages(document.packages, data))
    }

    /// Encode `packages` as a mapping blob.
    pub fn encode(packages: &[PackageParts]) -> Result<Vec<u8>, MappingError> {
        let document = MappingDocument { packages: packages.to_vec() };
        Ok(serde_json::to_vec(&document)?)
    }

    fn from_packages(entries: Vec<PackageParts>, data: &[u8]) -> Self {
        let mut packages: Vec<PackageParts> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for entry in entries {
            let existing = index.get(entry.package.as_str()).copied();
            match existing {
                Some(i) => {
                    let existing: &mut PackageParts = &mut packages[i];
                    existing.parts.extend(entry.parts);
                }
                None => {
                    index.insert(entry.package.as_str().to_string(), packages.len());
                    packages.push(entry);
                }
            }
        }
        let fingerprint = format!("sha256:{:x}", Sha256::digest(data));
        Self { packages, index, fingerprint }
    }

    pub fn find_package_parts(&self, package: &str) -> Option<&PackageParts> {
        self.index.get(package).map(|&i| &self.packages[i])
    }

    pub fn packages(&self) -> &[PackageParts] {
        &self.packages
    }

    /// `sha256:<hex>` of the blob this mapping was decoded from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(package: &str, parts: &[&str]) -> PackageParts {
        PackageParts {
            package: FqName::new(package),
            parts: parts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_blob_is_empty_mapping() {
        let mapping = ModuleMapping::parse(b"").unwrap();
        assert!(mapping.is_empty());
        assert!(mapping.find_package_parts("com.foo").is_none());
        assert_eq!(mapping.fingerprint(), ModuleMapping::empty().fingerprint());
    }

    #[test]
    fn test_parse_document() {
        let blob = br#"{"packages": [
            {"package": "com.baz", "parts": ["com/baz/BazKt", "com/baz/UtilKt"]}
        ]}"#;
        let mapping = ModuleMapping::parse(blob).unwrap();
        let found = mapping.find_package_parts("com.baz").unwrap();
        assert_eq!(found.parts, vec!["com/baz/BazKt", "com/baz/UtilKt"]);
        assert!(mapping.fingerprint().starts_with("sha256:"));
        assert_eq!(mapping.fingerprint().len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_duplicate_packages_merge_in_order() {
        let blob = ModuleMapping::encode(&[
            parts("com.a", &["com/a/AKt"]),
            parts("com.b", &["com/b/BKt"]),
            parts("com.a", &["com/a/A2Kt"]),
        ])
        .unwrap();
        let mapping = ModuleMapping::parse(&blob).unwrap();
        assert_eq!(mapping.packages().len(), 2);
        assert_eq!(
            mapping.find_package_parts("com.a").unwrap().parts,
            vec!["com/a/AKt", "com/a/A2Kt"]
        );
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let err = ModuleMapping::parse(b"\x00\x01 not json").unwrap_err();
        assert!(err.to_string().starts_with("module mapping is not valid JSON"));
    }
}
