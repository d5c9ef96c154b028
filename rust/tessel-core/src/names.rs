//! Identifiers, package names, and binary (internal) class names.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier '{0}' uses reserved angle brackets")]
    Reserved(String),
}

/// A simple name. Special names are spelled `<tag>` and can never be
/// produced from source text, so synthesized variables never collide with
/// user identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name {
    text: String,
    special: bool,
}

impl Name {
    /// A source identifier.
    pub fn identifier(text: &str) -> Result<Self, NameError> {
        if text.is_empty() {
            return Err(NameError::Empty);
        }
        if text.starts_with('<') {
            return Err(NameError::Reserved(text.to_string()));
        }
        Ok(Self { text: text.to_string(), special: false })
    }

    /// A synthesized name such as `<elvis>` or `<unary>`.
    pub fn special(tag: &str) -> Self {
        Self { text: format!("<{}>", tag), special: true }
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Dotted fully-qualified package name (`com.foo`). The root package is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FqName(String);

impl FqName {
    pub fn new(dotted: &str) -> Self {
        Self(dotted.trim_matches('.').to_string())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FqName {
    fn from(s: &str) -> Self {
        FqName::new(s)
    }
}

/// Slash-separated binary class name (`com/foo/BarKt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternalName(String);

impl InternalName {
    pub fn new(internal: &str) -> Self {
        Self(internal.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything up to the last `/`, dotted. A class in the default package
    /// yields the root package.
    pub fn package_fq_name(&self) -> FqName {
        match self.0.rfind('/') {
            Some(idx) => FqName::new(&self.0[..idx].replace('/', ".")),
            None => FqName::root(),
        }
    }
}

impl fmt::Display for InternalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_names_never_collide() {
        let special = Name::special("elvis");
        assert_eq!(special.as_str(), "<elvis>");
        assert!(special.is_special());
        assert_eq!(Name::identifier("<elvis>"), Err(NameError::Reserved("<elvis>".into())));
        assert_ne!(Name::identifier("elvis").unwrap(), special);
    }

    #[test]
    fn test_internal_name_package() {
        let name = InternalName::new("com/bar/BarKt");
        assert_eq!(name.package_fq_name(), FqName::new("com.bar"));
        assert!(InternalName::new("TopLevelKt").package_fq_name().is_root());
    }

    #[test]
    fn test_fq_name_trims_dots() {
        assert_eq!(FqName::new(".com.foo.").as_str(), "com.foo");
        assert!(FqName::new("").is_root());
    }
}
