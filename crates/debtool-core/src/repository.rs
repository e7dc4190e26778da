//! Repository identity and build version types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A source checkout the driver may build a Debian package from.
///
/// Immutable for the duration of a build command; enumeration is owned by
/// the source-code-manager collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Service name (e.g. "clouddriver").
    pub name: String,

    /// Local git checkout directory.
    pub git_dir: PathBuf,
}

impl Repository {
    /// Create a repository from a name and checkout directory.
    pub fn new(name: impl Into<String>, git_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            git_dir: git_dir.into(),
        }
    }

    /// Path to the repository's optional init-publish Gradle script.
    pub fn init_publish_script(&self) -> PathBuf {
        self.git_dir.join("gradle").join("init-publish.gradle")
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Opaque per-repository build version resolved from the BOM.
///
/// Used only to decide skip eligibility against the package repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVersion(pub String);

impl BuildVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BuildVersion {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Helper for tests and callers resolving checkouts under a common root.
pub fn repository_under_root(root: &Path, name: &str) -> Repository {
    Repository::new(name, root.join(name))
}
