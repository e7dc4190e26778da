//! Source-code-manager collaborator: resolves per-repository build versions.
//!
//! The production implementation reads a BOM (bill of materials) document,
//! the manifest of per-service versions assembled during a release. The BOM
//! is a JSON file:
//!
//! ```json
//! {
//!   "version": "1.9.2",
//!   "services": {
//!     "clouddriver": { "version": "3.4.1-20180619" },
//!     "deck": { "version": "2.1.0-20180619" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BuildToolError, Result};
use crate::repository::{BuildVersion, Repository};

/// Resolves the build version the release assembled for a repository.
#[async_trait]
pub trait SourceCodeManager: Send + Sync {
    async fn build_version(&self, repository: &Repository) -> Result<BuildVersion>;
}

/// A single service entry in the BOM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomService {
    pub version: String,
}

/// The BOM document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bom {
    /// Release version label.
    pub version: String,

    /// Per-service entries, keyed by service name.
    pub services: BTreeMap<String, BomService>,
}

impl Bom {
    /// Parse a BOM from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a BOM document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// BOM-backed source code manager.
///
/// Resolves versions by service name and enumerates checkouts as
/// `<root>/<service>` directories.
pub struct BomSourceCodeManager {
    bom: Bom,
    root: PathBuf,
}

impl BomSourceCodeManager {
    pub fn new(bom: Bom, root: impl Into<PathBuf>) -> Self {
        Self {
            bom,
            root: root.into(),
        }
    }

    /// Load the BOM from `path` and manage checkouts under `root`.
    pub fn load(path: &Path, root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Bom::load(path)?, root))
    }

    /// Release version label of the underlying BOM.
    pub fn bom_version(&self) -> &str {
        &self.bom.version
    }

    /// Enumerate the repositories named by the BOM, in service-name order.
    pub fn repositories(&self) -> Vec<Repository> {
        self.bom
            .services
            .keys()
            .map(|name| Repository::new(name.clone(), self.root.join(name)))
            .collect()
    }
}

#[async_trait]
impl SourceCodeManager for BomSourceCodeManager {
    async fn build_version(&self, repository: &Repository) -> Result<BuildVersion> {
        self.bom
            .services
            .get(&repository.name)
            .map(|service| BuildVersion(service.version.clone()))
            .ok_or_else(|| {
                BuildToolError::Scm(format!(
                    "repository {} not present in BOM {}",
                    repository.name, self.bom.version
                ))
            })
    }
}
