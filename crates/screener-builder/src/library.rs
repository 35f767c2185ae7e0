//! Read-only catalog of public library checks.
//!
//! Loaded once at startup and shared by `Arc`; it is never mutated afterwards.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::EligibilityCheck;
use crate::store::layout::{LIBRARY_SCHEMA_PATH_FIELD, SYSTEM, SYSTEM_CONFIG_ID};
use crate::store::{BlobStore, DocumentStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum LibraryCatalogError {
    #[error("unable to read library catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("library catalog is not a list of checks: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    checks: Vec<EligibilityCheck>,
    index: HashMap<String, usize>,
}

impl LibraryCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every entry is marked public; later duplicates of an id are dropped.
    pub fn from_checks(checks: impl IntoIterator<Item = EligibilityCheck>) -> Self {
        let mut catalog = Self::default();
        for mut check in checks {
            if catalog.index.contains_key(&check.id) {
                warn!(check_id = %check.id, "duplicate library check ignored");
                continue;
            }
            check.is_public = true;
            catalog.index.insert(check.id.clone(), catalog.checks.len());
            catalog.checks.push(check);
        }
        catalog
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LibraryCatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LibraryCatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), checks = catalog.len(), "loaded library catalog");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LibraryCatalogError> {
        let checks: Vec<EligibilityCheck> = serde_json::from_reader(reader)?;
        Ok(Self::from_checks(checks))
    }

    /// Load from the blob referenced by the system config document. A missing
    /// config entry or blob yields an empty catalog.
    pub fn load(
        documents: &dyn DocumentStore,
        blobs: &dyn BlobStore,
    ) -> Result<Self, LibraryCatalogError> {
        let path = documents
            .get_by_id(SYSTEM, SYSTEM_CONFIG_ID)?
            .and_then(|config| config.get(LIBRARY_SCHEMA_PATH_FIELD).cloned());
        let Some(Value::String(path)) = path else {
            warn!("system config has no library catalog path; library is empty");
            return Ok(Self::empty());
        };

        let Some(bytes) = blobs.read_bytes(&path)? else {
            warn!(path = %path, "library catalog blob missing; library is empty");
            return Ok(Self::empty());
        };

        let catalog = Self::from_reader(bytes.as_slice())?;
        info!(path = %path, checks = catalog.len(), "loaded library catalog");
        Ok(catalog)
    }

    pub fn all(&self) -> &[EligibilityCheck] {
        &self.checks
    }

    pub fn by_id(&self, id: &str) -> Option<&EligibilityCheck> {
        self.index.get(id).map(|&index| &self.checks[index])
    }

    pub fn by_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a EligibilityCheck> {
        self.checks.iter().filter(move |check| check.module == module)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
