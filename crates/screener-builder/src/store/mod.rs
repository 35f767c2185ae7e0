//! Capability interfaces for the two backing stores.
//!
//! Structured records live in a [`DocumentStore`]; large payloads (form
//! schemas, rule models) live in a [`BlobStore`]. Neither store offers
//! transactions spanning both.

pub mod layout;
pub mod memory;

use serde_json::{Map, Value};

pub use memory::{InMemoryBlobStore, InMemoryDocumentStore};

/// Field map of a stored document.
pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record does not serialize to a document")]
    NotADocument,
    #[error("blob at '{path}' is not valid UTF-8")]
    Encoding { path: String },
}

/// Document store with collection-scoped access. Reads return the document id
/// in the `id` field.
pub trait DocumentStore: Send + Sync {
    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
    fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;
    fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
    /// Insert with a store-generated id, returning it.
    fn persist(&self, collection: &str, data: Document) -> Result<String, StoreError>;
    fn persist_with_id(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<String, StoreError>;
    /// Merge top-level fields into the document, creating it when absent.
    fn update(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError>;
    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
    fn delete_all(&self, collection: &str) -> Result<(), StoreError>;
}

pub trait BlobStore: Send + Sync {
    fn write_bytes(&self, path: &str, content: &[u8], content_type: &str)
        -> Result<(), StoreError>;
    fn read_bytes(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn write_string(&self, path: &str, content: &str, content_type: &str) -> Result<(), StoreError> {
        self.write_bytes(path, content.as_bytes(), content_type)
    }

    fn write_json(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.write_bytes(path, &bytes, mime::APPLICATION_JSON.as_ref())
    }

    fn read_string(&self, path: &str) -> Result<Option<String>, StoreError> {
        match self.read_bytes(path)? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| StoreError::Encoding {
                path: path.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn read_json(&self, path: &str) -> Result<Option<Value>, StoreError> {
        match self.read_bytes(path)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
