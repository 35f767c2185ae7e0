//! Typed repositories over the document and blob stores.
//!
//! Screeners and custom checks both follow the working/published split; the
//! working half of that contract is captured by [`DualStateStore`].

mod check;
mod published;
mod screener;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::{Document, StoreError};

pub use check::CheckRepository;
pub use published::PublishedScreenerRepository;
pub use screener::ScreenerRepository;

/// Working-state operations shared by screeners and custom checks.
pub trait DualStateStore {
    type Entity;

    /// Full record including blob-backed payloads.
    fn get_working(&self, id: &str) -> Result<Option<Self::Entity>, StoreError>;
    /// Document fields only; suitable for ownership checks.
    fn get_working_metadata_only(&self, id: &str) -> Result<Option<Self::Entity>, StoreError>;
    fn save_new_working(&self, entity: &Self::Entity) -> Result<String, StoreError>;
    /// Full-record upsert. Blob-backed payloads are written to the blob store
    /// and stripped from the document.
    fn update_working(&self, entity: &Self::Entity) -> Result<(), StoreError>;
    fn list_working(&self, owner_id: &str) -> Result<Vec<Self::Entity>, StoreError>;
    fn delete_working(&self, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotADocument),
    }
}

pub(crate) fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub(crate) fn from_documents<T: DeserializeOwned>(
    documents: Vec<Document>,
) -> Result<Vec<T>, StoreError> {
    documents.into_iter().map(from_document).collect()
}
