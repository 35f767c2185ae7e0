use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use uuid::Uuid;

use super::{BlobStore, Document, DocumentStore, StoreError};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Process-local document store. Documents within a collection iterate in id order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<Mutex<Collections>>,
}

impl InMemoryDocumentStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("document store mutex poisoned".to_string()))
    }

    fn with_id(id: &str, document: &Document) -> Document {
        let mut data = document.clone();
        data.insert("id".to_string(), Value::String(id.to_string()));
        data
    }

    pub fn len(&self, collection: &str) -> usize {
        self.lock()
            .map(|guard| guard.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|document| Self::with_id(id, document)))
    }

    fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|(_, document)| document.get(field) == Some(value))
                    .map(|(id, document)| Self::with_id(id, document))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, document)| Self::with_id(id, document))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn persist(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.persist_with_id(collection, &id, data)
    }

    fn persist_with_id(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<String, StoreError> {
        let mut guard = self.lock()?;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(id.to_string())
    }

    fn update(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let document = guard
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        for (field, value) in data {
            document.insert(field, value);
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(documents) = guard.get_mut(collection) {
            documents.remove(id);
        }
        Ok(())
    }

    fn delete_all(&self, collection: &str) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.remove(collection);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StoredBlob {
    content: Vec<u8>,
    content_type: String,
}

/// Process-local blob store keyed by path.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, StoredBlob>>>,
}

impl InMemoryBlobStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredBlob>>, StoreError> {
        self.blobs
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store mutex poisoned".to_string()))
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.lock()
            .ok()
            .and_then(|guard| guard.get(path).map(|blob| blob.content_type.clone()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock()
            .map(|guard| guard.contains_key(path))
            .unwrap_or(false)
    }
}

impl BlobStore for InMemoryBlobStore {
    fn write_bytes(
        &self,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.insert(
            path.to_string(),
            StoredBlob {
                content: content.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn read_bytes(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(path).map(|blob| blob.content.clone()))
    }
}
