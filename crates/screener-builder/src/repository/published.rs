use std::sync::Arc;

use tracing::debug;

use super::{from_document, from_documents, to_document};
use crate::domain::{Benefit, Screener};
use crate::store::layout;
use crate::store::{BlobStore, DocumentStore, StoreError};
use crate::versioning::RecordState;

const STATE: RecordState = RecordState::Published;

/// Published screener snapshots and their mirrored benefit sets.
#[derive(Clone)]
pub struct PublishedScreenerRepository {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl PublishedScreenerRepository {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { documents, blobs }
    }

    fn collection() -> &'static str {
        layout::screener_collection(STATE)
    }

    /// Published screener including its form schema.
    pub fn get(&self, id: &str) -> Result<Option<Screener>, StoreError> {
        let Some(mut screener) = self.get_metadata_only(id)? else {
            return Ok(None);
        };
        screener.form_schema = self
            .blobs
            .read_json(&layout::form_schema_path(STATE, id))?;
        Ok(Some(screener))
    }

    pub fn get_metadata_only(&self, id: &str) -> Result<Option<Screener>, StoreError> {
        self.documents
            .get_by_id(Self::collection(), id)?
            .map(from_document)
            .transpose()
    }

    /// Insert a new published record and return its store-assigned id.
    pub fn create(&self, snapshot: &Screener) -> Result<String, StoreError> {
        let mut data = to_document(snapshot)?;
        data.remove("id");
        data.remove("formSchema");
        self.documents.persist(Self::collection(), data)
    }

    pub fn update(&self, snapshot: &Screener) -> Result<(), StoreError> {
        let mut data = to_document(snapshot)?;
        data.remove("formSchema");
        self.documents.update(Self::collection(), &snapshot.id, data)
    }

    pub fn list_benefits(&self, published_id: &str) -> Result<Vec<Benefit>, StoreError> {
        from_documents(
            self.documents
                .get_all(&layout::benefit_collection(STATE, published_id))?,
        )
    }

    pub fn get_benefit(
        &self,
        published_id: &str,
        benefit_id: &str,
    ) -> Result<Option<Benefit>, StoreError> {
        self.documents
            .get_by_id(&layout::benefit_collection(STATE, published_id), benefit_id)?
            .map(from_document)
            .transpose()
    }

    /// Drop every published benefit, then insert a copy of each given benefit
    /// under its own id.
    pub fn replace_benefits(
        &self,
        published_id: &str,
        benefits: &[Benefit],
    ) -> Result<(), StoreError> {
        let collection = layout::benefit_collection(STATE, published_id);
        self.documents.delete_all(&collection)?;
        for benefit in benefits {
            self.documents
                .persist_with_id(&collection, &benefit.id, to_document(benefit)?)?;
        }
        debug!(
            published_screener_id = published_id,
            benefit_count = benefits.len(),
            "replaced published benefits"
        );
        Ok(())
    }

    pub fn write_form_schema(&self, published_id: &str, content: &[u8]) -> Result<(), StoreError> {
        self.blobs.write_bytes(
            &layout::form_schema_path(STATE, published_id),
            content,
            mime::APPLICATION_JSON.as_ref(),
        )
    }
}
