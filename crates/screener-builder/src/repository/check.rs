use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use super::{from_document, from_documents, to_document, DualStateStore};
use crate::domain::EligibilityCheck;
use crate::store::layout::{self, OWNER_ID_FIELD};
use crate::store::{BlobStore, Document, DocumentStore, StoreError};
use crate::versioning::RecordState;

const DMN_CONTENT_TYPE: &str = "application/xml";

/// Working and published custom checks. Rule payloads live in the blob store
/// keyed by the check id.
#[derive(Clone)]
pub struct CheckRepository {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl CheckRepository {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { documents, blobs }
    }

    fn check_document(check: &EligibilityCheck) -> Result<Document, StoreError> {
        let mut data = to_document(check)?;
        data.remove("dmnModel");
        Ok(data)
    }

    fn write_model(&self, check: &EligibilityCheck) -> Result<(), StoreError> {
        if let Some(model) = &check.dmn_model {
            self.blobs.write_string(
                &layout::check_model_path(&check.id),
                model,
                DMN_CONTENT_TYPE,
            )?;
        }
        Ok(())
    }

    fn read(&self, state: RecordState, id: &str) -> Result<Option<EligibilityCheck>, StoreError> {
        self.documents
            .get_by_id(layout::check_collection(state), id)?
            .map(from_document)
            .transpose()
    }

    fn with_model(&self, check: Option<EligibilityCheck>) -> Result<Option<EligibilityCheck>, StoreError> {
        let Some(mut check) = check else {
            return Ok(None);
        };
        check.dmn_model = self
            .blobs
            .read_string(&layout::check_model_path(&check.id))?;
        Ok(Some(check))
    }

    fn by_owner(&self, state: RecordState, owner_id: &str) -> Result<Vec<EligibilityCheck>, StoreError> {
        from_documents(self.documents.get_by_field(
            layout::check_collection(state),
            OWNER_ID_FIELD,
            &Value::String(owner_id.to_string()),
        )?)
    }

    /// Flag the working check as archived without touching its other fields.
    pub fn archive_working(&self, id: &str) -> Result<(), StoreError> {
        let mut data = Map::new();
        data.insert("isArchived".to_string(), Value::Bool(true));
        self.documents
            .update(layout::check_collection(RecordState::Working), id, data)
    }

    pub fn get_published(&self, id: &str) -> Result<Option<EligibilityCheck>, StoreError> {
        let check = self.read(RecordState::Published, id)?;
        self.with_model(check)
    }

    pub fn get_published_metadata_only(
        &self,
        id: &str,
    ) -> Result<Option<EligibilityCheck>, StoreError> {
        self.read(RecordState::Published, id)
    }

    /// Store a published snapshot under its own id, which already carries the
    /// version.
    pub fn save_published(&self, check: &EligibilityCheck) -> Result<String, StoreError> {
        self.write_model(check)?;
        let id = self.documents.persist_with_id(
            layout::check_collection(RecordState::Published),
            &check.id,
            Self::check_document(check)?,
        )?;
        info!(check_id = %id, owner_id = %check.owner_id, "stored published check");
        Ok(id)
    }

    pub fn list_published(&self, owner_id: &str) -> Result<Vec<EligibilityCheck>, StoreError> {
        self.by_owner(RecordState::Published, owner_id)
    }

    /// Every published version belonging to the same logical check as `working`.
    pub fn published_versions(
        &self,
        working: &EligibilityCheck,
    ) -> Result<Vec<EligibilityCheck>, StoreError> {
        let prefix = working.published_prefix();
        Ok(self
            .list_published(&working.owner_id)?
            .into_iter()
            .filter(|check| check.published_prefix() == prefix)
            .collect())
    }
}

impl DualStateStore for CheckRepository {
    type Entity = EligibilityCheck;

    fn get_working(&self, id: &str) -> Result<Option<EligibilityCheck>, StoreError> {
        let check = self.read(RecordState::Working, id)?;
        self.with_model(check)
    }

    fn get_working_metadata_only(&self, id: &str) -> Result<Option<EligibilityCheck>, StoreError> {
        self.read(RecordState::Working, id)
    }

    fn save_new_working(&self, check: &EligibilityCheck) -> Result<String, StoreError> {
        let id = check.working_id();
        let mut stored = check.clone();
        stored.id = id.clone();
        self.write_model(&stored)?;
        self.documents.persist_with_id(
            layout::check_collection(RecordState::Working),
            &id,
            Self::check_document(&stored)?,
        )
    }

    fn update_working(&self, check: &EligibilityCheck) -> Result<(), StoreError> {
        self.write_model(check)?;
        self.documents.update(
            layout::check_collection(RecordState::Working),
            &check.id,
            Self::check_document(check)?,
        )
    }

    fn list_working(&self, owner_id: &str) -> Result<Vec<EligibilityCheck>, StoreError> {
        self.by_owner(RecordState::Working, owner_id)
    }

    fn delete_working(&self, id: &str) -> Result<(), StoreError> {
        self.documents
            .delete(layout::check_collection(RecordState::Working), id)
    }
}
