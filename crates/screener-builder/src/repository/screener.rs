use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{from_document, from_documents, to_document, DualStateStore};
use crate::domain::{Benefit, BenefitDetail, Screener};
use crate::store::layout::{self, OWNER_ID_FIELD};
use crate::store::{BlobStore, DocumentStore, StoreError};
use crate::versioning::RecordState;

const STATE: RecordState = RecordState::Working;

/// Working screeners, their benefit sub-collections and their form schemas.
#[derive(Clone)]
pub struct ScreenerRepository {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ScreenerRepository {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { documents, blobs }
    }

    fn collection() -> &'static str {
        layout::screener_collection(STATE)
    }

    fn screener_document(screener: &Screener) -> Result<crate::store::Document, StoreError> {
        let mut data = to_document(screener)?;
        data.remove("formSchema");
        Ok(data)
    }

    pub fn add_benefit_detail(
        &self,
        screener_id: &str,
        detail: &BenefitDetail,
    ) -> Result<(), StoreError> {
        let Some(mut screener) = self.get_working_metadata_only(screener_id)? else {
            return Err(StoreError::Unavailable(format!(
                "screener '{screener_id}' disappeared while adding a benefit"
            )));
        };
        screener.benefits.push(detail.clone());
        self.update_working(&screener)
    }

    pub fn get_form_schema(&self, screener_id: &str) -> Result<Option<Value>, StoreError> {
        self.blobs
            .read_json(&layout::form_schema_path(STATE, screener_id))
    }

    /// Raw schema bytes, for byte-for-byte copies.
    pub fn read_form_schema_bytes(&self, screener_id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.blobs
            .read_bytes(&layout::form_schema_path(STATE, screener_id))
    }

    pub fn save_form_schema(&self, screener_id: &str, schema: &Value) -> Result<(), StoreError> {
        let path = layout::form_schema_path(STATE, screener_id);
        self.blobs.write_json(&path, schema)?;
        info!(screener_id, path = %path, "saved working form schema");
        Ok(())
    }

    pub fn list_benefits(&self, screener_id: &str) -> Result<Vec<Benefit>, StoreError> {
        from_documents(
            self.documents
                .get_all(&layout::benefit_collection(STATE, screener_id))?,
        )
    }

    pub fn get_benefit(
        &self,
        screener_id: &str,
        benefit_id: &str,
    ) -> Result<Option<Benefit>, StoreError> {
        self.documents
            .get_by_id(&layout::benefit_collection(STATE, screener_id), benefit_id)?
            .map(from_document)
            .transpose()
    }

    pub fn save_new_benefit(
        &self,
        screener_id: &str,
        benefit: &Benefit,
    ) -> Result<String, StoreError> {
        self.documents.persist_with_id(
            &layout::benefit_collection(STATE, screener_id),
            &benefit.id,
            to_document(benefit)?,
        )
    }

    pub fn update_benefit(&self, screener_id: &str, benefit: &Benefit) -> Result<(), StoreError> {
        debug!(screener_id, benefit_id = %benefit.id, "updating working benefit");
        self.documents.update(
            &layout::benefit_collection(STATE, screener_id),
            &benefit.id,
            to_document(benefit)?,
        )
    }

    pub fn delete_benefit(&self, screener_id: &str, benefit_id: &str) -> Result<(), StoreError> {
        self.documents
            .delete(&layout::benefit_collection(STATE, screener_id), benefit_id)
    }
}

impl DualStateStore for ScreenerRepository {
    type Entity = Screener;

    fn get_working(&self, id: &str) -> Result<Option<Screener>, StoreError> {
        let Some(mut screener) = self.get_working_metadata_only(id)? else {
            return Ok(None);
        };
        screener.form_schema = self.get_form_schema(id)?;
        Ok(Some(screener))
    }

    fn get_working_metadata_only(&self, id: &str) -> Result<Option<Screener>, StoreError> {
        self.documents
            .get_by_id(Self::collection(), id)?
            .map(from_document)
            .transpose()
    }

    fn save_new_working(&self, screener: &Screener) -> Result<String, StoreError> {
        let mut data = Self::screener_document(screener)?;
        data.remove("id");
        self.documents.persist(Self::collection(), data)
    }

    fn update_working(&self, screener: &Screener) -> Result<(), StoreError> {
        if let Some(schema) = &screener.form_schema {
            self.save_form_schema(&screener.id, schema)?;
        }
        self.documents.update(
            Self::collection(),
            &screener.id,
            Self::screener_document(screener)?,
        )
    }

    fn list_working(&self, owner_id: &str) -> Result<Vec<Screener>, StoreError> {
        from_documents(self.documents.get_by_field(
            Self::collection(),
            OWNER_ID_FIELD,
            &Value::String(owner_id.to_string()),
        )?)
    }

    fn delete_working(&self, id: &str) -> Result<(), StoreError> {
        self.documents
            .delete_all(&layout::benefit_collection(STATE, id))?;
        self.documents.delete(Self::collection(), id)
    }
}
