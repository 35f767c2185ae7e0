use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::domain::{CallerId, EligibilityCheck};
use crate::evaluation::{DecisionEngine, DecisionRequest, EvaluationError, EvaluationResult};
use crate::library::LibraryCatalog;
use crate::service::{CheckService, NewCheck, ScreenerService};
use crate::store::{BlobStore, DocumentStore, InMemoryBlobStore, InMemoryDocumentStore, StoreError};

pub(super) fn owner() -> CallerId {
    CallerId::new("owner-1")
}

pub(super) fn stranger() -> CallerId {
    CallerId::new("owner-2")
}

pub(super) fn household_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "people": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "dateOfBirth": { "type": "string", "format": "date" }
                    }
                }
            },
            "income": { "type": "number" }
        }
    })
}

pub(super) fn library() -> LibraryCatalog {
    LibraryCatalog::from_checks([EligibilityCheck {
        id: "lib-age-over".to_string(),
        name: "over".to_string(),
        module: "age".to_string(),
        version: "2".to_string(),
        evaluation_url: Some("/api/v1/age/over".to_string()),
        input_definition: household_schema(),
        ..EligibilityCheck::default()
    }])
}

pub(super) fn new_check(name: &str) -> NewCheck {
    NewCheck {
        name: name.to_string(),
        module: "income".to_string(),
        input_definition: json!({ "properties": { "income": { "type": "number" } } }),
        dmn_model: Some("<definitions name=\"income\"/>".to_string()),
        ..NewCheck::default()
    }
}

/// Engine returning one fixed result for every request.
pub(super) struct StaticEngine(pub EvaluationResult);

impl DecisionEngine for StaticEngine {
    fn evaluate(&self, _request: &DecisionRequest) -> Result<EvaluationResult, EvaluationError> {
        Ok(self.0)
    }
}

/// Blob store that rejects writes under a configurable path prefix.
#[derive(Clone, Default)]
pub(super) struct FailingBlobStore {
    inner: InMemoryBlobStore,
    failing_prefix: Arc<Mutex<Option<String>>>,
}

impl FailingBlobStore {
    pub(super) fn fail_writes_under(&self, prefix: &str) {
        *self.failing_prefix.lock().expect("prefix mutex poisoned") = Some(prefix.to_string());
    }

    pub(super) fn recover(&self) {
        *self.failing_prefix.lock().expect("prefix mutex poisoned") = None;
    }

    pub(super) fn inner(&self) -> &InMemoryBlobStore {
        &self.inner
    }
}

impl BlobStore for FailingBlobStore {
    fn write_bytes(&self, path: &str, content: &[u8], content_type: &str) -> Result<(), StoreError> {
        let failing = self.failing_prefix.lock().expect("prefix mutex poisoned").clone();
        if failing.is_some_and(|prefix| path.starts_with(&prefix)) {
            return Err(StoreError::Unavailable(format!("write to {path} rejected")));
        }
        self.inner.write_bytes(path, content, content_type)
    }

    fn read_bytes(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.read_bytes(path)
    }
}

pub(super) struct Harness {
    pub documents: InMemoryDocumentStore,
    pub blobs: FailingBlobStore,
    pub screeners: ScreenerService,
    pub checks: CheckService,
}

pub(super) fn harness() -> Harness {
    harness_with_engine(EvaluationResult::True)
}

pub(super) fn harness_with_engine(result: EvaluationResult) -> Harness {
    let documents = InMemoryDocumentStore::default();
    let blobs = FailingBlobStore::default();
    let library = Arc::new(library());
    let document_store: Arc<dyn DocumentStore> = Arc::new(documents.clone());
    let blob_store: Arc<dyn BlobStore> = Arc::new(blobs.clone());

    Harness {
        screeners: ScreenerService::new(
            document_store.clone(),
            blob_store.clone(),
            library.clone(),
            Arc::new(StaticEngine(result)),
        ),
        checks: CheckService::new(document_store, blob_store, library),
        documents,
        blobs,
    }
}
