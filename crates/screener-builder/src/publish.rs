//! Promotion of a working screener and its benefits into the published state.
//!
//! The sequence spans the document store and the blob store without a shared
//! transaction. Document writes always complete before the schema blob is
//! copied. Every step overwrites rather than appends, so republishing repairs
//! whatever a previously interrupted publish left behind.

use std::fmt;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::repository::{DualStateStore, PublishedScreenerRepository, ScreenerRepository};
use crate::service::ServiceError;

/// Raised when the published schema could not be refreshed after the published
/// documents were written. The published screener stays readable but may carry
/// a stale or missing schema until the next publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIntegrityWarning {
    pub screener_id: String,
    pub published_screener_id: String,
    pub detail: String,
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "published screener '{}' (from '{}') may reference a stale schema: {}",
            self.published_screener_id, self.screener_id, self.detail
        )
    }
}

/// Outcome of a publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub published_screener_id: String,
    pub first_publish: bool,
    pub benefit_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity_warning: Option<DataIntegrityWarning>,
}

#[derive(Clone)]
pub struct ScreenerPublisher {
    working: ScreenerRepository,
    published: PublishedScreenerRepository,
}

impl ScreenerPublisher {
    pub fn new(working: ScreenerRepository, published: PublishedScreenerRepository) -> Self {
        Self { working, published }
    }

    /// Publish the working screener. Ownership must be checked by the caller.
    pub fn publish(&self, screener_id: &str) -> Result<PublishReport, ServiceError> {
        let mut screener = self
            .working
            .get_working_metadata_only(screener_id)?
            .ok_or_else(|| ServiceError::not_found("screener", screener_id))?;

        let (published_id, first_publish) = match screener.published_id() {
            Some(existing) => {
                let existing = existing.to_string();
                self.published
                    .update(&screener.published_snapshot(&existing))?;
                (existing, false)
            }
            None => {
                let created = self.published.create(&screener.published_snapshot(""))?;
                screener.published_screener_id = Some(created.clone());
                (created, true)
            }
        };

        screener.last_publish_date = Some(Utc::now());
        self.working.update_working(&screener)?;

        let benefits = self.working.list_benefits(screener_id)?;
        self.published.replace_benefits(&published_id, &benefits)?;

        let Some(schema) = self.working.read_form_schema_bytes(screener_id)? else {
            warn!(
                screener_id,
                published_screener_id = %published_id,
                "working form schema missing; published screener has no schema"
            );
            return Err(ServiceError::not_found("form schema", screener_id));
        };

        let integrity_warning = match self.published.write_form_schema(&published_id, &schema) {
            Ok(()) => None,
            Err(err) => {
                let warning = DataIntegrityWarning {
                    screener_id: screener_id.to_string(),
                    published_screener_id: published_id.clone(),
                    detail: err.to_string(),
                };
                warn!(
                    screener_id,
                    published_screener_id = %published_id,
                    error = %err,
                    "data integrity warning: schema copy failed after publish"
                );
                Some(warning)
            }
        };

        info!(
            screener_id,
            published_screener_id = %published_id,
            first_publish,
            benefit_count = benefits.len(),
            "published screener"
        );

        Ok(PublishReport {
            published_screener_id: published_id,
            first_publish,
            benefit_count: benefits.len(),
            integrity_warning,
        })
    }
}
