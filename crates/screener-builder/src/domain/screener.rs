use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::BenefitDetail;

/// Screener record. Working and published screeners share this shape and are
/// linked through `published_screener_id` on the working record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screener {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub screener_name: String,
    /// Blob-backed; never written to the document store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_schema: Option<Value>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_screener_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub benefits: Vec<BenefitDetail>,
}

impl Screener {
    pub fn new(owner_id: impl Into<String>, screener_name: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            screener_name: screener_name.into(),
            ..Self::default()
        }
    }

    pub fn published_id(&self) -> Option<&str> {
        self.published_screener_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Snapshot written to the published collection. Publish bookkeeping and
    /// the schema blob reference stay on the working record only.
    pub fn published_snapshot(&self, published_id: &str) -> Self {
        Self {
            id: published_id.to_string(),
            owner_id: self.owner_id.clone(),
            screener_name: self.screener_name.clone(),
            form_schema: None,
            is_published: true,
            published_screener_id: None,
            last_publish_date: None,
            benefits: self.benefits.clone(),
        }
    }

    /// Refresh the cached summary for a benefit. Returns `false` when the
    /// screener does not list that benefit.
    pub fn sync_benefit_detail(&mut self, detail: &BenefitDetail) -> bool {
        match self.benefits.iter_mut().find(|entry| entry.id == detail.id) {
            Some(entry) => {
                entry.name = detail.name.clone();
                entry.description = detail.description.clone();
                true
            }
            None => false,
        }
    }

    pub fn remove_benefit_detail(&mut self, benefit_id: &str) -> bool {
        let before = self.benefits.len();
        self.benefits.retain(|entry| entry.id != benefit_id);
        before != self.benefits.len()
    }
}
