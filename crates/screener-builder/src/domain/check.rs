use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::versioning::{deserialize_version, CheckIdentity};

/// Describes one configurable parameter of a check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Values for select-style parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

/// Reusable eligibility check. Custom checks exist as a working draft and any
/// number of published versions; library checks only exist published.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCheck {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_url: Option<String>,
    #[serde(default)]
    pub input_definition: Value,
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
    /// Rule payload; blob-backed and stripped before document writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmn_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<Utc>>,
}

impl EligibilityCheck {
    pub fn identity(&self) -> CheckIdentity<'_> {
        CheckIdentity::new(&self.owner_id, &self.module, &self.name)
    }

    pub fn working_id(&self) -> String {
        self.identity().working_id()
    }

    pub fn published_prefix(&self) -> String {
        self.identity().published_prefix()
    }

    pub fn published_id(&self) -> String {
        self.identity().published_id(&self.version)
    }
}
