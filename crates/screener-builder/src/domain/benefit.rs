use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EligibilityCheck, ParameterDefinition};

/// Listing summary cached on the owning screener.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Benefit stored in a screener's benefit sub-collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl Benefit {
    pub fn detail(&self) -> BenefitDetail {
        BenefitDetail {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    pub fn check(&self, check_id: &str) -> Option<&CheckConfig> {
        self.checks.iter().find(|config| config.check_id == check_id)
    }
}

/// Point-in-time copy of an eligibility check attached to a benefit. Later
/// edits to the source check never flow into an embedded config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    pub check_id: String,
    #[serde(default)]
    pub check_name: String,
    #[serde(default)]
    pub check_version: String,
    #[serde(default)]
    pub check_module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_url: Option<String>,
    #[serde(default)]
    pub input_definition: Value,
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl CheckConfig {
    pub fn snapshot(check: &EligibilityCheck) -> Self {
        Self {
            check_id: check.id.clone(),
            check_name: check.name.clone(),
            check_version: check.version.clone(),
            check_module: check.module.clone(),
            evaluation_url: check.evaluation_url.clone(),
            input_definition: check.input_definition.clone(),
            parameter_definitions: check.parameter_definitions.clone(),
            parameters: Map::new(),
        }
    }

    /// Person identifiers this config evaluates for, taken from the
    /// `personId` and `peopleIds` parameters in that order without duplicates.
    pub fn person_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let mut push = |candidate: &str| {
            if !candidate.is_empty() && !ids.iter().any(|known| known == candidate) {
                ids.push(candidate.to_string());
            }
        };

        if let Some(Value::String(person_id)) = self.parameters.get("personId") {
            push(person_id);
        }
        if let Some(Value::Array(people)) = self.parameters.get("peopleIds") {
            for person in people.iter().filter_map(Value::as_str) {
                push(person);
            }
        }

        ids
    }
}
