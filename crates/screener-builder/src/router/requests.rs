use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::schema::FormPath;

/// Requests that name the screener they act on in their body or query.
pub trait ScreenerScoped {
    fn screener_id(&self) -> &str;

    /// The targeted screener id, rejected when blank.
    fn target(&self) -> Result<&str, AppError> {
        let id = self.screener_id().trim();
        if id.is_empty() {
            return Err(AppError::InvalidRequest("screenerId is required".to_string()));
        }
        Ok(id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreenerRequest {
    pub screener_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScreenerRequest {
    pub id: String,
    pub screener_name: String,
}

impl ScreenerScoped for UpdateScreenerRequest {
    fn screener_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSchemaRequest {
    pub screener_id: String,
    pub schema: Value,
}

impl SaveSchemaRequest {
    /// The form schema must be a JSON object.
    pub fn schema(&self) -> Result<&Value, AppError> {
        if !self.schema.is_object() {
            return Err(AppError::InvalidRequest(
                "schema must be a JSON object".to_string(),
            ));
        }
        Ok(&self.schema)
    }
}

impl ScreenerScoped for SaveSchemaRequest {
    fn screener_id(&self) -> &str {
        &self.screener_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub screener_id: String,
}

impl ScreenerScoped for PublishRequest {
    fn screener_id(&self) -> &str {
        &self.screener_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerQuery {
    #[serde(default)]
    pub screener_id: String,
}

impl ScreenerScoped for ScreenerQuery {
    fn screener_id(&self) -> &str {
        &self.screener_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionQuery {
    #[serde(default)]
    pub screener_id: String,
    #[serde(default)]
    pub benefit_id: String,
}

impl DecisionQuery {
    pub fn benefit(&self) -> Result<&str, AppError> {
        let id = self.benefit_id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidRequest("benefitId is required".to_string()));
        }
        Ok(id)
    }
}

impl ScreenerScoped for DecisionQuery {
    fn screener_id(&self) -> &str {
        &self.screener_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCheckRequest {
    pub check_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    pub module: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormPathsResponse {
    pub paths: Vec<FormPath>,
}
