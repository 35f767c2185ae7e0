//! Collection names and blob path conventions.

use crate::versioning::RecordState;

pub const WORKING_SCREENERS: &str = "workingScreener";
pub const PUBLISHED_SCREENERS: &str = "publishedScreener";
pub const WORKING_CUSTOM_CHECKS: &str = "workingCustomCheck";
pub const PUBLISHED_CUSTOM_CHECKS: &str = "publishedCustomCheck";
pub const SYSTEM: &str = "system";

pub const SYSTEM_CONFIG_ID: &str = "config";
pub const LIBRARY_SCHEMA_PATH_FIELD: &str = "latestJsonStoragePath";

pub const OWNER_ID_FIELD: &str = "ownerId";

pub fn screener_collection(state: RecordState) -> &'static str {
    match state {
        RecordState::Working => WORKING_SCREENERS,
        RecordState::Published => PUBLISHED_SCREENERS,
    }
}

pub fn check_collection(state: RecordState) -> &'static str {
    match state {
        RecordState::Working => WORKING_CUSTOM_CHECKS,
        RecordState::Published => PUBLISHED_CUSTOM_CHECKS,
    }
}

/// Benefit sub-collection nested under a screener document.
pub fn benefit_collection(state: RecordState, screener_id: &str) -> String {
    format!(
        "{}/{}/customBenefit",
        screener_collection(state),
        screener_id
    )
}

pub fn form_schema_path(state: RecordState, screener_id: &str) -> String {
    format!("form/{}/{}.json", state.segment(), screener_id)
}

/// Rule payload for a custom check. Published check ids embed the version.
pub fn check_model_path(check_id: &str) -> String {
    format!("dmn/{check_id}.dmn")
}
