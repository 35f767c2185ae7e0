//! Owner-scoped authoring services over the repositories.

mod checks;
mod screeners;

#[cfg(test)]
mod tests;

use crate::domain::CallerId;
use crate::store::StoreError;
use crate::versioning::MalformedVersionError;

pub use checks::{CheckService, NewCheck, UpdateCheck};
pub use screeners::{BenefitUpdate, NewBenefit, ScreenerService};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("caller does not own {entity} '{id}'")]
    Unauthorized { entity: &'static str, id: String },
    #[error(transparent)]
    MalformedVersion(#[from] MalformedVersionError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub(crate) fn authorize(
    caller: &CallerId,
    owner_id: &str,
    entity: &'static str,
    id: &str,
) -> Result<(), ServiceError> {
    if caller.owns(owner_id) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized {
            entity,
            id: id.to_string(),
        })
    }
}
