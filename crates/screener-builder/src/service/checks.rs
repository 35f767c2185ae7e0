use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{authorize, ServiceError};
use crate::domain::{CallerId, EligibilityCheck, ParameterDefinition};
use crate::library::LibraryCatalog;
use crate::repository::{CheckRepository, DualStateStore};
use crate::resolver::ArchivalResolver;
use crate::store::{BlobStore, DocumentStore};
use crate::versioning::{compare_versions, CheckVersion};

const CHECK: &str = "check";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheck {
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `0.1.0`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub input_definition: Value,
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
    #[serde(default)]
    pub dmn_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheck {
    pub description: Option<String>,
    pub input_definition: Option<Value>,
    pub parameter_definitions: Option<Vec<ParameterDefinition>>,
    pub dmn_model: Option<String>,
}

impl UpdateCheck {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.input_definition.is_none()
            && self.parameter_definitions.is_none()
            && self.dmn_model.is_none()
    }
}

/// Custom check authoring and published check discovery.
#[derive(Clone)]
pub struct CheckService {
    checks: CheckRepository,
    resolver: ArchivalResolver,
    library: Arc<LibraryCatalog>,
}

impl CheckService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        library: Arc<LibraryCatalog>,
    ) -> Self {
        let checks = CheckRepository::new(documents, blobs);
        Self {
            resolver: ArchivalResolver::new(checks.clone()),
            checks,
            library,
        }
    }

    fn owned_working(
        &self,
        caller: &CallerId,
        id: &str,
        with_model: bool,
    ) -> Result<EligibilityCheck, ServiceError> {
        let found = if with_model {
            self.checks.get_working(id)?
        } else {
            self.checks.get_working_metadata_only(id)?
        };
        let check = found.ok_or_else(|| ServiceError::not_found(CHECK, id))?;
        authorize(caller, &check.owner_id, CHECK, id)?;
        Ok(check)
    }

    pub fn create_check(
        &self,
        caller: &CallerId,
        request: NewCheck,
    ) -> Result<EligibilityCheck, ServiceError> {
        if request.name.trim().is_empty() || request.module.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "name and module must not be blank".to_string(),
            ));
        }
        let version = match &request.version {
            Some(raw) => CheckVersion::parse(raw)?,
            None => CheckVersion::INITIAL,
        };

        let mut check = EligibilityCheck {
            id: String::new(),
            name: request.name,
            module: request.module,
            description: request.description,
            version: version.to_string(),
            owner_id: caller.as_str().to_string(),
            is_public: false,
            is_archived: false,
            evaluation_url: None,
            input_definition: request.input_definition,
            parameter_definitions: request.parameter_definitions,
            dmn_model: request.dmn_model,
            date_published: None,
        };

        let working_id = check.working_id();
        if self.checks.get_working_metadata_only(&working_id)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "check '{working_id}' already exists"
            )));
        }
        check.id = self.checks.save_new_working(&check)?;
        info!(check_id = %check.id, owner_id = %check.owner_id, "created custom check");
        Ok(check)
    }

    pub fn get_working_check(
        &self,
        caller: &CallerId,
        id: &str,
    ) -> Result<EligibilityCheck, ServiceError> {
        self.owned_working(caller, id, true)
    }

    pub fn list_working_checks(
        &self,
        caller: &CallerId,
        include_archived: bool,
    ) -> Result<Vec<EligibilityCheck>, ServiceError> {
        let mut checks = self.checks.list_working(caller.as_str())?;
        if !include_archived {
            checks.retain(|check| !check.is_archived);
        }
        Ok(checks)
    }

    pub fn update_check(
        &self,
        caller: &CallerId,
        id: &str,
        update: UpdateCheck,
    ) -> Result<EligibilityCheck, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "update contains no fields".to_string(),
            ));
        }
        let mut check = self.owned_working(caller, id, false)?;
        if check.is_archived {
            return Err(ServiceError::Conflict(format!("check '{id}' is archived")));
        }

        if let Some(description) = update.description {
            check.description = Some(description);
        }
        if let Some(input_definition) = update.input_definition {
            check.input_definition = input_definition;
        }
        if let Some(parameter_definitions) = update.parameter_definitions {
            check.parameter_definitions = parameter_definitions;
        }
        check.dmn_model = update.dmn_model;

        self.checks.update_working(&check)?;
        Ok(check)
    }

    /// Soft delete: hides every published version of the check from discovery.
    pub fn archive_check(&self, caller: &CallerId, id: &str) -> Result<(), ServiceError> {
        self.owned_working(caller, id, false)?;
        self.checks.archive_working(id)?;
        info!(check_id = id, "archived custom check");
        Ok(())
    }

    /// Snapshot the working check at its current version, then move the
    /// working check to the next patch version.
    pub fn publish_check(
        &self,
        caller: &CallerId,
        id: &str,
    ) -> Result<EligibilityCheck, ServiceError> {
        let mut working = self.owned_working(caller, id, true)?;
        if working.is_archived {
            return Err(ServiceError::Conflict(format!("check '{id}' is archived")));
        }
        let next_version = CheckVersion::parse(&working.version)?.next_patch()?;

        let mut published = working.clone();
        published.id = working.published_id();
        published.date_published = Some(Utc::now());
        if self
            .checks
            .get_published_metadata_only(&published.id)?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "check '{}' is already published",
                published.id
            )));
        }
        self.checks.save_published(&published)?;

        working.version = next_version.to_string();
        working.dmn_model = None;
        self.checks.update_working(&working)?;
        info!(
            check_id = id,
            published_check_id = %published.id,
            next_version = %working.version,
            "published custom check"
        );
        Ok(published)
    }

    /// All published versions of the working check's family, newest first.
    pub fn published_versions(
        &self,
        caller: &CallerId,
        id: &str,
    ) -> Result<Vec<EligibilityCheck>, ServiceError> {
        let working = self.owned_working(caller, id, false)?;
        let mut versions = self.checks.published_versions(&working)?;

        for check in &versions {
            CheckVersion::parse(&check.version)?;
        }
        versions.sort_by(|left, right| {
            compare_versions(&right.version, &left.version).unwrap_or(Ordering::Equal)
        });
        Ok(versions)
    }

    pub fn latest_published_checks(
        &self,
        caller: &CallerId,
    ) -> Result<Vec<EligibilityCheck>, ServiceError> {
        self.resolver.latest_published_checks(caller.as_str())
    }

    pub fn get_published_check(
        &self,
        caller: &CallerId,
        id: &str,
    ) -> Result<EligibilityCheck, ServiceError> {
        self.resolver
            .published_custom_check(caller.as_str(), id)?
            .ok_or_else(|| ServiceError::not_found(CHECK, id))
    }

    pub fn library_checks(&self, module: Option<&str>) -> Vec<EligibilityCheck> {
        match module {
            Some(module) => self.library.by_module(module).cloned().collect(),
            None => self.library.all().to_vec(),
        }
    }

    pub fn library_check(&self, id: &str) -> Result<EligibilityCheck, ServiceError> {
        self.library
            .by_id(id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("library check", id))
    }
}
