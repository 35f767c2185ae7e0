use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use super::{authorize, ServiceError};
use crate::domain::{Benefit, CallerId, CheckConfig, EligibilityCheck, Screener};
use crate::evaluation::{BenefitEvaluation, BenefitEvaluator, DecisionEngine};
use crate::library::LibraryCatalog;
use crate::publish::{PublishReport, ScreenerPublisher};
use crate::repository::{
    CheckRepository, DualStateStore, PublishedScreenerRepository, ScreenerRepository,
};
use crate::resolver::ArchivalResolver;
use crate::schema::{extract_unique_input_paths, FormPath};
use crate::store::{BlobStore, DocumentStore};

const SCREENER: &str = "screener";
const BENEFIT: &str = "benefit";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBenefit {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial benefit update; at least one field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BenefitUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Screener and benefit authoring for the owning caller, plus the public
/// read paths over published screeners.
#[derive(Clone)]
pub struct ScreenerService {
    screeners: ScreenerRepository,
    published: PublishedScreenerRepository,
    publisher: ScreenerPublisher,
    resolver: ArchivalResolver,
    library: Arc<LibraryCatalog>,
    evaluator: BenefitEvaluator,
}

impl ScreenerService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        library: Arc<LibraryCatalog>,
        engine: Arc<dyn DecisionEngine>,
    ) -> Self {
        let screeners = ScreenerRepository::new(documents.clone(), blobs.clone());
        let published = PublishedScreenerRepository::new(documents.clone(), blobs.clone());
        let checks = CheckRepository::new(documents, blobs);

        Self {
            publisher: ScreenerPublisher::new(screeners.clone(), published.clone()),
            resolver: ArchivalResolver::new(checks),
            screeners,
            published,
            library,
            evaluator: BenefitEvaluator::new(engine),
        }
    }

    fn owned_screener(&self, caller: &CallerId, id: &str) -> Result<Screener, ServiceError> {
        let screener = self
            .screeners
            .get_working_metadata_only(id)?
            .ok_or_else(|| ServiceError::not_found(SCREENER, id))?;
        authorize(caller, &screener.owner_id, SCREENER, id)?;
        Ok(screener)
    }

    fn owned_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
    ) -> Result<(Screener, Benefit), ServiceError> {
        let screener = self.owned_screener(caller, screener_id)?;
        let benefit = self
            .screeners
            .get_benefit(screener_id, benefit_id)?
            .ok_or_else(|| ServiceError::not_found(BENEFIT, benefit_id))?;
        Ok((screener, benefit))
    }

    fn require_name(name: &str, field: &str) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(format!("{field} must not be blank")));
        }
        Ok(())
    }

    pub fn create_screener(&self, caller: &CallerId, name: &str) -> Result<Screener, ServiceError> {
        Self::require_name(name, "screenerName")?;
        let mut screener = Screener::new(caller.as_str(), name);
        screener.id = self.screeners.save_new_working(&screener)?;
        info!(screener_id = %screener.id, owner_id = %caller.as_str(), "created screener");
        Ok(screener)
    }

    pub fn get_screener(&self, caller: &CallerId, id: &str) -> Result<Screener, ServiceError> {
        self.owned_screener(caller, id)?;
        self.screeners
            .get_working(id)?
            .ok_or_else(|| ServiceError::not_found(SCREENER, id))
    }

    pub fn list_screeners(&self, caller: &CallerId) -> Result<Vec<Screener>, ServiceError> {
        Ok(self.screeners.list_working(caller.as_str())?)
    }

    pub fn rename_screener(
        &self,
        caller: &CallerId,
        id: &str,
        name: &str,
    ) -> Result<Screener, ServiceError> {
        Self::require_name(name, "screenerName")?;
        let mut screener = self.owned_screener(caller, id)?;
        screener.screener_name = name.to_string();
        self.screeners.update_working(&screener)?;
        Ok(screener)
    }

    /// Deletes the working screener and its working benefits. Published data
    /// is left in place.
    pub fn delete_screener(&self, caller: &CallerId, id: &str) -> Result<(), ServiceError> {
        self.owned_screener(caller, id)?;
        self.screeners.delete_working(id)?;
        info!(screener_id = id, "deleted working screener");
        Ok(())
    }

    pub fn save_form_schema(
        &self,
        caller: &CallerId,
        id: &str,
        schema: &Value,
    ) -> Result<(), ServiceError> {
        self.owned_screener(caller, id)?;
        self.screeners.save_form_schema(id, schema)?;
        Ok(())
    }

    pub fn publish(&self, caller: &CallerId, id: &str) -> Result<PublishReport, ServiceError> {
        self.owned_screener(caller, id)?;
        self.publisher.publish(id)
    }

    /// Public read path; no ownership check.
    pub fn get_published_screener(&self, published_id: &str) -> Result<Screener, ServiceError> {
        self.published
            .get(published_id)?
            .ok_or_else(|| ServiceError::not_found("published screener", published_id))
    }

    pub fn list_published_benefits(&self, published_id: &str) -> Result<Vec<Benefit>, ServiceError> {
        self.published
            .get_metadata_only(published_id)?
            .ok_or_else(|| ServiceError::not_found("published screener", published_id))?;
        Ok(self.published.list_benefits(published_id)?)
    }

    pub fn list_benefits(
        &self,
        caller: &CallerId,
        screener_id: &str,
    ) -> Result<Vec<Benefit>, ServiceError> {
        self.owned_screener(caller, screener_id)?;
        Ok(self.screeners.list_benefits(screener_id)?)
    }

    pub fn get_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
    ) -> Result<Benefit, ServiceError> {
        Ok(self.owned_benefit(caller, screener_id, benefit_id)?.1)
    }

    pub fn create_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        request: NewBenefit,
    ) -> Result<Benefit, ServiceError> {
        Self::require_name(&request.name, "name")?;
        let mut screener = self.owned_screener(caller, screener_id)?;

        let benefit = Benefit {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            description: request.description,
            owner_id: caller.as_str().to_string(),
            is_public: false,
            checks: Vec::new(),
        };
        self.screeners.save_new_benefit(screener_id, &benefit)?;

        screener.benefits.push(benefit.detail());
        self.screeners.update_working(&screener)?;
        info!(screener_id, benefit_id = %benefit.id, "created benefit");
        Ok(benefit)
    }

    /// Update name and/or description, then refresh the summary cached on the
    /// screener.
    pub fn update_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
        update: BenefitUpdate,
    ) -> Result<Benefit, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "at least one of name or description is required".to_string(),
            ));
        }
        if let Some(name) = &update.name {
            Self::require_name(name, "name")?;
        }
        let (mut screener, mut benefit) = self.owned_benefit(caller, screener_id, benefit_id)?;

        if let Some(name) = update.name {
            benefit.name = name;
        }
        if let Some(description) = update.description {
            benefit.description = description;
        }
        self.screeners.update_benefit(screener_id, &benefit)?;

        let detail = benefit.detail();
        if !screener.sync_benefit_detail(&detail) {
            screener.benefits.push(detail);
        }
        self.screeners.update_working(&screener)?;
        Ok(benefit)
    }

    pub fn delete_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
    ) -> Result<(), ServiceError> {
        let (mut screener, _) = self.owned_benefit(caller, screener_id, benefit_id)?;
        self.screeners.delete_benefit(screener_id, benefit_id)?;
        screener.remove_benefit_detail(benefit_id);
        self.screeners.update_working(&screener)?;
        Ok(())
    }

    /// Source check for a new config: the caller's visible published custom
    /// check first, then the library.
    fn attachable_check(
        &self,
        caller: &CallerId,
        check_id: &str,
    ) -> Result<EligibilityCheck, ServiceError> {
        if let Some(check) = self
            .resolver
            .published_custom_check(caller.as_str(), check_id)?
        {
            return Ok(check);
        }
        self.library
            .by_id(check_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("check", check_id))
    }

    /// Attach a snapshot of the check. Re-adding an attached check replaces
    /// its config with a fresh snapshot.
    pub fn add_check(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
        check_id: &str,
    ) -> Result<Benefit, ServiceError> {
        let (_, mut benefit) = self.owned_benefit(caller, screener_id, benefit_id)?;
        let config = CheckConfig::snapshot(&self.attachable_check(caller, check_id)?);

        match benefit
            .checks
            .iter_mut()
            .find(|existing| existing.check_id == config.check_id)
        {
            Some(existing) => *existing = config,
            None => benefit.checks.push(config),
        }
        self.screeners.update_benefit(screener_id, &benefit)?;
        info!(screener_id, benefit_id, check_id, "attached check to benefit");
        Ok(benefit)
    }

    pub fn remove_check(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
        check_id: &str,
    ) -> Result<Benefit, ServiceError> {
        let (_, mut benefit) = self.owned_benefit(caller, screener_id, benefit_id)?;
        let before = benefit.checks.len();
        benefit.checks.retain(|config| config.check_id != check_id);
        if benefit.checks.len() == before {
            return Err(ServiceError::not_found("check", check_id));
        }
        self.screeners.update_benefit(screener_id, &benefit)?;
        Ok(benefit)
    }

    pub fn update_check_parameters(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
        check_id: &str,
        parameters: Map<String, Value>,
    ) -> Result<Benefit, ServiceError> {
        let (_, mut benefit) = self.owned_benefit(caller, screener_id, benefit_id)?;
        let config = benefit
            .checks
            .iter_mut()
            .find(|config| config.check_id == check_id)
            .ok_or_else(|| ServiceError::not_found("check", check_id))?;
        config.parameters = parameters;
        self.screeners.update_benefit(screener_id, &benefit)?;
        Ok(benefit)
    }

    pub fn form_paths(
        &self,
        caller: &CallerId,
        screener_id: &str,
    ) -> Result<Vec<FormPath>, ServiceError> {
        self.owned_screener(caller, screener_id)?;
        let benefits = self.screeners.list_benefits(screener_id)?;
        Ok(extract_unique_input_paths(&benefits))
    }

    pub fn published_form_paths(&self, published_id: &str) -> Result<Vec<FormPath>, ServiceError> {
        self.published
            .get_metadata_only(published_id)?
            .ok_or_else(|| ServiceError::not_found("published screener", published_id))?;
        let benefits = self.published.list_benefits(published_id)?;
        Ok(extract_unique_input_paths(&benefits))
    }

    fn require_inputs(inputs: &Map<String, Value>) -> Result<(), ServiceError> {
        if inputs.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "decision inputs are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Owner preview against the working benefit.
    pub fn evaluate_benefit(
        &self,
        caller: &CallerId,
        screener_id: &str,
        benefit_id: &str,
        inputs: &Map<String, Value>,
    ) -> Result<BenefitEvaluation, ServiceError> {
        Self::require_inputs(inputs)?;
        let (_, benefit) = self.owned_benefit(caller, screener_id, benefit_id)?;
        Ok(self.evaluator.evaluate(&benefit, inputs))
    }

    pub fn evaluate_published_benefit(
        &self,
        published_id: &str,
        benefit_id: &str,
        inputs: &Map<String, Value>,
    ) -> Result<BenefitEvaluation, ServiceError> {
        Self::require_inputs(inputs)?;
        let benefit = self
            .published
            .get_benefit(published_id, benefit_id)?
            .ok_or_else(|| ServiceError::not_found(BENEFIT, benefit_id))?;
        Ok(self.evaluator.evaluate(&benefit, inputs))
    }
}
