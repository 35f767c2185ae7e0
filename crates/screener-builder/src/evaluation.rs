//! Pass-through to the external decision engine.
//!
//! The engine owns all rule logic. This module only assembles the request for
//! each check embedded in a benefit and folds the per-check outcomes into a
//! benefit-level result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{Benefit, CheckConfig};
use crate::schema::transform_form_data;
use crate::store::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationResult {
    True,
    False,
    #[serde(rename = "UNABLE_TO_DETERMINE")]
    Undetermined,
}

impl From<Option<bool>> for EvaluationResult {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::True,
            Some(false) => Self::False,
            None => Self::Undetermined,
        }
    }
}

impl EvaluationResult {
    /// FALSE if any input is FALSE, TRUE if every input is TRUE, otherwise
    /// UNABLE_TO_DETERMINE. An empty input is undetermined.
    pub fn combine(results: impl IntoIterator<Item = EvaluationResult>) -> Self {
        let mut seen_any = false;
        let mut all_true = true;
        for result in results {
            seen_any = true;
            match result {
                Self::False => return Self::False,
                Self::Undetermined => all_true = false,
                Self::True => {}
            }
        }
        if seen_any && all_true {
            Self::True
        } else {
            Self::Undetermined
        }
    }
}

/// One request to the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRequest {
    /// Evaluation endpoint of a library check, or the blob path of a custom
    /// check's rule model.
    #[serde(skip)]
    pub artifact: String,
    pub parameters: Map<String, Value>,
    pub situation: Map<String, Value>,
}

impl DecisionRequest {
    pub fn for_check(config: &CheckConfig, situation: Map<String, Value>) -> Self {
        let artifact = match &config.evaluation_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => layout::check_model_path(&config.check_id),
        };
        Self {
            artifact,
            parameters: config.parameters.clone(),
            situation,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("decision engine unavailable: {0}")]
    Unavailable(String),
    #[error("rule artifact '{0}' not found")]
    MissingArtifact(String),
    #[error("decision engine returned an unusable result: {0}")]
    InvalidResponse(String),
}

/// External rule-evaluation collaborator.
pub trait DecisionEngine: Send + Sync {
    fn evaluate(&self, request: &DecisionRequest) -> Result<EvaluationResult, EvaluationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEvaluation {
    pub check_id: String,
    pub check_name: String,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitEvaluation {
    pub benefit_id: String,
    pub benefit_name: String,
    pub result: EvaluationResult,
    pub checks: Vec<CheckEvaluation>,
}

#[derive(Clone)]
pub struct BenefitEvaluator {
    engine: Arc<dyn DecisionEngine>,
}

impl BenefitEvaluator {
    pub fn new(engine: Arc<dyn DecisionEngine>) -> Self {
        Self { engine }
    }

    /// Evaluate every check of `benefit` against submitted form data. Engine
    /// failures count as UNABLE_TO_DETERMINE for that check.
    pub fn evaluate(&self, benefit: &Benefit, form_data: &Map<String, Value>) -> BenefitEvaluation {
        let situation = transform_form_data(form_data);

        let checks: Vec<CheckEvaluation> = benefit
            .checks
            .iter()
            .map(|config| {
                let request = DecisionRequest::for_check(config, situation.clone());
                let result = self.engine.evaluate(&request).unwrap_or_else(|err| {
                    warn!(
                        benefit_id = %benefit.id,
                        check_id = %config.check_id,
                        error = %err,
                        "check evaluation failed"
                    );
                    EvaluationResult::Undetermined
                });
                CheckEvaluation {
                    check_id: config.check_id.clone(),
                    check_name: config.check_name.clone(),
                    result,
                }
            })
            .collect();

        BenefitEvaluation {
            benefit_id: benefit.id.clone(),
            benefit_name: benefit.name.clone(),
            result: EvaluationResult::combine(checks.iter().map(|check| check.result)),
            checks,
        }
    }
}
