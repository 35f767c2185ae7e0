use metrics_exporter_prometheus::PrometheusHandle;
use screener_builder::evaluation::{
    DecisionEngine, DecisionRequest, EvaluationError, EvaluationResult,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in used when no rule engine is wired to the service. Every check
/// comes back UNABLE_TO_DETERMINE.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DetachedDecisionEngine;

impl DecisionEngine for DetachedDecisionEngine {
    fn evaluate(&self, request: &DecisionRequest) -> Result<EvaluationResult, EvaluationError> {
        Err(EvaluationError::Unavailable(format!(
            "no decision engine configured for '{}'",
            request.artifact
        )))
    }
}
