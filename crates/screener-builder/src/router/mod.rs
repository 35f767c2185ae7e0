//! HTTP surface for the authoring services.

mod caller;
mod extract;
mod requests;


use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::domain::{Benefit, EligibilityCheck, Screener};
use crate::error::AppError;
use crate::evaluation::BenefitEvaluation;
use crate::publish::PublishReport;
use crate::service::{BenefitUpdate, CheckService, NewBenefit, NewCheck, ScreenerService, UpdateCheck};

pub use caller::{Caller, CALLER_HEADER};
pub use extract::{ApiJson, ApiQuery};
pub use requests::{
    AddCheckRequest, CheckListQuery, CreateScreenerRequest, DecisionQuery, FormPathsResponse,
    LibraryQuery, PublishRequest, SaveSchemaRequest, ScreenerQuery, ScreenerScoped,
    UpdateScreenerRequest,
};

type ApiResult<T> = Result<Json<T>, AppError>;

#[derive(Clone)]
pub struct BuilderState {
    pub screeners: Arc<ScreenerService>,
    pub checks: Arc<CheckService>,
}

pub fn builder_router(screeners: Arc<ScreenerService>, checks: Arc<CheckService>) -> Router {
    Router::new()
        .route("/api/screeners", get(list_screeners))
        .route("/api/screener", post(create_screener).put(update_screener))
        .route("/api/screener/delete", delete(delete_screener))
        .route("/api/screener/:screener_id", get(get_screener))
        .route("/api/screener/:screener_id/form-paths", get(form_paths))
        .route(
            "/api/screener/:screener_id/benefit",
            get(list_benefits).post(create_benefit),
        )
        .route(
            "/api/screener/:screener_id/benefit/:benefit_id",
            get(get_benefit).patch(update_benefit).delete(delete_benefit),
        )
        .route(
            "/api/screener/:screener_id/benefit/:benefit_id/check",
            post(add_check),
        )
        .route(
            "/api/screener/:screener_id/benefit/:benefit_id/check/:check_id",
            delete(remove_check),
        )
        .route(
            "/api/screener/:screener_id/benefit/:benefit_id/check/:check_id/parameters",
            patch(update_check_parameters),
        )
        .route("/api/save-form-schema", post(save_form_schema))
        .route("/api/publish", post(publish_screener))
        .route("/api/v2/decision", post(evaluate_working))
        .route("/api/published/screener/:screener_id", get(get_published_screener))
        .route(
            "/api/published/screener/:screener_id/benefit",
            get(list_published_benefits),
        )
        .route(
            "/api/published/screener/:screener_id/form-paths",
            get(published_form_paths),
        )
        .route(
            "/api/published/screener/:screener_id/benefit/:benefit_id/decision",
            post(evaluate_published),
        )
        .route("/api/check", get(list_checks).post(create_check))
        .route("/api/check/:check_id", get(get_check).patch(update_check))
        .route("/api/check/:check_id/archive", post(archive_check))
        .route("/api/check/:check_id/publish", post(publish_check))
        .route("/api/check/:check_id/versions", get(check_versions))
        .route("/api/published-check", get(latest_published_checks))
        .route("/api/published-check/:check_id", get(get_published_check))
        .route("/api/library-checks", get(library_checks))
        .route("/api/library-checks/:check_id", get(library_check))
        .with_state(BuilderState { screeners, checks })
}

async fn list_screeners(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
) -> ApiResult<Vec<Screener>> {
    Ok(Json(state.screeners.list_screeners(&caller)?))
}

async fn get_screener(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(screener_id): Path<String>,
) -> ApiResult<Screener> {
    Ok(Json(state.screeners.get_screener(&caller, &screener_id)?))
}

async fn create_screener(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<CreateScreenerRequest>,
) -> Result<(StatusCode, Json<Screener>), AppError> {
    let screener = state
        .screeners
        .create_screener(&caller, &request.screener_name)?;
    Ok((StatusCode::CREATED, Json(screener)))
}

async fn update_screener(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<UpdateScreenerRequest>,
) -> ApiResult<Screener> {
    let id = request.target()?;
    Ok(Json(state.screeners.rename_screener(
        &caller,
        id,
        &request.screener_name,
    )?))
}

async fn delete_screener(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<ScreenerQuery>,
) -> Result<StatusCode, AppError> {
    state.screeners.delete_screener(&caller, query.target()?)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save_form_schema(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<SaveSchemaRequest>,
) -> Result<StatusCode, AppError> {
    state
        .screeners
        .save_form_schema(&caller, request.target()?, request.schema()?)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn publish_screener(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<PublishRequest>,
) -> ApiResult<PublishReport> {
    Ok(Json(state.screeners.publish(&caller, request.target()?)?))
}

async fn form_paths(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(screener_id): Path<String>,
) -> ApiResult<FormPathsResponse> {
    let paths = state.screeners.form_paths(&caller, &screener_id)?;
    Ok(Json(FormPathsResponse { paths }))
}

async fn list_benefits(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(screener_id): Path<String>,
) -> ApiResult<Vec<Benefit>> {
    Ok(Json(state.screeners.list_benefits(&caller, &screener_id)?))
}

async fn create_benefit(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(screener_id): Path<String>,
    ApiJson(request): ApiJson<NewBenefit>,
) -> Result<(StatusCode, Json<Benefit>), AppError> {
    let benefit = state
        .screeners
        .create_benefit(&caller, &screener_id, request)?;
    Ok((StatusCode::CREATED, Json(benefit)))
}

async fn get_benefit(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id)): Path<(String, String)>,
) -> ApiResult<Benefit> {
    Ok(Json(state.screeners.get_benefit(
        &caller,
        &screener_id,
        &benefit_id,
    )?))
}

async fn update_benefit(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id)): Path<(String, String)>,
    ApiJson(update): ApiJson<BenefitUpdate>,
) -> ApiResult<Benefit> {
    Ok(Json(state.screeners.update_benefit(
        &caller,
        &screener_id,
        &benefit_id,
        update,
    )?))
}

async fn delete_benefit(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .screeners
        .delete_benefit(&caller, &screener_id, &benefit_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<AddCheckRequest>,
) -> ApiResult<Benefit> {
    if request.check_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("checkId is required".to_string()));
    }
    Ok(Json(state.screeners.add_check(
        &caller,
        &screener_id,
        &benefit_id,
        &request.check_id,
    )?))
}

async fn remove_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id, check_id)): Path<(String, String, String)>,
) -> ApiResult<Benefit> {
    Ok(Json(state.screeners.remove_check(
        &caller,
        &screener_id,
        &benefit_id,
        &check_id,
    )?))
}

async fn update_check_parameters(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path((screener_id, benefit_id, check_id)): Path<(String, String, String)>,
    ApiJson(parameters): ApiJson<Map<String, Value>>,
) -> ApiResult<Benefit> {
    Ok(Json(state.screeners.update_check_parameters(
        &caller,
        &screener_id,
        &benefit_id,
        &check_id,
        parameters,
    )?))
}

async fn evaluate_working(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<DecisionQuery>,
    ApiJson(inputs): ApiJson<Map<String, Value>>,
) -> ApiResult<BenefitEvaluation> {
    Ok(Json(state.screeners.evaluate_benefit(
        &caller,
        query.target()?,
        query.benefit()?,
        &inputs,
    )?))
}

async fn get_published_screener(
    State(state): State<BuilderState>,
    Path(screener_id): Path<String>,
) -> ApiResult<Screener> {
    Ok(Json(state.screeners.get_published_screener(&screener_id)?))
}

async fn list_published_benefits(
    State(state): State<BuilderState>,
    Path(screener_id): Path<String>,
) -> ApiResult<Vec<Benefit>> {
    Ok(Json(state.screeners.list_published_benefits(&screener_id)?))
}

async fn published_form_paths(
    State(state): State<BuilderState>,
    Path(screener_id): Path<String>,
) -> ApiResult<FormPathsResponse> {
    let paths = state.screeners.published_form_paths(&screener_id)?;
    Ok(Json(FormPathsResponse { paths }))
}

async fn evaluate_published(
    State(state): State<BuilderState>,
    Path((screener_id, benefit_id)): Path<(String, String)>,
    ApiJson(inputs): ApiJson<Map<String, Value>>,
) -> ApiResult<BenefitEvaluation> {
    Ok(Json(state.screeners.evaluate_published_benefit(
        &screener_id,
        &benefit_id,
        &inputs,
    )?))
}

async fn list_checks(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<CheckListQuery>,
) -> ApiResult<Vec<EligibilityCheck>> {
    Ok(Json(
        state
            .checks
            .list_working_checks(&caller, query.include_archived)?,
    ))
}

async fn create_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<NewCheck>,
) -> Result<(StatusCode, Json<EligibilityCheck>), AppError> {
    let check = state.checks.create_check(&caller, request)?;
    Ok((StatusCode::CREATED, Json(check)))
}

async fn get_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
) -> ApiResult<EligibilityCheck> {
    Ok(Json(state.checks.get_working_check(&caller, &check_id)?))
}

async fn update_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
    ApiJson(update): ApiJson<UpdateCheck>,
) -> ApiResult<EligibilityCheck> {
    Ok(Json(state.checks.update_check(&caller, &check_id, update)?))
}

async fn archive_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.checks.archive_check(&caller, &check_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn publish_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
) -> Result<(StatusCode, Json<EligibilityCheck>), AppError> {
    let published = state.checks.publish_check(&caller, &check_id)?;
    Ok((StatusCode::CREATED, Json(published)))
}

async fn check_versions(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
) -> ApiResult<Vec<EligibilityCheck>> {
    Ok(Json(state.checks.published_versions(&caller, &check_id)?))
}

async fn latest_published_checks(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
) -> ApiResult<Vec<EligibilityCheck>> {
    Ok(Json(state.checks.latest_published_checks(&caller)?))
}

async fn get_published_check(
    State(state): State<BuilderState>,
    Caller(caller): Caller,
    Path(check_id): Path<String>,
) -> ApiResult<EligibilityCheck> {
    Ok(Json(state.checks.get_published_check(&caller, &check_id)?))
}

async fn library_checks(
    State(state): State<BuilderState>,
    ApiQuery(query): ApiQuery<LibraryQuery>,
) -> Json<Vec<EligibilityCheck>> {
    Json(state.checks.library_checks(query.module.as_deref()))
}

async fn library_check(
    State(state): State<BuilderState>,
    Path(check_id): Path<String>,
) -> ApiResult<EligibilityCheck> {
    Ok(Json(state.checks.library_check(&check_id)?))
}
