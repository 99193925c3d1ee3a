use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{AdvisorError, PlanAdvisorService};
use crate::plans::PlanCatalogSource;
use crate::questionnaire::{QuestionnaireResponse, QuestionnaireStore, SessionId};
use crate::recommendations::RankedPlan;

/// Router builder exposing the catalog, comparison, and recommendation endpoints.
pub fn advisor_router<C, S>(service: Arc<PlanAdvisorService<C, S>>) -> Router
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    Router::new()
        .route("/api/v1/plans", get(catalog_handler::<C, S>))
        .route("/api/v1/plans/comparison", get(comparison_handler::<C, S>))
        .route(
            "/api/v1/recommendations",
            post(recommendation_handler::<C, S>),
        )
        .route(
            "/api/v1/questionnaire/:session_id",
            put(submit_questionnaire_handler::<C, S>)
                .get(questionnaire_handler::<C, S>)
                .delete(clear_questionnaire_handler::<C, S>),
        )
        .route(
            "/api/v1/questionnaire/:session_id/recommendations",
            get(session_recommendation_handler::<C, S>),
        )
        .with_state(service)
}

/// Query string for the comparison endpoint; `plan_ids` is comma separated.
#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonQuery {
    age_bracket: String,
    household_type: String,
    #[serde(default)]
    plan_ids: Option<String>,
}

impl ComparisonQuery {
    /// `None` (the whole catalog) when the parameter is absent or lists no ids.
    fn plan_ids(&self) -> Option<Vec<String>> {
        self.plan_ids
            .as_ref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|ids| !ids.is_empty())
    }
}

pub(crate) async fn catalog_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.catalog() {
        Ok(snapshot) => {
            let payload = json!({
                "fetched_at": snapshot.fetched_at,
                "plans": snapshot.plans(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn comparison_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    Query(query): Query<ComparisonQuery>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    let plan_ids = query.plan_ids();
    match service.compare(&query.age_bracket, &query.household_type, plan_ids.as_deref()) {
        Ok(rows) => {
            let payload = json!({
                "age_bracket": query.age_bracket.trim(),
                "household_type": query.household_type.trim(),
                "rows": rows,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommendation_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    axum::Json(response): axum::Json<QuestionnaireResponse>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.recommend(&response) {
        Ok(plans) => recommendations_response(plans),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_questionnaire_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    Path(session_id): Path<String>,
    axum::Json(response): axum::Json<QuestionnaireResponse>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.submit_questionnaire(SessionId(session_id), response) {
        Ok(stored) => (StatusCode::ACCEPTED, axum::Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn questionnaire_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.questionnaire(&SessionId(session_id)) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_questionnaire_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.clear_questionnaire(&SessionId(session_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_recommendation_handler<C, S>(
    State(service): State<Arc<PlanAdvisorService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: PlanCatalogSource + 'static,
    S: QuestionnaireStore + 'static,
{
    match service.recommend_for_session(&SessionId(session_id)) {
        Ok(plans) => recommendations_response(plans),
        Err(err) => error_response(err),
    }
}

fn recommendations_response(plans: Vec<RankedPlan>) -> Response {
    let payload = json!({
        "status": "ok",
        "plans": plans,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

/// An empty result set is a normal outcome for the visitor, so it is reported
/// with `200` and the per-plan exclusions rather than as a failure.
pub(crate) fn error_response(err: AdvisorError) -> Response {
    match err {
        AdvisorError::NoEligiblePlans(details) => {
            let payload = json!({
                "status": "no_matches",
                "message": details.to_string(),
                "age_bracket": details.age_bracket,
                "household_type": details.household_type,
                "plans": [],
                "exclusions": details.exclusions,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        AdvisorError::Questionnaire(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AdvisorError::InvalidFilter(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field,
                "value": error.source.value,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        AdvisorError::QuestionnaireMissing { session_id } => {
            let payload = json!({
                "error": "questionnaire not found",
                "session_id": session_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        AdvisorError::Store(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        other @ AdvisorError::Catalog(_) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
