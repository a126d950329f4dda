use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::catalog::Question;
use super::domain::{AnswerMap, FamilyId};
use super::repository::AssessmentRepository;
use super::scoring::{DimensionOutcome, ScoreResult};
use super::service::{AssessmentSubmission, DignometroService, DignometroServiceError};

/// Submission payload posted by the questionnaire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    #[serde(default)]
    pub family_id: Option<String>,
    pub responses: AnswerMap,
    #[serde(default)]
    pub assessment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePreviewRequest {
    pub responses: AnswerMap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScorePreviewResponse {
    #[serde(flatten)]
    result: ScoreResult,
    dimensions: Vec<DimensionOutcome>,
    answered: usize,
    total_questions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionView<'a> {
    step: usize,
    #[serde(flatten)]
    question: &'a Question,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryQuery {
    #[serde(default)]
    family_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OverviewQuery {
    #[serde(default)]
    today: Option<NaiveDate>,
}

/// Router exposing the questionnaire, scoring and assessment history endpoints.
pub fn dignometro_router<R>(service: Arc<DignometroService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/dignometro/questions", get(questions_handler::<R>))
        .route("/api/v1/dignometro/score", post(score_handler::<R>))
        .route(
            "/api/v1/dignometro/assessments",
            post(submit_handler::<R>).get(history_handler::<R>),
        )
        .route(
            "/api/v1/dignometro/families/:family_id/overview",
            get(overview_handler::<R>),
        )
        .with_state(service)
}

fn error_response(err: DignometroServiceError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "assessment request failed");
    }
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), axum::Json(payload)).into_response()
}

/// Normalizes a family id the same way on every route, so reads find what writes stored.
fn resolve_family_id<R>(
    service: &DignometroService<R>,
    raw: Option<&str>,
) -> Result<FamilyId, Response>
where
    R: AssessmentRepository + 'static,
{
    service
        .guard()
        .family_id(raw.unwrap_or_default())
        .map_err(|err| error_response(err.into()))
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<DignometroService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let questions: Vec<QuestionView<'_>> = service
        .catalog()
        .list_questions()
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionView {
            step: index + 1,
            question,
        })
        .collect();

    let payload = json!({
        "questions": questions,
        "totalQuestions": service.catalog().len(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<DignometroService<R>>>,
    payload: Result<axum::Json<ScorePreviewRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let axum::Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.preview(&request.responses) {
        Ok(result) => {
            let dimensions = service.engine().describe(&result.dimension_scores);
            let body = ScorePreviewResponse {
                result,
                dimensions,
                answered: request.responses.len(),
                total_questions: service.catalog().len(),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<DignometroService<R>>>,
    payload: Result<axum::Json<SubmitAssessmentRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let axum::Json(SubmitAssessmentRequest {
        family_id,
        responses,
        assessment_date,
    }) = match payload {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    let family_id = match resolve_family_id(&service, family_id.as_deref()) {
        Ok(family_id) => family_id,
        Err(response) => return response,
    };

    let submission = AssessmentSubmission {
        family_id,
        answers: responses,
        assessment_date,
    };

    match service.submit(submission) {
        Ok(record) => {
            let payload = json!({
                "success": true,
                "score": record.score,
                "povertyLevel": record.poverty_level,
                "message": "assessment saved",
                "assessment": record,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<DignometroService<R>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let family_id = match resolve_family_id(&service, query.family_id.as_deref()) {
        Ok(family_id) => family_id,
        Err(response) => return response,
    };

    match service.history(&family_id) {
        Ok(assessments) => {
            let payload = json!({
                "success": true,
                "count": assessments.len(),
                "assessments": assessments,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<DignometroService<R>>>,
    Path(family_id): Path<String>,
    Query(query): Query<OverviewQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let family_id = match resolve_family_id(&service, Some(&family_id)) {
        Ok(family_id) => family_id,
        Err(response) => return response,
    };

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match service.overview(&family_id, today) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}
