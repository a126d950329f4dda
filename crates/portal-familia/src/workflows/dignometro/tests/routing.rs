use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::dignometro::router::{submit_handler, SubmitAssessmentRequest};
use crate::workflows::dignometro::{CompletenessPolicy, DignometroService};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn questions_route_lists_catalog_in_order() {
    let (service, _) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/dignometro/questions"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["totalQuestions"], 10);
    assert_eq!(payload["questions"][0]["id"], "moradia");
    assert_eq!(payload["questions"][0]["step"], 1);
    assert_eq!(payload["questions"][9]["dimension"], "Bens e Conectividade");
}

#[tokio::test]
async fn submit_route_creates_assessment() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({
        "familyId": "fam-001",
        "responses": answers_with_positives(4),
        "assessmentDate": "2025-09-24",
    });
    let response = router
        .oneshot(json_request("POST", "/api/v1/dignometro/assessments", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["score"], 4.0);
    assert_eq!(payload["povertyLevel"], "Médio");
    assert_eq!(payload["assessment"]["family_id"], "fam-001");
    assert_eq!(payload["assessment"]["poverty_score"], 4.0);
    assert_eq!(payload["assessment"]["assessment_date"], "2025-09-24");
    assert_eq!(payload["assessment"]["answers"]["moradia"], true);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_route_requires_family_id() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({ "responses": { "moradia": true } });
    let response = router
        .oneshot(json_request("POST", "/api/v1/dignometro/assessments", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "familyId is required");
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn submit_handler_maps_validation_errors_to_unprocessable() {
    let (service, _) = build_service(CompletenessPolicy::Strict);
    let request = SubmitAssessmentRequest {
        family_id: Some("fam-001".to_string()),
        responses: [("moradia", true)].into_iter().collect(),
        assessment_date: None,
    };

    let response = submit_handler(State(Arc::new(service)), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("incomplete"));
}

#[tokio::test]
async fn submit_handler_reports_storage_outage_as_retryable() {
    let service = Arc::new(DignometroService::new(
        catalog(),
        Arc::new(UnavailableRepository),
        CompletenessPolicy::Permissive,
    ));
    let request = SubmitAssessmentRequest {
        family_id: Some("fam-001".to_string()),
        responses: answers_with_positives(5),
        assessment_date: None,
    };

    let response = submit_handler::<UnavailableRepository>(State(service), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(DignometroService::new(
        catalog(),
        Arc::new(ConflictRepository),
        CompletenessPolicy::Permissive,
    ));
    let request = SubmitAssessmentRequest {
        family_id: Some("fam-001".to_string()),
        responses: answers_with_positives(5),
        assessment_date: None,
    };

    let response = submit_handler::<ConflictRepository>(State(service), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn history_route_returns_newest_first() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    repository.seed(stored_record("dig-a", 2, date(2025, 1, 10), timestamp(2025, 1, 10, 9)));
    repository.seed(stored_record("dig-b", 9, date(2025, 5, 2), timestamp(2025, 5, 2, 8)));
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/dignometro/assessments?familyId=fam-001"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["count"], 2);
    assert_eq!(payload["assessments"][0]["id"], "dig-b");
    assert_eq!(payload["assessments"][0]["poverty_level"], "Baixo");
    assert_eq!(payload["assessments"][1]["id"], "dig-a");
}

#[tokio::test]
async fn history_route_requires_family_id() {
    let (service, _) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/dignometro/assessments"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn score_route_previews_without_storing() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({ "responses": { "moradia": true, "agua": false } });
    let response = router
        .oneshot(json_request("POST", "/api/v1/dignometro/score", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], 5.0);
    assert_eq!(payload["povertyLevel"], "Médio");
    assert_eq!(payload["answered"], 2);
    assert_eq!(payload["totalQuestions"], 10);
    assert_eq!(payload["dimensions"][0]["dimension"], "Moradia");
    assert_eq!(payload["dimensions"][1]["passed"], false);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn score_route_rejects_unknown_ids() {
    let (service, _) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({ "responses": { "transporte": true } });
    let response = router
        .oneshot(json_request("POST", "/api/v1/dignometro/score", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn overview_route_uses_supplied_today() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    repository.seed(stored_record("dig-a", 3, date(2025, 1, 10), timestamp(2025, 1, 10, 9)));
    repository.seed(stored_record("dig-b", 8, date(2025, 2, 10), timestamp(2025, 2, 10, 9)));
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/dignometro/families/fam-001/overview?today=2025-02-20",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["familyId"], "fam-001");
    assert_eq!(payload["totalAssessments"], 2);
    assert_eq!(payload["daysSinceLastAssessment"], 10);
    assert_eq!(payload["trend"], "improving");
    assert_eq!(payload["latestAssessment"]["id"], "dig-b");
    assert_eq!(payload["latestAssessment"]["dimensions"][0]["questionId"], "moradia");
}

#[tokio::test]
async fn padded_family_id_reads_what_submit_stored() {
    let (service, _) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({
        "familyId": "  fam-001 ",
        "responses": answers_with_positives(7),
    });
    let created = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/dignometro/assessments", body))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload["assessment"]["family_id"], "fam-001");

    let history = router
        .clone()
        .oneshot(get_request(
            "/api/v1/dignometro/assessments?familyId=fam-001%20",
        ))
        .await
        .expect("route executes");
    assert_eq!(history.status(), StatusCode::OK);
    let payload = read_json_body(history).await;
    assert_eq!(payload["count"], 1);

    let overview = router
        .oneshot(get_request(
            "/api/v1/dignometro/families/%20fam-001/overview?today=2025-02-20",
        ))
        .await
        .expect("route executes");
    assert_eq!(overview.status(), StatusCode::OK);
    let payload = read_json_body(overview).await;
    assert_eq!(payload["familyId"], "fam-001");
    assert_eq!(payload["totalAssessments"], 1);
}

#[tokio::test]
async fn blank_family_id_in_history_query_is_rejected() {
    let (service, _) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/dignometro/assessments?familyId=%20%20"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "familyId is required");
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let (service, repository) = build_service(CompletenessPolicy::Permissive);
    let router = router_with_service(service);

    let body = json!({ "familyId": "fam-001", "responses": { "moradia": "talvez" } });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/dignometro/assessments", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some_and(|text| !text.is_empty()));
    assert_eq!(repository.len(), 0);

    let missing_content_type = Request::builder()
        .method("POST")
        .uri("/api/v1/dignometro/score")
        .body(Body::from("{}"))
        .expect("request builds");
    let response = router
        .oneshot(missing_content_type)
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
}
