use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::dignometro::catalog::QuestionCatalog;
use crate::workflows::dignometro::domain::{AnswerMap, AssessmentId, FamilyId};
use crate::workflows::dignometro::repository::{
    AssessmentRecord, AssessmentRepository, RepositoryError,
};
use crate::workflows::dignometro::scoring::score_answers;
use crate::workflows::dignometro::{dignometro_router, CompletenessPolicy, DignometroService};

pub(super) const STANDARD_IDS: [&str; 10] = [
    "moradia",
    "agua",
    "saneamento",
    "educacao",
    "saude",
    "alimentacao",
    "renda_diversificada",
    "renda_estavel",
    "poupanca",
    "bens_conectividade",
];

/// A complete answer map whose first `positives` catalog questions are answered "Sim".
pub(super) fn answers_with_positives(positives: usize) -> AnswerMap {
    STANDARD_IDS
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index < positives))
        .collect()
}

pub(super) fn catalog() -> Arc<QuestionCatalog> {
    Arc::new(QuestionCatalog::standard())
}

pub(super) fn family() -> FamilyId {
    FamilyId("fam-001".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn timestamp(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn stored_record(
    id: &str,
    positives: usize,
    assessment_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> AssessmentRecord {
    let answers = answers_with_positives(positives);
    let result = score_answers(&answers);
    AssessmentRecord {
        id: AssessmentId(id.to_string()),
        family_id: family(),
        answers,
        score: result.score,
        poverty_level: result.poverty_level,
        dimension_scores: result.dimension_scores,
        assessment_date,
        created_at,
    }
}

pub(super) fn build_service(
    policy: CompletenessPolicy,
) -> (DignometroService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = DignometroService::new(catalog(), repository.clone(), policy);
    (service, repository)
}

/// Append-only store that returns rows in insertion order, leaving sorting to callers.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: AssessmentRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn history(&self, family_id: &FamilyId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.family_id == family_id)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn history(&self, _family_id: &FamilyId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _family_id: &FamilyId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(service: DignometroService<MemoryRepository>) -> axum::Router {
    dignometro_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
