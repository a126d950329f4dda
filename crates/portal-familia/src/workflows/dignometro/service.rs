use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerMap, AssessmentId, FamilyId};
use super::intake::{CompletenessPolicy, SubmissionError, SubmissionGuard};
use super::overview::FamilyAssessmentOverview;
use super::repository::{
    sort_newest_first, AssessmentRecord, AssessmentRepository, RepositoryError,
};
use super::scoring::{ScoreResult, ScoringEngine};

/// A completed questionnaire ready to be scored and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentSubmission {
    pub family_id: FamilyId,
    pub answers: AnswerMap,
    /// Defaults to the UTC calendar date of submission.
    pub assessment_date: Option<NaiveDate>,
}

/// Service composing the submission guard, scoring engine and repository.
pub struct DignometroService<R> {
    guard: Arc<SubmissionGuard>,
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("dig-{id:06}"))
}

impl<R> DignometroService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        repository: Arc<R>,
        policy: CompletenessPolicy,
    ) -> Self {
        let guard = Arc::new(SubmissionGuard::new(catalog.clone(), policy));
        let engine = Arc::new(ScoringEngine::new(catalog));

        Self {
            guard,
            engine,
            repository,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        self.engine.catalog()
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Scores answers without storing anything.
    pub fn preview(&self, answers: &AnswerMap) -> Result<ScoreResult, DignometroServiceError> {
        self.guard.check(answers)?;
        Ok(self.engine.score(answers))
    }

    /// Validate, score and persist a new assessment.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, DignometroServiceError> {
        let AssessmentSubmission {
            family_id,
            answers,
            assessment_date,
        } = submission;

        let family_id = self.guard.family_id(&family_id.0)?;
        self.guard.check(&answers)?;

        let ScoreResult {
            score,
            dimension_scores,
            poverty_level,
        } = self.engine.score(&answers);

        let created_at = Utc::now();
        let record = AssessmentRecord {
            id: next_assessment_id(),
            family_id,
            answers,
            score,
            poverty_level,
            dimension_scores,
            assessment_date: assessment_date.unwrap_or_else(|| created_at.date_naive()),
            created_at,
        };

        let stored = self.repository.insert(record).map_err(|err| {
            warn!(error = %err, "failed to store assessment");
            err
        })?;

        info!(
            assessment_id = %stored.id,
            family_id = %stored.family_id,
            score = stored.score,
            poverty_level = %stored.poverty_level,
            answered = stored.answers.len(),
            "assessment stored"
        );

        Ok(stored)
    }

    /// Assessment history for a family, newest first.
    pub fn history(
        &self,
        family_id: &FamilyId,
    ) -> Result<Vec<AssessmentRecord>, DignometroServiceError> {
        let mut records = self.repository.history(family_id)?;
        sort_newest_first(&mut records);
        debug!(family_id = %family_id, count = records.len(), "loaded assessment history");
        Ok(records)
    }

    pub fn latest(
        &self,
        family_id: &FamilyId,
    ) -> Result<Option<AssessmentRecord>, DignometroServiceError> {
        Ok(self.history(family_id)?.into_iter().next())
    }

    pub fn overview(
        &self,
        family_id: &FamilyId,
        today: NaiveDate,
    ) -> Result<FamilyAssessmentOverview, DignometroServiceError> {
        let history = self.history(family_id)?;
        Ok(FamilyAssessmentOverview::from_history(
            family_id.clone(),
            &history,
            &self.engine,
            today,
        ))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum DignometroServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DignometroServiceError {
    /// HTTP status for API responses. Storage outages are reported as retryable.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DignometroServiceError::Submission(SubmissionError::BlankFamilyId) => {
                StatusCode::BAD_REQUEST
            }
            DignometroServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DignometroServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            DignometroServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}
