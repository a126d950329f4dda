use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerMap, AssessmentId, FamilyId, PovertyLevel};

/// Stored assessment. Field names follow the assessment table so rows round-trip unchanged.
///
/// Records are never updated: a new questionnaire produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub family_id: FamilyId,
    pub answers: AnswerMap,
    #[serde(rename = "poverty_score")]
    pub score: f64,
    pub poverty_level: PovertyLevel,
    pub dimension_scores: BTreeMap<String, u8>,
    pub assessment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// "Latest first": assessment date descending, then creation time descending.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.assessment_date
            .cmp(&a.assessment_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    }
}

pub fn sort_newest_first(records: &mut [AssessmentRecord]) {
    records.sort_by(AssessmentRecord::newest_first);
}

/// Storage abstraction for assessment history.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;

    /// All records for a family, newest first.
    fn history(&self, family_id: &FamilyId) -> Result<Vec<AssessmentRecord>, RepositoryError>;

    fn latest(&self, family_id: &FamilyId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(self.history(family_id)?.into_iter().next())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessment already exists")]
    Conflict,
    #[error("assessment storage unavailable: {0}")]
    Unavailable(String),
}
