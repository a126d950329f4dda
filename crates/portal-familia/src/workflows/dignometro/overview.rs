use chrono::NaiveDate;
use serde::Serialize;

use super::domain::FamilyId;
use super::repository::AssessmentRecord;
use super::scoring::{DimensionOutcome, ScoringEngine};

const TREND_TOLERANCE: f64 = 1e-9;

/// Direction of the two most recent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrend {
    Improving,
    Declining,
    Stable,
}

impl ScoreTrend {
    fn between(previous: f64, latest: f64) -> Self {
        let delta = latest - previous;
        if delta > TREND_TOLERANCE {
            ScoreTrend::Improving
        } else if delta < -TREND_TOLERANCE {
            ScoreTrend::Declining
        } else {
            ScoreTrend::Stable
        }
    }
}

/// A stored record with its dimension names resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    #[serde(flatten)]
    pub record: AssessmentRecord,
    pub dimensions: Vec<DimensionOutcome>,
}

impl AssessmentView {
    pub fn new(record: AssessmentRecord, engine: &ScoringEngine) -> Self {
        let dimensions = engine.describe(&record.dimension_scores);
        Self { record, dimensions }
    }
}

/// Dashboard summary of a family's assessment history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyAssessmentOverview {
    pub family_id: FamilyId,
    pub total_assessments: usize,
    pub first_assessment_date: Option<NaiveDate>,
    pub last_assessment_date: Option<NaiveDate>,
    pub days_since_last_assessment: Option<i64>,
    pub latest_assessment: Option<AssessmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<ScoreTrend>,
}

impl FamilyAssessmentOverview {
    /// Builds the summary from a newest-first history.
    pub fn from_history(
        family_id: FamilyId,
        history: &[AssessmentRecord],
        engine: &ScoringEngine,
        today: NaiveDate,
    ) -> Self {
        let latest = history.first();
        let last_assessment_date = latest.map(|record| record.assessment_date);
        let first_assessment_date = history.iter().map(|record| record.assessment_date).min();

        let trend = match history {
            [latest, previous, ..] => Some(ScoreTrend::between(previous.score, latest.score)),
            _ => None,
        };

        Self {
            family_id,
            total_assessments: history.len(),
            first_assessment_date,
            last_assessment_date,
            days_since_last_assessment: last_assessment_date
                .map(|date| today.signed_duration_since(date).num_days()),
            latest_assessment: latest.cloned().map(|record| AssessmentView::new(record, engine)),
            trend,
        }
    }
}
