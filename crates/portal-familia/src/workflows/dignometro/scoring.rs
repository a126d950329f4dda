use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerMap, PovertyLevel};

/// Upper bound of the normalized score.
pub const MAX_SCORE: f64 = 10.0;

/// Outcome of scoring one answer map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: f64,
    pub dimension_scores: BTreeMap<String, u8>,
    pub poverty_level: PovertyLevel,
}

/// Scores an answer map relative to the number of answers it holds.
///
/// An empty map scores 0. Ids are not checked against any catalog here.
pub fn score_answers(answers: &AnswerMap) -> ScoreResult {
    let total = answers.len();
    let score = if total == 0 {
        0.0
    } else {
        (answers.positive_count() as f64 / total as f64) * MAX_SCORE
    };

    let dimension_scores = answers
        .iter()
        .map(|(id, answer)| (id.to_string(), u8::from(answer)))
        .collect();

    ScoreResult {
        score,
        dimension_scores,
        poverty_level: PovertyLevel::from_score(score),
    }
}

/// Per-question pass/fail resolved to its dimension name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionOutcome {
    pub question_id: String,
    pub dimension: String,
    pub passed: bool,
}

/// Stateless scorer bound to the catalog used for labelling results.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<QuestionCatalog>,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn score(&self, answers: &AnswerMap) -> ScoreResult {
        score_answers(answers)
    }

    /// Catalog-ordered breakdown; ids the catalog does not know keep their raw id as label
    /// and are listed last.
    pub fn describe(&self, dimension_scores: &BTreeMap<String, u8>) -> Vec<DimensionOutcome> {
        let mut outcomes: Vec<DimensionOutcome> = self
            .catalog
            .list_questions()
            .iter()
            .filter_map(|question| {
                dimension_scores
                    .get(&question.id)
                    .map(|value| DimensionOutcome {
                        question_id: question.id.clone(),
                        dimension: question.dimension.clone(),
                        passed: *value > 0,
                    })
            })
            .collect();

        outcomes.extend(
            dimension_scores
                .iter()
                .filter(|(id, _)| self.catalog.find_by_id(id).is_none())
                .map(|(id, value)| DimensionOutcome {
                    question_id: id.clone(),
                    dimension: id.clone(),
                    passed: *value > 0,
                }),
        );

        outcomes
    }
}
