use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerMap, FamilyId};

/// Whether a submission must answer every catalog question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessPolicy {
    /// Partial maps are scored against the answers actually given.
    #[default]
    Permissive,
    Strict,
}

impl CompletenessPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" | "partial" => Some(Self::Permissive),
            "strict" | "complete" => Some(Self::Strict),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CompletenessPolicy::Permissive => "permissive",
            CompletenessPolicy::Strict => "strict",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("familyId is required")]
    BlankFamilyId,
    #[error("answers reference unknown question ids: {}", .0.join(", "))]
    UnknownQuestions(Vec<String>),
    #[error("assessment is incomplete, missing answers for: {}", .0.join(", "))]
    MissingQuestions(Vec<String>),
}

/// Checks submissions against the catalog before they reach the scoring engine.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    catalog: Arc<QuestionCatalog>,
    policy: CompletenessPolicy,
}

impl SubmissionGuard {
    pub fn new(catalog: Arc<QuestionCatalog>, policy: CompletenessPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn policy(&self) -> CompletenessPolicy {
        self.policy
    }

    pub fn family_id(&self, raw: &str) -> Result<FamilyId, SubmissionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SubmissionError::BlankFamilyId);
        }
        Ok(FamilyId(trimmed.to_string()))
    }

    pub fn check(&self, answers: &AnswerMap) -> Result<(), SubmissionError> {
        let unknown: Vec<String> = answers
            .question_ids()
            .filter(|id| self.catalog.find_by_id(id).is_none())
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(SubmissionError::UnknownQuestions(unknown));
        }

        if self.policy == CompletenessPolicy::Strict {
            let missing: Vec<String> = self
                .catalog
                .question_ids()
                .filter(|id| !answers.contains(id))
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(SubmissionError::MissingQuestions(missing));
            }
        }

        Ok(())
    }
}
