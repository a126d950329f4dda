use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the family that owns an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to a stored assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Yes/no answers keyed by question id (`true` is "Sim").
///
/// Keys are kept sorted so that scoring and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, bool>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, returning the previous one for the same question.
    pub fn insert(&mut self, question_id: impl Into<String>, answer: bool) -> Option<bool> {
        self.0.insert(question_id.into(), answer)
    }

    pub fn get(&self, question_id: &str) -> Option<bool> {
        self.0.get(question_id).copied()
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.0.values().filter(|answer| **answer).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.0.iter().map(|(id, answer)| (id.as_str(), *answer))
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, answer)| (id.into(), answer)).collect())
    }
}

pub(crate) const LOW_POVERTY_THRESHOLD: f64 = 7.0;
pub(crate) const MEDIUM_POVERTY_THRESHOLD: f64 = 4.0;

/// Poverty band derived from the 0-10 score. A higher score means a lower band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PovertyLevel {
    #[serde(rename = "Baixo")]
    Low,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl PovertyLevel {
    /// Thresholds are checked from the top band down; the first match wins.
    pub fn from_score(score: f64) -> Self {
        if score >= LOW_POVERTY_THRESHOLD {
            PovertyLevel::Low
        } else if score >= MEDIUM_POVERTY_THRESHOLD {
            PovertyLevel::Medium
        } else {
            PovertyLevel::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PovertyLevel::Low => "Baixo",
            PovertyLevel::Medium => "Médio",
            PovertyLevel::High => "Alto",
        }
    }
}

impl fmt::Display for PovertyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
