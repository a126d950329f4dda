//! Dignômetro questionnaire: catalog, scoring, intake validation and assessment history.
//!
//! The scoring engine is a pure function over an [`AnswerMap`]. Everything around it
//! (submission checks, storage, history, the HTTP surface) composes that function with
//! an injected [`QuestionCatalog`] and an [`AssessmentRepository`] implementation.

pub mod catalog;
pub mod domain;
pub(crate) mod intake;
pub mod overview;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, Question, QuestionCatalog};
pub use domain::{AnswerMap, AssessmentId, FamilyId, PovertyLevel};
pub use intake::{CompletenessPolicy, SubmissionError, SubmissionGuard};
pub use overview::{AssessmentView, FamilyAssessmentOverview, ScoreTrend};
pub use repository::{sort_newest_first, AssessmentRecord, AssessmentRepository, RepositoryError};
pub use router::dignometro_router;
pub use scoring::{score_answers, DimensionOutcome, ScoreResult, ScoringEngine};
pub use service::{AssessmentSubmission, DignometroService, DignometroServiceError};
pub use session::{AssessmentProgress, AssessmentSession, SessionError};
