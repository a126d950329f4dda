use std::sync::Arc;

use serde::Serialize;

use super::catalog::{Question, QuestionCatalog};
use super::domain::AnswerMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("question '{0}' is not part of the questionnaire")]
    UnknownQuestion(String),
    #[error("the questionnaire has no questions")]
    EmptyCatalog,
}

/// Progress snapshot for "step N of M" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentProgress {
    pub current_step: usize,
    pub total_steps: usize,
    pub completed_steps: usize,
}

/// Question-by-question walk through a catalog.
///
/// Steps are zero based. Navigation is clamped to the catalog bounds, and answers can be
/// given in any order and overwritten until the session is consumed.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    catalog: Arc<QuestionCatalog>,
    current_step: usize,
    answers: AnswerMap,
}

impl AssessmentSession {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            current_step: 0,
            answers: AnswerMap::new(),
        }
    }

    /// Resumes a session with answers collected earlier; unknown ids are rejected.
    pub fn resume(
        catalog: Arc<QuestionCatalog>,
        answers: AnswerMap,
        step: usize,
    ) -> Result<Self, SessionError> {
        if let Some(unknown) = answers
            .question_ids()
            .find(|id| catalog.find_by_id(id).is_none())
        {
            return Err(SessionError::UnknownQuestion(unknown.to_string()));
        }

        let mut session = Self {
            catalog,
            current_step: 0,
            answers,
        };
        session.go_to_step(step);
        Ok(session)
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.catalog.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.list_questions().get(self.current_step)
    }

    pub fn can_go_next(&self) -> bool {
        self.current_step + 1 < self.total_steps()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_step > 0
    }

    pub fn next_step(&mut self) -> bool {
        if self.can_go_next() {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_step(&mut self) -> bool {
        if self.can_go_previous() {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `step`; out-of-range steps leave the position unchanged.
    pub fn go_to_step(&mut self, step: usize) -> bool {
        if step < self.total_steps() {
            self.current_step = step;
            true
        } else {
            false
        }
    }

    /// Records an answer, returning the one it replaced.
    pub fn answer(&mut self, question_id: &str, answer: bool) -> Result<Option<bool>, SessionError> {
        if self.catalog.find_by_id(question_id).is_none() {
            return Err(SessionError::UnknownQuestion(question_id.to_string()));
        }
        Ok(self.answers.insert(question_id, answer))
    }

    pub fn answer_current(&mut self, answer: bool) -> Result<Option<bool>, SessionError> {
        let question_id = self
            .current_question()
            .map(|question| question.id.clone())
            .ok_or(SessionError::EmptyCatalog)?;
        Ok(self.answers.insert(question_id, answer))
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains(question_id)
    }

    pub fn is_complete(&self) -> bool {
        self.catalog
            .question_ids()
            .all(|id| self.answers.contains(id))
    }

    pub fn progress(&self) -> AssessmentProgress {
        AssessmentProgress {
            current_step: self.current_step,
            total_steps: self.total_steps(),
            completed_steps: self.answers.len(),
        }
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn into_answers(self) -> AnswerMap {
        self.answers
    }
}
