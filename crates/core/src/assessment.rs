// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assessments attached to jobs, and candidates' submitted answers

use crate::validation::{require, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// At most one assessment exists per job; it is keyed by `job_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub job_id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Question type with its type-specific settings.
///
/// Stored with a `type` tag (`single_choice`, `numeric_range`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
    },
    MultiChoice {
        options: Vec<String>,
    },
    ShortText,
    LongText {
        #[serde(rename = "maxLength")]
        max_length: usize,
    },
    NumericRange {
        min: i64,
        max: i64,
    },
    FileUploadStub,
}

impl Question {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            kind,
        }
    }

    pub fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::question(&self.id, "label is required"));
        }
        match &self.kind {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                if options.is_empty() {
                    return Err(ValidationError::question(&self.id, "needs at least one option"));
                }
                if options.iter().any(|o| o.trim().is_empty()) {
                    return Err(ValidationError::question(&self.id, "options must not be blank"));
                }
            }
            QuestionKind::LongText { max_length } if *max_length == 0 => {
                return Err(ValidationError::question(&self.id, "maxLength must be positive"));
            }
            QuestionKind::NumericRange { min, max } if min > max => {
                return Err(ValidationError::question(
                    &self.id,
                    format!("min {} exceeds max {}", min, max),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn check_answer(&self, answer: Option<&Answer>) -> Result<(), ValidationError> {
        let answer = match answer {
            Some(a) if !a.is_blank() => a,
            _ if self.required => return Err(ValidationError::answer(&self.id, "required")),
            _ => return Ok(()),
        };

        match (&self.kind, answer) {
            (QuestionKind::SingleChoice { options }, Answer::Text(choice)) => {
                if !options.contains(choice) {
                    return Err(ValidationError::answer(
                        &self.id,
                        format!("'{}' is not an option", choice),
                    ));
                }
            }
            (QuestionKind::MultiChoice { options }, Answer::Choices(choices)) => {
                if let Some(bad) = choices.iter().find(|c| !options.contains(c)) {
                    return Err(ValidationError::answer(
                        &self.id,
                        format!("'{}' is not an option", bad),
                    ));
                }
            }
            (QuestionKind::ShortText, Answer::Text(_))
            | (QuestionKind::FileUploadStub, Answer::Text(_)) => {}
            (QuestionKind::LongText { max_length }, Answer::Text(text)) => {
                let len = text.chars().count();
                if len > *max_length {
                    return Err(ValidationError::answer(
                        &self.id,
                        format!("{} characters exceeds maxLength {}", len, max_length),
                    ));
                }
            }
            (QuestionKind::NumericRange { min, max }, Answer::Number(n)) => {
                if *n < *min as f64 || *n > *max as f64 {
                    return Err(ValidationError::answer(
                        &self.id,
                        format!("{} is outside {}..={}", n, min, max),
                    ));
                }
            }
            (_, other) => {
                return Err(ValidationError::answer(
                    &self.id,
                    format!("unexpected {} answer", other.kind_name()),
                ));
            }
        }
        Ok(())
    }
}

impl Assessment {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Structural checks run before an assessment is saved
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("job id", &self.job_id)?;
        require("title", &self.title)?;

        let mut seen = BTreeSet::new();
        for question in self.questions() {
            if !seen.insert(question.id.as_str()) {
                return Err(ValidationError::question(&question.id, "duplicate question id"));
            }
            question.validate()?;
        }
        Ok(())
    }

    /// Check a candidate's answers against every question
    pub fn validate_answers(
        &self,
        answers: &BTreeMap<String, Answer>,
    ) -> Result<(), ValidationError> {
        if let Some(unknown) = answers
            .keys()
            .find(|id| !self.questions().any(|q| &q.id == *id))
        {
            return Err(ValidationError::answer(unknown, "no such question"));
        }
        for question in self.questions() {
            question.check_answer(answers.get(&question.id))?;
        }
        Ok(())
    }
}

/// A single answer value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl Answer {
    fn is_blank(&self) -> bool {
        match self {
            Answer::Number(_) => false,
            Answer::Text(text) => text.trim().is_empty(),
            Answer::Choices(choices) => choices.is_empty(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Answer::Number(_) => "numeric",
            Answer::Text(_) => "text",
            Answer::Choices(_) => "multi-choice",
        }
    }
}

/// A candidate's submitted answers to a job's assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: String,
    pub job_id: String,
    pub candidate_id: String,
    pub responses: BTreeMap<String, Answer>,
    pub submitted_at: DateTime<Utc>,
}

impl CandidateResponse {
    pub fn new(
        job_id: impl Into<String>,
        candidate_id: impl Into<String>,
        responses: BTreeMap<String, Answer>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let job_id = job_id.into();
        let candidate_id = candidate_id.into();
        Self {
            id: Self::id_for(&job_id, &candidate_id),
            job_id,
            candidate_id,
            responses,
            submitted_at,
        }
    }

    /// Composite key: one response per (job, candidate)
    pub fn id_for(job_id: &str, candidate_id: &str) -> String {
        format!("{}-{}", job_id, candidate_id)
    }
}

#[cfg(test)]
#[path = "assessment_tests.rs"]
mod tests;
