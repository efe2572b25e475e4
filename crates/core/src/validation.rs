// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation failures raised before any mutation is attempted

use thiserror::Error;

/// Input rejected before it reaches state or the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("invalid question {question}: {reason}")]
    Question { question: String, reason: String },
    #[error("invalid answer to {question}: {reason}")]
    Answer { question: String, reason: String },
    #[error("{field} is longer than {max} bytes")]
    TooLong { field: &'static str, max: usize },
    #[error("candidate {candidate_id} did not apply to job {job_id}")]
    WrongJob { candidate_id: String, job_id: String },
}

impl ValidationError {
    pub(crate) fn question(question: &str, reason: impl Into<String>) -> Self {
        Self::Question {
            question: question.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn answer(question: &str, reason: impl Into<String>) -> Self {
        Self::Answer {
            question: question.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reject a blank value for a required field
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Longest accepted entity id. A response key joins two ids, and every
/// key must still fit a file name once escaped.
pub const MAX_ID_BYTES: usize = 40;

/// Reject a blank or oversized id
pub(crate) fn require_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    if value.len() > MAX_ID_BYTES {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_ID_BYTES,
        });
    }
    Ok(())
}

/// A string that names no known variant of a closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}
