// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Candidates moving through the hiring stages

use crate::validation::{require, UnknownVariant, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hiring stage, in board column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screen,
        Stage::Tech,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
                UnknownVariant::new("stage", s, &names)
            })
    }
}

/// One stage transition in a candidate's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: Stage,
    pub timestamp: DateTime<Utc>,
}

/// A reviewer note on a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Note {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        require("note", content)?;
        Ok(Self {
            id: id.into(),
            author: author.into(),
            content: content.trim().to_string(),
            timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Weak reference; only `delete_job` cascades through it
    pub job_id: String,
    pub stage: Stage,
    pub applied_date: DateTime<Utc>,
    /// Append-only, oldest first
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    /// Newest first
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Candidate {
    /// A fresh applicant with a single `applied` timeline entry
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        job_id: impl Into<String>,
        applied_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            job_id: job_id.into(),
            stage: Stage::Applied,
            applied_date,
            timeline: vec![TimelineEntry {
                status: Stage::Applied,
                timestamp: applied_date,
            }],
            notes: Vec::new(),
        }
    }

    /// Move to `stage`, recording the transition.
    ///
    /// Moving to the current stage returns an unchanged copy.
    pub fn with_stage(&self, stage: Stage, at: DateTime<Utc>) -> Self {
        if stage == self.stage {
            return self.clone();
        }
        let mut timeline = self.timeline.clone();
        timeline.push(TimelineEntry {
            status: stage,
            timestamp: at,
        });
        Self {
            stage,
            timeline,
            ..self.clone()
        }
    }

    pub fn with_note(&self, note: Note) -> Self {
        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.push(note);
        notes.extend(self.notes.iter().cloned());
        Self {
            notes,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "candidate_tests.rs"]
mod tests;
