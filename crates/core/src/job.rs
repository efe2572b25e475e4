// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job postings

use crate::validation::{require, require_id, UnknownVariant, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Whether a job is accepting candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Archived,
}

impl JobStatus {
    pub const ALL: [JobStatus; 2] = [JobStatus::Active, JobStatus::Archived];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
        }
    }

    /// The other status (archive an active job, reactivate an archived one)
    pub fn toggled(self) -> Self {
        match self {
            JobStatus::Active => JobStatus::Archived,
            JobStatus::Archived => JobStatus::Active,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("job status", s, &["active", "archived"]))
    }
}

/// A job posting.
///
/// `order` is the job's 1-based position on the jobs board. Across all jobs
/// the orders form a dense permutation of `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: JobStatus,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Title and slug are required
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", &self.id)?;
        require("title", &self.title)?;
        require("slug", &self.slug)?;
        Ok(())
    }

    pub fn with_status(&self, status: JobStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_order(&self, order: u32) -> Self {
        Self {
            order,
            ..self.clone()
        }
    }
}

/// User input for a new job, before an id, order and timestamp are assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    pub id: Option<String>,
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    pub status: JobStatus,
    pub tags: BTreeSet<String>,
    pub description: String,
}

impl JobDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    pub fn with_slug(self, slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..self
        }
    }

    pub fn with_status(self, status: JobStatus) -> Self {
        Self { status, ..self }
    }

    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// The slug this draft will be saved with
    pub fn effective_slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&self.title),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = &self.id {
            require_id("id", id)?;
        }
        require("title", &self.title)?;
        require("slug", &self.effective_slug())?;
        Ok(())
    }

    /// Build the job; the caller supplies identity, position and timestamp
    pub fn into_job(self, id: String, order: u32, created_at: DateTime<Utc>) -> Job {
        let slug = self.effective_slug();
        Job {
            id,
            title: self.title.trim().to_string(),
            slug,
            status: self.status,
            tags: self.tags,
            order,
            description: self.description,
            created_at,
        }
    }
}

/// Lowercase the title and collapse every run of non-alphanumerics to `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
