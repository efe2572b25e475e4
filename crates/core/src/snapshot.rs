// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable application state and entity-level change sets.
//!
//! A [`Snapshot`] is never mutated in place. Applying a list of [`Change`]s
//! produces a new snapshot; applying the inverted list restores the touched
//! entities to their recorded `before` values.

use crate::assessment::{Assessment, CandidateResponse};
use crate::candidate::{Candidate, Stage};
use crate::job::{Job, JobStatus};
use std::collections::BTreeMap;

/// Everything the pipeline knows, as one value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    jobs: BTreeMap<String, Job>,
    candidates: BTreeMap<String, Candidate>,
    assessments: BTreeMap<String, Assessment>,
    responses: BTreeMap<String, CandidateResponse>,
}

/// One entity's value before and after a mutation.
///
/// `None` means the entity does not exist on that side, so an insert has
/// `before: None` and a delete has `after: None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Job {
        id: String,
        before: Option<Job>,
        after: Option<Job>,
    },
    Candidate {
        id: String,
        before: Option<Candidate>,
        after: Option<Candidate>,
    },
    Assessment {
        job_id: String,
        before: Option<Assessment>,
        after: Option<Assessment>,
    },
    Response {
        id: String,
        before: Option<CandidateResponse>,
        after: Option<CandidateResponse>,
    },
}

impl Change {
    pub fn put_job(before: Option<&Job>, after: Job) -> Self {
        Change::Job {
            id: after.id.clone(),
            before: before.cloned(),
            after: Some(after),
        }
    }

    pub fn remove_job(before: &Job) -> Self {
        Change::Job {
            id: before.id.clone(),
            before: Some(before.clone()),
            after: None,
        }
    }

    pub fn put_candidate(before: Option<&Candidate>, after: Candidate) -> Self {
        Change::Candidate {
            id: after.id.clone(),
            before: before.cloned(),
            after: Some(after),
        }
    }

    pub fn remove_candidate(before: &Candidate) -> Self {
        Change::Candidate {
            id: before.id.clone(),
            before: Some(before.clone()),
            after: None,
        }
    }

    pub fn put_assessment(before: Option<&Assessment>, after: Assessment) -> Self {
        Change::Assessment {
            job_id: after.job_id.clone(),
            before: before.cloned(),
            after: Some(after),
        }
    }

    pub fn remove_assessment(before: &Assessment) -> Self {
        Change::Assessment {
            job_id: before.job_id.clone(),
            before: Some(before.clone()),
            after: None,
        }
    }

    pub fn put_response(before: Option<&CandidateResponse>, after: CandidateResponse) -> Self {
        Change::Response {
            id: after.id.clone(),
            before: before.cloned(),
            after: Some(after),
        }
    }

    pub fn remove_response(before: &CandidateResponse) -> Self {
        Change::Response {
            id: before.id.clone(),
            before: Some(before.clone()),
            after: None,
        }
    }

    /// The change that undoes this one
    pub fn inverse(&self) -> Self {
        match self {
            Change::Job { id, before, after } => Change::Job {
                id: id.clone(),
                before: after.clone(),
                after: before.clone(),
            },
            Change::Candidate { id, before, after } => Change::Candidate {
                id: id.clone(),
                before: after.clone(),
                after: before.clone(),
            },
            Change::Assessment {
                job_id,
                before,
                after,
            } => Change::Assessment {
                job_id: job_id.clone(),
                before: after.clone(),
                after: before.clone(),
            },
            Change::Response { id, before, after } => Change::Response {
                id: id.clone(),
                before: after.clone(),
                after: before.clone(),
            },
        }
    }

    /// Entity kind and key, for logging
    pub fn key(&self) -> (&'static str, &str) {
        match self {
            Change::Job { id, .. } => ("job", id),
            Change::Candidate { id, .. } => ("candidate", id),
            Change::Assessment { job_id, .. } => ("assessment", job_id),
            Change::Response { id, .. } => ("response", id),
        }
    }
}

/// Undo a change list: inverses, last change first
pub fn invert(changes: &[Change]) -> Vec<Change> {
    changes.iter().rev().map(Change::inverse).collect()
}

/// Jobs board filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// `None` shows every status
    pub status: Option<JobStatus>,
    /// Case-insensitive substring of the title; empty matches everything
    pub search: String,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        self.search.is_empty() || contains_ignore_case(&job.title, &self.search)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Snapshot {
    pub fn new(
        jobs: Vec<Job>,
        candidates: Vec<Candidate>,
        assessments: Vec<Assessment>,
        responses: Vec<CandidateResponse>,
    ) -> Self {
        Self {
            jobs: jobs.into_iter().map(|j| (j.id.clone(), j)).collect(),
            candidates: candidates.into_iter().map(|c| (c.id.clone(), c)).collect(),
            assessments: assessments
                .into_iter()
                .map(|a| (a.job_id.clone(), a))
                .collect(),
            responses: responses.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn assessment(&self, job_id: &str) -> Option<&Assessment> {
        self.assessments.get(job_id)
    }

    pub fn response(&self, id: &str) -> Option<&CandidateResponse> {
        self.responses.get(id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn assessments(&self) -> impl Iterator<Item = &Assessment> {
        self.assessments.values()
    }

    pub fn responses(&self) -> impl Iterator<Item = &CandidateResponse> {
        self.responses.values()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn assessment_count(&self) -> usize {
        self.assessments.len()
    }

    /// Jobs in board order
    pub fn jobs_by_order(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().collect();
        jobs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        jobs
    }

    /// Owned copy of the jobs in board order
    pub fn job_list(&self) -> Vec<Job> {
        self.jobs_by_order().into_iter().cloned().collect()
    }

    pub fn filter_jobs(&self, filter: &JobFilter) -> Vec<&Job> {
        self.jobs_by_order()
            .into_iter()
            .filter(|job| filter.matches(job))
            .collect()
    }

    pub fn candidates_for_job(&self, job_id: &str) -> Vec<&Candidate> {
        self.candidates
            .values()
            .filter(|c| c.job_id == job_id)
            .collect()
    }

    pub fn responses_for_job(&self, job_id: &str) -> Vec<&CandidateResponse> {
        self.responses
            .values()
            .filter(|r| r.job_id == job_id)
            .collect()
    }

    /// Kanban columns: every stage is present, possibly empty.
    ///
    /// `search` matches name or email, case-insensitively.
    pub fn candidates_by_stage(
        &self,
        job_id: Option<&str>,
        search: &str,
    ) -> BTreeMap<Stage, Vec<&Candidate>> {
        let mut columns: BTreeMap<Stage, Vec<&Candidate>> =
            Stage::ALL.into_iter().map(|s| (s, Vec::new())).collect();
        for candidate in self.candidates.values() {
            if job_id.is_some_and(|id| id != candidate.job_id) {
                continue;
            }
            if !search.is_empty()
                && !contains_ignore_case(&candidate.name, search)
                && !contains_ignore_case(&candidate.email, search)
            {
                continue;
            }
            columns.entry(candidate.stage).or_default().push(candidate);
        }
        columns
    }

    /// A new snapshot with every change's `after` value in place
    pub fn apply(&self, changes: &[Change]) -> Snapshot {
        let mut next = self.clone();
        for change in changes {
            match change {
                Change::Job { id, after, .. } => set(&mut next.jobs, id, after),
                Change::Candidate { id, after, .. } => set(&mut next.candidates, id, after),
                Change::Assessment { job_id, after, .. } => {
                    set(&mut next.assessments, job_id, after)
                }
                Change::Response { id, after, .. } => set(&mut next.responses, id, after),
            }
        }
        next
    }
}

fn set<T: Clone>(map: &mut BTreeMap<String, T>, key: &str, value: &Option<T>) {
    match value {
        Some(v) => {
            map.insert(key.to_string(), v.clone());
        }
        None => {
            map.remove(key);
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
