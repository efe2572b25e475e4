// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic mutations with rollback.
//!
//! Every mutation runs the same protocol:
//!
//! 1. Take the locks of every entity it touches and record each entity's
//!    current value as the `before` of a [`Change`].
//! 2. Swap in a new snapshot with the `after` values.
//! 3. Await one confirmation request.
//! 4. On failure, swap the `before` values back and report the error.
//!
//! A caller that drops the future during step 3 (a timeout, a cancelled
//! task) gets the same rollback as a failed request, and the locks are
//! released only after it.
//!
//! Checks that can reject a call (validation, unknown ids, order range)
//! run before step 2, so a rejected call changes nothing and sends nothing.

use crate::error::{EngineError, MutationError};
use crate::hydrate;
use crate::locks::{KeyGuard, KeyedLocks, LockKey};
use crate::persist::{PersistStats, WriteBehind};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use tf_adapters::{NetworkAdapter, Request};
use tf_core::{
    invert, order, Answer, Assessment, Candidate, CandidateResponse, Change, Clock, IdGen, Job,
    JobDraft, Note, PersistPolicy, Snapshot, Stage, ValidationError,
};
use tf_storage::PersistentStore;

/// Confirmation traffic as seen by a UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    /// Requests sent and not yet answered
    pub in_flight: usize,
    /// Message of the most recent failure; cleared when a request starts
    pub last_error: Option<String>,
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

pub struct MutationCoordinator<N, C, I> {
    network: N,
    clock: C,
    ids: I,
    state: RwLock<Arc<Snapshot>>,
    locks: KeyedLocks,
    persister: Option<WriteBehind>,
    policy: PersistPolicy,
    status: Mutex<RequestStatus>,
}

impl<N, C, I> MutationCoordinator<N, C, I>
where
    N: NetworkAdapter,
    C: Clock,
    I: IdGen,
{
    /// In-memory coordinator over `snapshot`; nothing is persisted
    pub fn new(network: N, clock: C, ids: I, snapshot: Snapshot) -> Self {
        Self {
            network,
            clock,
            ids,
            state: RwLock::new(Arc::new(snapshot)),
            locks: KeyedLocks::new(),
            persister: None,
            policy: PersistPolicy::default(),
            status: Mutex::new(RequestStatus::default()),
        }
    }

    /// Send changes to `persister` according to `policy`
    pub fn with_persister(mut self, persister: WriteBehind, policy: PersistPolicy) -> Self {
        self.persister = Some(persister);
        self.policy = policy;
        self
    }

    /// Hydrate from `store` and persist back to it
    pub async fn open(
        store: &PersistentStore,
        network: N,
        clock: C,
        ids: I,
        policy: PersistPolicy,
    ) -> Result<Self, EngineError> {
        let snapshot = hydrate::load_snapshot(store).await?;
        let persister = WriteBehind::spawn(store.clone());
        Ok(Self::new(network, clock, ids, snapshot).with_persister(persister, policy))
    }

    // -- reads --------------------------------------------------------------

    /// Current state; cheap to clone and never changes under the caller
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn job(&self, id: &str) -> Option<Job> {
        self.snapshot().job(id).cloned()
    }

    pub fn candidate(&self, id: &str) -> Option<Candidate> {
        self.snapshot().candidate(id).cloned()
    }

    pub fn assessment(&self, job_id: &str) -> Option<Assessment> {
        self.snapshot().assessment(job_id).cloned()
    }

    pub fn status(&self) -> RequestStatus {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn persist_stats(&self) -> PersistStats {
        self.persister
            .as_ref()
            .map(WriteBehind::stats)
            .unwrap_or_default()
    }

    /// Wait for queued writes to reach the store
    pub async fn flush(&self) {
        if let Some(persister) = &self.persister {
            persister.flush().await;
        }
    }

    // -- jobs ---------------------------------------------------------------

    /// Insert a job, or replace the job with the same id.
    ///
    /// A new job is appended at `max + 1`; a replacement keeps the order
    /// already on the board, since positions only change through
    /// [`reorder_job`](Self::reorder_job).
    pub async fn update_job(&self, job: Job) -> Result<Job, MutationError> {
        job.validate()?;
        let guard = self.locks.acquire([LockKey::JobList]).await;
        let snapshot = self.snapshot();

        let (job, change) = match snapshot.job(&job.id) {
            Some(existing) => {
                let job = job.with_order(existing.order);
                (job.clone(), Change::put_job(Some(existing), job))
            }
            None => {
                let job = job.with_order(order::next_order(&snapshot.job_list()));
                (job.clone(), Change::put_job(None, job))
            }
        };

        self.confirm(guard, "update_job", json!(job), vec![change]).await?;
        Ok(job)
    }

    /// Create a job from a draft: fresh id unless the draft names one,
    /// slug from the title unless given, appended at `max + 1`
    pub async fn create_job(&self, draft: JobDraft) -> Result<Job, MutationError> {
        draft.validate()?;
        let guard = self.locks.acquire([LockKey::JobList]).await;
        let snapshot = self.snapshot();

        let id = match &draft.id {
            Some(id) if snapshot.job(id).is_some() => {
                return Err(MutationError::JobExists(id.clone()))
            }
            Some(id) => id.clone(),
            None => self.ids.next(),
        };
        let order = order::next_order(&snapshot.job_list());
        let job = draft.into_job(id, order, self.clock.now());

        let change = Change::put_job(None, job.clone());
        self.confirm(guard, "create_job", json!(job), vec![change])
            .await?;
        Ok(job)
    }

    /// Flip between active and archived
    pub async fn toggle_job_status(&self, job_id: &str) -> Result<Job, MutationError> {
        let guard = self.locks.acquire([LockKey::JobList]).await;
        let snapshot = self.snapshot();
        let existing = snapshot
            .job(job_id)
            .ok_or_else(|| MutationError::JobNotFound(job_id.to_string()))?;

        let job = existing.with_status(existing.status.toggled());
        let payload = json!({ "id": job.id, "status": job.status });
        self.confirm(
            guard,
            "toggle_job_status",
            payload,
            vec![Change::put_job(Some(existing), job.clone())],
        )
        .await?;
        Ok(job)
    }

    /// Move a job to `target_order`, shifting the jobs in between by one.
    ///
    /// Rollback restores the order of every shifted job.
    pub async fn reorder_job(&self, job_id: &str, target_order: u32) -> Result<(), MutationError> {
        let guard = self.locks.acquire([LockKey::JobList]).await;
        let snapshot = self.snapshot();

        let from_order = snapshot
            .job(job_id)
            .map(|j| j.order)
            .ok_or_else(|| MutationError::JobNotFound(job_id.to_string()))?;
        let reordered = order::reconcile(&snapshot.job_list(), job_id, target_order)?;

        let changes: Vec<Change> = reordered
            .into_iter()
            .filter_map(|job| {
                let before = snapshot.job(&job.id)?;
                (before.order != job.order).then(|| Change::put_job(Some(before), job))
            })
            .collect();

        let payload = json!({
            "jobId": job_id,
            "fromOrder": from_order,
            "toOrder": target_order,
        });
        self.confirm(guard, "reorder_job", payload, changes).await
    }

    /// Delete a job with its candidates, assessment and responses.
    ///
    /// Later jobs move up one position. The whole cascade is confirmed, or
    /// rolled back, as one unit.
    pub async fn delete_job(&self, job_id: &str) -> Result<(), MutationError> {
        let (guard, snapshot) = loop {
            let keys = cascade_keys(&self.snapshot(), job_id)?;
            let guard = self.locks.acquire(keys).await;
            let snapshot = self.snapshot();
            // The cascade may have grown while we waited
            if guard.covers(&cascade_keys(&snapshot, job_id)?) {
                break (guard, snapshot);
            }
            tracing::debug!(job_id, "cascade changed while locking, retrying");
        };

        let job = snapshot
            .job(job_id)
            .ok_or_else(|| MutationError::JobNotFound(job_id.to_string()))?;

        let mut changes = vec![Change::remove_job(job)];
        for later in snapshot.jobs().filter(|j| j.order > job.order) {
            changes.push(Change::put_job(Some(later), later.with_order(later.order - 1)));
        }
        for candidate in snapshot.candidates_for_job(job_id) {
            changes.push(Change::remove_candidate(candidate));
        }
        if let Some(assessment) = snapshot.assessment(job_id) {
            changes.push(Change::remove_assessment(assessment));
        }
        for response in snapshot.responses_for_job(job_id) {
            changes.push(Change::remove_response(response));
        }

        self.confirm(guard, "delete_job", json!({ "id": job_id }), changes)
            .await
    }

    // -- candidates ---------------------------------------------------------

    /// Replace an existing candidate. Candidates are never created here.
    pub async fn update_candidate(
        &self,
        candidate: Candidate,
    ) -> Result<Candidate, MutationError> {
        let guard = self
            .locks
            .acquire([LockKey::Candidate(candidate.id.clone())])
            .await;
        let snapshot = self.snapshot();

        let existing = snapshot
            .candidate(&candidate.id)
            .ok_or_else(|| MutationError::CandidateNotFound(candidate.id.clone()))?;
        if snapshot.job(&candidate.job_id).is_none() {
            return Err(MutationError::JobNotFound(candidate.job_id.clone()));
        }

        let change = Change::put_candidate(Some(existing), candidate.clone());
        self.confirm(guard, "update_candidate", json!(candidate), vec![change])
            .await?;
        Ok(candidate)
    }

    /// Move a candidate to `stage`, appending to the timeline when the
    /// stage actually changes
    pub async fn move_candidate(
        &self,
        candidate_id: &str,
        stage: Stage,
    ) -> Result<Candidate, MutationError> {
        let guard = self
            .locks
            .acquire([LockKey::Candidate(candidate_id.to_string())])
            .await;
        let snapshot = self.snapshot();
        let existing = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| MutationError::CandidateNotFound(candidate_id.to_string()))?;

        let moved = existing.with_stage(stage, self.clock.now());
        let payload = json!({ "id": candidate_id, "stage": stage });
        self.confirm(
            guard,
            "move_candidate",
            payload,
            vec![Change::put_candidate(Some(existing), moved.clone())],
        )
        .await?;
        Ok(moved)
    }

    /// Prepend a note; blank content is rejected
    pub async fn add_candidate_note(
        &self,
        candidate_id: &str,
        author: &str,
        content: &str,
    ) -> Result<Candidate, MutationError> {
        let note = Note::new(self.ids.next(), author, content, self.clock.now())?;
        let guard = self
            .locks
            .acquire([LockKey::Candidate(candidate_id.to_string())])
            .await;
        let snapshot = self.snapshot();
        let existing = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| MutationError::CandidateNotFound(candidate_id.to_string()))?;

        let payload = json!({ "id": candidate_id, "note": note });
        let updated = existing.with_note(note);
        self.confirm(
            guard,
            "add_candidate_note",
            payload,
            vec![Change::put_candidate(Some(existing), updated.clone())],
        )
        .await?;
        Ok(updated)
    }

    // -- assessments --------------------------------------------------------

    /// Insert or replace the assessment of `assessment.job_id`
    pub async fn save_assessment(
        &self,
        assessment: Assessment,
    ) -> Result<Assessment, MutationError> {
        assessment.validate()?;
        let guard = self
            .locks
            .acquire([LockKey::Assessment(assessment.job_id.clone())])
            .await;
        let snapshot = self.snapshot();
        if snapshot.job(&assessment.job_id).is_none() {
            return Err(MutationError::JobNotFound(assessment.job_id.clone()));
        }

        let before = snapshot.assessment(&assessment.job_id);
        let change = Change::put_assessment(before, assessment.clone());
        self.confirm(guard, "save_assessment", json!(assessment), vec![change])
            .await?;
        Ok(assessment)
    }

    /// Validate answers against the job's assessment and store them as the
    /// candidate's response, replacing any earlier submission
    pub async fn submit_response(
        &self,
        job_id: &str,
        candidate_id: &str,
        answers: BTreeMap<String, Answer>,
    ) -> Result<CandidateResponse, MutationError> {
        let response_id = CandidateResponse::id_for(job_id, candidate_id);
        // The assessment key also orders this after a concurrent delete_job
        let guard = self
            .locks
            .acquire([
                LockKey::Assessment(job_id.to_string()),
                LockKey::Response(response_id.clone()),
            ])
            .await;
        let snapshot = self.snapshot();

        let assessment = snapshot
            .assessment(job_id)
            .ok_or_else(|| MutationError::AssessmentNotFound(job_id.to_string()))?;
        let candidate = snapshot
            .candidate(candidate_id)
            .ok_or_else(|| MutationError::CandidateNotFound(candidate_id.to_string()))?;
        if candidate.job_id != job_id {
            return Err(ValidationError::WrongJob {
                candidate_id: candidate_id.to_string(),
                job_id: job_id.to_string(),
            }
            .into());
        }
        assessment.validate_answers(&answers)?;

        let response = CandidateResponse::new(job_id, candidate_id, answers, self.clock.now());
        let change = Change::put_response(snapshot.response(&response_id), response.clone());
        self.confirm(guard, "submit_response", json!(response), vec![change])
            .await?;
        Ok(response)
    }

    // -- protocol -----------------------------------------------------------

    /// Apply, confirm, and roll back on failure. `guard` holds the locks of
    /// every entity in `changes` and is released once the outcome is applied.
    async fn confirm(
        &self,
        guard: KeyGuard,
        label: &'static str,
        payload: Value,
        changes: Vec<Change>,
    ) -> Result<(), MutationError> {
        self.apply(&changes);
        if self.policy == PersistPolicy::Optimistic {
            self.persist(changes.clone());
        }
        self.begin_request();

        let mut pending = Pending {
            coordinator: self,
            label,
            changes,
            settled: false,
            _guard: guard,
        };
        let result = self.network.request(&Request::write(label, payload)).await;
        let changes = pending.settle();
        self.end_request(result.as_ref().err().map(ToString::to_string));

        match result {
            Ok(()) => {
                tracing::info!(label, changes = changes.len(), "confirmed");
                if self.policy == PersistPolicy::AfterConfirm {
                    self.persist(changes);
                }
                Ok(())
            }
            Err(source) => {
                self.undo(&changes);
                tracing::warn!(label, changes = changes.len(), error = %source, "rolled back");
                Err(MutationError::Confirmation {
                    label: label.to_string(),
                    source,
                })
            }
        }
    }
}

impl<N, C, I> MutationCoordinator<N, C, I> {
    fn apply(&self, changes: &[Change]) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let next = state.apply(changes);
        *state = Arc::new(next);
    }

    /// Restore the `before` side of applied changes
    fn undo(&self, changes: &[Change]) {
        let undo = invert(changes);
        self.apply(&undo);
        if self.policy == PersistPolicy::Optimistic {
            self.persist(undo);
        }
    }

    fn persist(&self, changes: Vec<Change>) {
        if let Some(persister) = &self.persister {
            persister.submit(changes);
        }
    }

    fn begin_request(&self) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        status.in_flight += 1;
        status.last_error = None;
    }

    fn end_request(&self, error: Option<String>) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        status.in_flight = status.in_flight.saturating_sub(1);
        if error.is_some() {
            status.last_error = error;
        }
    }
}

/// Changes applied and awaiting confirmation. Dropped unsettled, it rolls
/// them back and closes the request before its locks are released.
struct Pending<'a, N, C, I> {
    coordinator: &'a MutationCoordinator<N, C, I>,
    label: &'static str,
    changes: Vec<Change>,
    settled: bool,
    // dropped after `drop` runs, so the rollback happens under the locks
    _guard: KeyGuard,
}

impl<N, C, I> Pending<'_, N, C, I> {
    fn settle(&mut self) -> Vec<Change> {
        self.settled = true;
        std::mem::take(&mut self.changes)
    }
}

impl<N, C, I> Drop for Pending<'_, N, C, I> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.coordinator.undo(&self.changes);
        self.coordinator.end_request(Some(format!("{} cancelled", self.label)));
        tracing::warn!(
            label = self.label,
            changes = self.changes.len(),
            "cancelled before confirmation, rolled back"
        );
    }
}

/// Every key a delete of `job_id` touches
fn cascade_keys(snapshot: &Snapshot, job_id: &str) -> Result<Vec<LockKey>, MutationError> {
    if snapshot.job(job_id).is_none() {
        return Err(MutationError::JobNotFound(job_id.to_string()));
    }
    let mut keys = vec![LockKey::JobList, LockKey::Assessment(job_id.to_string())];
    keys.extend(
        snapshot
            .candidates_for_job(job_id)
            .into_iter()
            .map(|c| LockKey::Candidate(c.id.clone())),
    );
    keys.extend(
        snapshot
            .responses_for_job(job_id)
            .into_iter()
            .map(|r| LockKey::Response(r.id.clone())),
    );
    Ok(keys)
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
