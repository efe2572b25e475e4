// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building the in-memory snapshot from storage

use crate::error::EngineError;
use tf_core::{order, Snapshot};
use tf_storage::{Dataset, PersistentStore};

/// Turn stored records into a snapshot.
///
/// Job orders that are not a dense `1..N` are renumbered in memory only;
/// hydration never writes to the store.
pub fn hydrate(mut data: Dataset) -> Snapshot {
    if !order::is_dense(&data.jobs) {
        tracing::warn!(jobs = data.jobs.len(), "stored job orders not dense, renumbering");
        data.jobs = order::normalize(&data.jobs);
    }
    tracing::info!(
        jobs = data.jobs.len(),
        candidates = data.candidates.len(),
        assessments = data.assessments.len(),
        responses = data.responses.len(),
        "hydrated"
    );
    data.into_snapshot()
}

/// Read every collection on the blocking pool and hydrate
pub async fn load_snapshot(store: &PersistentStore) -> Result<Snapshot, EngineError> {
    let store = store.clone();
    let data = tokio::task::spawn_blocking(move || store.load_all()).await??;
    Ok(hydrate(data))
}
