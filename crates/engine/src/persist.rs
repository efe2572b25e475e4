// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-behind persistence.
//!
//! Change batches are queued and written by one background task, in
//! submission order, on the blocking pool. Failures are logged and counted
//! and never propagate to the caller that produced the change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tf_core::{Assessment, Candidate, CandidateResponse, Change, Job};
use tf_storage::{PersistentStore, Record, StorageError};
use tokio::sync::{mpsc, oneshot};

enum Message {
    Batch(Vec<Change>),
    Flush(oneshot::Sender<()>),
}

#[derive(Default)]
struct Counters {
    written: AtomicU64,
    failed: AtomicU64,
}

/// Write-behind counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    /// Entity puts and deletes that reached the store
    pub written: u64,
    /// Entity puts and deletes that failed
    pub failed: u64,
}

#[derive(Clone)]
pub struct WriteBehind {
    tx: mpsc::UnboundedSender<Message>,
    counters: Arc<Counters>,
}

impl WriteBehind {
    /// Start the worker. Must be called inside a tokio runtime.
    pub fn spawn(store: PersistentStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        tokio::spawn(run(store, rx, Arc::clone(&counters)));
        Self { tx, counters }
    }

    /// Queue a batch; returns immediately
    pub fn submit(&self, changes: Vec<Change>) {
        if changes.is_empty() {
            return;
        }
        if self.tx.send(Message::Batch(changes)).is_err() {
            tracing::warn!("persistence worker stopped, dropping batch");
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Wait until every batch submitted so far has been written
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Message::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    pub fn stats(&self) -> PersistStats {
        PersistStats {
            written: self.counters.written.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

async fn run(
    store: PersistentStore,
    mut rx: mpsc::UnboundedReceiver<Message>,
    counters: Arc<Counters>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            Message::Batch(changes) => {
                let store = store.clone();
                let count = changes.len() as u64;
                match tokio::task::spawn_blocking(move || write_batch(&store, &changes)).await {
                    Ok(failed) => {
                        counters.written.fetch_add(count - failed, Ordering::Relaxed);
                        counters.failed.fetch_add(failed, Ordering::Relaxed);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "persistence task panicked");
                        counters.failed.fetch_add(count, Ordering::Relaxed);
                    }
                }
            }
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("persistence worker exiting");
}

/// Write one batch. Returns how many changes failed.
fn write_batch(store: &PersistentStore, changes: &[Change]) -> u64 {
    let mut failed = 0;
    for change in changes {
        if let Err(e) = write_change(store, change) {
            let (kind, key) = change.key();
            tracing::warn!(kind, key, error = %e, "persist failed");
            failed += 1;
        }
    }
    failed
}

fn write_change(store: &PersistentStore, change: &Change) -> Result<(), StorageError> {
    match change {
        Change::Job { id, after, .. } => write_one::<Job>(store, id, after.as_ref()),
        Change::Candidate { id, after, .. } => write_one::<Candidate>(store, id, after.as_ref()),
        Change::Assessment { job_id, after, .. } => {
            write_one::<Assessment>(store, job_id, after.as_ref())
        }
        Change::Response { id, after, .. } => {
            write_one::<CandidateResponse>(store, id, after.as_ref())
        }
    }
}

fn write_one<T: Record>(
    store: &PersistentStore,
    key: &str,
    after: Option<&T>,
) -> Result<(), StorageError> {
    match after {
        Some(record) => store.put(record),
        None => store.delete::<T>(key).map(|_| ()),
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
