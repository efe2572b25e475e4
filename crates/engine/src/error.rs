// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the mutation engine

use tf_adapters::NetworkError;
use tf_core::{OrderError, ValidationError};
use tf_storage::StorageError;
use thiserror::Error;

/// Why a mutation did not stand.
///
/// Only `Confirmation` happens after the optimistic apply; every other
/// variant is raised before state is touched or a request is sent.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{label} rolled back: {source}")]
    Confirmation {
        label: String,
        #[source]
        source: NetworkError,
    },
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("job already exists: {0}")]
    JobExists(String),
    #[error("candidate not found: {0}")]
    CandidateNotFound(String),
    #[error("no assessment for job: {0}")]
    AssessmentNotFound(String),
    #[error("reorder rejected: {0}")]
    Order(#[from] OrderError),
}

impl MutationError {
    /// True when state was applied and then restored
    pub fn is_rollback(&self) -> bool {
        matches!(self, MutationError::Confirmation { .. })
    }
}

/// Errors while bringing the engine up
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
