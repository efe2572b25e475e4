// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend confirmation round trips

mod simulated;

pub use simulated::{FixedRandom, RandomSource, SeededRandom, SimulatedNetwork};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNetworkAdapter, FakeOutcome};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Status the simulated backend reports for an injected failure
pub const SIMULATED_FAILURE_STATUS: u16 = 500;

/// One request to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Operation label, e.g. `reorder_job`
    pub label: String,
    /// Only writes are subject to injected failures
    pub write: bool,
    pub payload: Value,
}

impl Request {
    pub fn read(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            write: false,
            payload: Value::Null,
        }
    }

    pub fn write(label: impl Into<String>, payload: Value) -> Self {
        Self {
            label: label.into(),
            write: true,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("{label} failed: server returned {status}")]
    Server { label: String, status: u16 },
    #[error("{label} failed: {message}")]
    Failed { label: String, message: String },
}

/// Adapter for the backend that confirms mutations
#[async_trait]
pub trait NetworkAdapter: Clone + Send + Sync + 'static {
    /// Resolve after the backend answers. Never touches entity state.
    async fn request(&self, request: &Request) -> Result<(), NetworkError>;
}
