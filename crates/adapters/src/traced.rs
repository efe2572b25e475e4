// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::network::{NetworkAdapter, NetworkError, Request};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any NetworkAdapter
#[derive(Clone)]
pub struct TracedNetworkAdapter<N> {
    inner: N,
}

impl<N> TracedNetworkAdapter<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

#[async_trait]
impl<N: NetworkAdapter> NetworkAdapter for TracedNetworkAdapter<N> {
    async fn request(&self, request: &Request) -> Result<(), NetworkError> {
        let span = tracing::info_span!(
            "network.request",
            label = %request.label,
            write = request.write
        );

        async {
            tracing::debug!(payload = %request.payload, "sending");

            let start = std::time::Instant::now();
            let result = self.inner.request(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "confirmed"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "request failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
