// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated backend with random latency and write failures

use super::{NetworkAdapter, NetworkError, Request, SIMULATED_FAILURE_STATUS};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tf_core::NetworkConfig;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: Send + 'static {
    fn sample(&mut self) -> f64;
}

/// `StdRng`-backed source
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl RandomSource for SeededRandom {
    fn sample(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always returns the same sample.
///
/// `FixedRandom(0.0)` fails every write whenever the failure rate is
/// positive; `FixedRandom(0.999)` only fails writes at rate 1.0.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Waits `min_delay + (max_delay - min_delay) * u` and then fails writes
/// with probability `write_failure_rate`. Reads always succeed.
pub struct SimulatedNetwork<R = SeededRandom> {
    config: NetworkConfig,
    random: Arc<Mutex<R>>,
}

impl<R> Clone for SimulatedNetwork<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            random: Arc::clone(&self.random),
        }
    }
}

impl SimulatedNetwork<SeededRandom> {
    /// Seeded from `config.rng_seed`, or from entropy when unset
    pub fn new(config: NetworkConfig) -> Self {
        let random = match config.rng_seed {
            Some(seed) => SeededRandom::seeded(seed),
            None => SeededRandom::from_entropy(),
        };
        Self::with_random(config, random)
    }
}

impl<R: RandomSource> SimulatedNetwork<R> {
    pub fn with_random(config: NetworkConfig, random: R) -> Self {
        Self {
            config,
            random: Arc::new(Mutex::new(random)),
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Draw the delay and the failure decision for one request
    fn roll(&self, write: bool) -> (Duration, bool) {
        let mut random = self.random.lock().unwrap_or_else(|e| e.into_inner());
        let span = self.config.max_delay.saturating_sub(self.config.min_delay);
        let delay = self.config.min_delay + span.mul_f64(random.sample().clamp(0.0, 1.0));
        let fail = write && random.sample() < self.config.write_failure_rate;
        (delay, fail)
    }
}

#[async_trait]
impl<R: RandomSource> NetworkAdapter for SimulatedNetwork<R> {
    async fn request(&self, request: &Request) -> Result<(), NetworkError> {
        let (delay, fail) = self.roll(request.write);
        tokio::time::sleep(delay).await;

        if fail {
            tracing::debug!(
                label = %request.label,
                delay_ms = delay.as_millis() as u64,
                "injected write failure"
            );
            return Err(NetworkError::Server {
                label: request.label.clone(),
                status: SIMULATED_FAILURE_STATUS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
