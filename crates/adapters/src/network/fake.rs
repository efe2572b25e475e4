// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake network adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NetworkAdapter, NetworkError, Request};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

/// Scripted answer to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeOutcome {
    Succeed,
    Fail(String),
    /// Park the request until the test calls [`FakeNetworkAdapter::release`]
    Hold,
}

struct Held {
    request: Request,
    reply: oneshot::Sender<Result<(), NetworkError>>,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Request>,
    script: VecDeque<FakeOutcome>,
    fallback: Option<FakeOutcome>,
    held: Vec<Held>,
}

/// Fake network adapter.
///
/// Requests consume scripted outcomes in order; once the script is empty
/// the fallback applies (success unless set otherwise).
#[derive(Clone, Default)]
pub struct FakeNetworkAdapter {
    state: Arc<Mutex<FakeState>>,
    parked: Arc<Notify>,
}

impl FakeNetworkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request answered with `message` as the failure
    pub fn failing(message: &str) -> Self {
        let fake = Self::new();
        fake.set_fallback(FakeOutcome::Fail(message.to_string()));
        fake
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue outcomes for the next requests
    pub fn script(&self, outcomes: impl IntoIterator<Item = FakeOutcome>) {
        self.state().script.extend(outcomes);
    }

    pub fn fail_next(&self, message: &str) {
        self.script([FakeOutcome::Fail(message.to_string())]);
    }

    pub fn hold_next(&self) {
        self.script([FakeOutcome::Hold]);
    }

    /// Outcome once the script runs out
    pub fn set_fallback(&self, outcome: FakeOutcome) {
        self.state().fallback = Some(outcome);
    }

    /// Get all recorded requests
    pub fn calls(&self) -> Vec<Request> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Labels of requests currently parked, oldest first
    pub fn held(&self) -> Vec<String> {
        self.state()
            .held
            .iter()
            .map(|h| h.request.label.clone())
            .collect()
    }

    /// Wait until at least `count` requests are parked
    pub async fn wait_for_held(&self, count: usize) {
        loop {
            let notified = self.parked.notified();
            if self.state().held.len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Answer the oldest parked request with the given label.
    ///
    /// `Err` carries the failure message. Returns false when nothing with
    /// that label is parked.
    pub fn release(&self, label: &str, result: Result<(), &str>) -> bool {
        let held = {
            let mut state = self.state();
            match state.held.iter().position(|h| h.request.label == label) {
                Some(index) => state.held.remove(index),
                None => return false,
            }
        };
        let reply = result.map_err(|message| NetworkError::Failed {
            label: held.request.label.clone(),
            message: message.to_string(),
        });
        // receiver gone means the caller stopped waiting
        let _ = held.reply.send(reply);
        true
    }
}

#[async_trait]
impl NetworkAdapter for FakeNetworkAdapter {
    async fn request(&self, request: &Request) -> Result<(), NetworkError> {
        let parked = {
            let mut state = self.state();
            state.calls.push(request.clone());
            let outcome = match state.script.pop_front() {
                Some(outcome) => outcome,
                None => state.fallback.clone().unwrap_or(FakeOutcome::Succeed),
            };
            match outcome {
                FakeOutcome::Succeed => return Ok(()),
                FakeOutcome::Fail(message) => {
                    return Err(NetworkError::Failed {
                        label: request.label.clone(),
                        message,
                    })
                }
                FakeOutcome::Hold => {
                    let (reply, rx) = oneshot::channel();
                    state.held.push(Held {
                        request: request.clone(),
                        reply,
                    });
                    rx
                }
            }
        };
        self.parked.notify_waiters();

        match parked.await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Failed {
                label: request.label.clone(),
                message: "request abandoned".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
