// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dense-order reconciliation for the jobs board.
//!
//! Job orders always form the permutation `1..=N`. Moving one job shifts the
//! jobs between its old and new position by one step, so the result is dense
//! again and every other pair keeps its relative order.

use crate::job::Job;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("target order {target} is outside 1..={len}")]
    OutOfRange { target: u32, len: usize },
    #[error("job orders are not a dense permutation of 1..={0}")]
    NotDense(usize),
}

/// Move `job_id` to `target_order`, returning all jobs sorted by order
pub fn reconcile(jobs: &[Job], job_id: &str, target_order: u32) -> Result<Vec<Job>, OrderError> {
    if !is_dense(jobs) {
        return Err(OrderError::NotDense(jobs.len()));
    }
    let old_order = jobs
        .iter()
        .find(|j| j.id == job_id)
        .map(|j| j.order)
        .ok_or_else(|| OrderError::JobNotFound(job_id.to_string()))?;
    if target_order == 0 || target_order as usize > jobs.len() {
        return Err(OrderError::OutOfRange {
            target: target_order,
            len: jobs.len(),
        });
    }

    let mut moved: Vec<Job> = jobs
        .iter()
        .map(|job| {
            let order = if job.id == job_id {
                target_order
            } else if old_order < target_order
                && job.order > old_order
                && job.order <= target_order
            {
                job.order - 1
            } else if old_order > target_order
                && job.order >= target_order
                && job.order < old_order
            {
                job.order + 1
            } else {
                job.order
            };
            if order == job.order {
                job.clone()
            } else {
                job.with_order(order)
            }
        })
        .collect();
    moved.sort_by_key(|j| j.order);
    Ok(moved)
}

/// True when the orders are exactly `1..=jobs.len()` with no repeats
pub fn is_dense(jobs: &[Job]) -> bool {
    let mut seen = vec![false; jobs.len()];
    for job in jobs {
        let idx = job.order as usize;
        if idx == 0 || idx > jobs.len() || seen[idx - 1] {
            return false;
        }
        seen[idx - 1] = true;
    }
    true
}

/// Order for a job appended to the end of the board
pub fn next_order(jobs: &[Job]) -> u32 {
    jobs.iter().map(|j| j.order).max().unwrap_or(0) + 1
}

/// Renumber to `1..=N`, keeping the current relative order (ties by id)
pub fn normalize(jobs: &[Job]) -> Vec<Job> {
    let mut sorted: Vec<&Job> = jobs.iter().collect();
    sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    sorted
        .into_iter()
        .zip(1u32..)
        .map(|(job, order)| {
            if job.order == order {
                job.clone()
            } else {
                job.with_order(order)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
