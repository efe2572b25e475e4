// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the simulated backend, seeding and persistence.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [network]
//! min_delay = "200ms"
//! max_delay = "1200ms"
//! write_failure_rate = 0.08
//!
//! [seed]
//! jobs = 25
//! archived_jobs = 5
//! candidates_per_job = 40
//! assessments = 3
//!
//! [persistence]
//! policy = "after_confirm"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Latency and failure injection for the simulated backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Lower bound (inclusive) of the uniform delay
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    /// Upper bound (exclusive) of the uniform delay
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Probability that a write request fails
    pub write_failure_rate: f64,
    /// Fixed RNG seed; random when absent
    pub rng_seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(1200),
            write_failure_rate: 0.08,
            rng_seed: None,
        }
    }
}

impl NetworkConfig {
    /// No latency; failures still follow `write_failure_rate`
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_failure_rate(self, write_failure_rate: f64) -> Self {
        Self {
            write_failure_rate,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay > self.max_delay {
            return Err(ConfigError::Invalid(format!(
                "network.min_delay ({:?}) exceeds network.max_delay ({:?})",
                self.min_delay, self.max_delay
            )));
        }
        if !(0.0..=1.0).contains(&self.write_failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "network.write_failure_rate must be within 0..=1, got {}",
                self.write_failure_rate
            )));
        }
        Ok(())
    }
}

/// Shape of the one-time seed written into an empty store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    pub jobs: u32,
    /// The last `archived_jobs` seeded jobs are archived
    pub archived_jobs: u32,
    pub candidates_per_job: u32,
    /// Sample assessments for the first N jobs
    pub assessments: u32,
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            jobs: 25,
            archived_jobs: 5,
            candidates_per_job: 40,
            assessments: 3,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archived_jobs > self.jobs {
            return Err(ConfigError::Invalid(format!(
                "seed.archived_jobs ({}) exceeds seed.jobs ({})",
                self.archived_jobs, self.jobs
            )));
        }
        if self.assessments > self.jobs {
            return Err(ConfigError::Invalid(format!(
                "seed.assessments ({}) exceeds seed.jobs ({})",
                self.assessments, self.jobs
            )));
        }
        Ok(())
    }
}

/// When confirmed state is written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Only confirmed changes are written; rolled-back state never is
    #[default]
    AfterConfirm,
    /// Every in-memory change is written, including the optimistic apply
    /// and the rollback that may follow it
    Optimistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistenceConfig {
    pub policy: PersistPolicy,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TalentFlowConfig {
    pub network: NetworkConfig,
    pub seed: SeedConfig,
    pub persistence: PersistenceConfig,
}

impl TalentFlowConfig {
    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: TalentFlowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;
        self.seed.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
