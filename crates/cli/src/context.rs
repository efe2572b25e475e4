// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for every command: config, store, and coordinator

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tf_adapters::{SimulatedNetwork, TracedNetworkAdapter};
use tf_core::{SystemClock, TalentFlowConfig, UuidIdGen};
use tf_engine::MutationCoordinator;
use tf_storage::PersistentStore;

pub type Coordinator =
    MutationCoordinator<TracedNetworkAdapter<SimulatedNetwork>, SystemClock, UuidIdGen>;

pub struct Context {
    pub config: TalentFlowConfig,
    pub store: PersistentStore,
}

impl Context {
    /// Resolve the data directory and load `config.toml` from it unless a
    /// config path is given
    pub fn load(data_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let config_path = config.unwrap_or_else(|| data_dir.join("config.toml"));
        let config = TalentFlowConfig::load(&config_path)
            .with_context(|| format!("loading config {}", config_path.display()))?;
        let store = PersistentStore::open(&data_dir)?;
        Ok(Self { config, store })
    }

    pub fn data_dir(&self) -> &Path {
        self.store.root()
    }

    /// Seed the store on the blocking pool if it has no jobs. Returns
    /// whether seeding happened.
    pub async fn initialize(&self) -> Result<bool> {
        let store = self.store.clone();
        let seed = self.config.seed.clone();
        let seeded = tokio::task::spawn_blocking(move || {
            store.initialize(&seed, &SystemClock, &UuidIdGen)
        })
        .await?
        .with_context(|| format!("initializing {}", self.data_dir().display()))?;
        Ok(seeded)
    }

    /// Ensure the store is seeded, then hydrate a coordinator from it
    pub async fn coordinator(&self) -> Result<Coordinator> {
        self.initialize().await?;
        let simulated = SimulatedNetwork::new(self.config.network.clone());
        let network = TracedNetworkAdapter::new(simulated);
        let coordinator = MutationCoordinator::open(
            &self.store,
            network,
            SystemClock,
            UuidIdGen,
            self.config.persistence.policy,
        )
        .await
        .context("loading data")?;
        Ok(coordinator)
    }
}

/// Drain queued writes before the process exits
pub async fn finish(coordinator: &Coordinator) {
    coordinator.flush().await;
    let stats = coordinator.persist_stats();
    if stats.failed > 0 {
        tracing::warn!(failed = stats.failed, "some changes were not saved");
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("talentflow"))
        .unwrap_or_else(|| PathBuf::from(".talentflow"))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
