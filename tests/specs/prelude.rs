//! Shared fixtures for the behavioral specs.

#![allow(dead_code)]

pub use std::sync::Arc;
pub use tf_adapters::{NetworkAdapter, Request, SimulatedNetwork};
pub use tf_core::{
    Answer, Clock, FakeClock, Job, JobDraft, JobStatus, NetworkConfig, PersistPolicy, SeedConfig,
    SequentialIdGen, Snapshot, Stage,
};
pub use tf_engine::MutationCoordinator;
pub use tf_storage::{Dataset, PersistentStore};

use std::time::Duration;
use tempfile::TempDir;

pub type Coordinator = MutationCoordinator<SimulatedNetwork, FakeClock, SequentialIdGen>;

/// A store in a temp directory
pub struct World {
    _dir: TempDir,
    pub store: PersistentStore,
}

impl World {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistentStore::open(dir.path()).unwrap();
        Self { _dir: dir, store }
    }

    /// 5 jobs (1 archived), 6 candidates each, assessments on the first 2
    pub fn seeded() -> Self {
        let world = Self::empty();
        assert!(world
            .store
            .initialize(&seed_config(), &FakeClock::new(), &SequentialIdGen::new("seed"))
            .unwrap());
        world
    }

    /// Jobs J1..Jn at orders 1..n, nothing else
    pub fn with_jobs(n: u32) -> Self {
        let world = Self::empty();
        for i in 1..=n {
            world.store.put(&job(&format!("J{}", i), i)).unwrap();
        }
        world
    }

    pub async fn open(&self, network: NetworkConfig, policy: PersistPolicy) -> Coordinator {
        MutationCoordinator::open(
            &self.store,
            SimulatedNetwork::new(network),
            FakeClock::new(),
            SequentialIdGen::new("id"),
            policy,
        )
        .await
        .unwrap()
    }

    /// Coordinator whose writes always succeed, or always fail
    pub async fn open_with_rate(&self, rate: f64) -> Coordinator {
        self.open(network(rate), PersistPolicy::AfterConfirm).await
    }

    /// What a fresh process would hydrate
    pub fn on_disk(&self) -> Snapshot {
        self.store.load_all().unwrap().into_snapshot()
    }

    pub fn dataset(&self) -> Dataset {
        self.store.load_all().unwrap()
    }
}

pub fn seed_config() -> SeedConfig {
    SeedConfig {
        jobs: 5,
        archived_jobs: 1,
        candidates_per_job: 6,
        assessments: 2,
        rng_seed: Some(99),
    }
}

/// No latency, fixed seed
pub fn network(rate: f64) -> NetworkConfig {
    NetworkConfig {
        rng_seed: Some(7),
        ..NetworkConfig::instant().with_failure_rate(rate)
    }
}

/// A few milliseconds of latency so confirmations overlap
pub fn slow_network(rate: f64, seed: u64) -> NetworkConfig {
    NetworkConfig {
        min_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(6),
        write_failure_rate: rate,
        rng_seed: Some(seed),
    }
}

pub fn job(id: &str, order: u32) -> Job {
    JobDraft::new(format!("Job {}", id)).into_job(id.to_string(), order, FakeClock::new().now())
}

/// (id, order) in board order
pub fn orders(snapshot: &Snapshot) -> Vec<(String, u32)> {
    snapshot
        .jobs_by_order()
        .into_iter()
        .map(|j| (j.id.clone(), j.order))
        .collect()
}

pub fn is_dense(snapshot: &Snapshot) -> bool {
    let mut seen: Vec<u32> = snapshot.jobs().map(|j| j.order).collect();
    seen.sort_unstable();
    seen.into_iter().eq(1..=snapshot.job_count() as u32)
}
