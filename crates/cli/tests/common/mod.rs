// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A data directory with a small, fast, deterministic config.
///
/// The config lives at `<data-dir>/config.toml`, where `tf` looks by default.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_failure_rate(0.0)
    }

    pub fn with_failure_rate(rate: f64) -> Self {
        let env = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        env.set_failure_rate(rate);
        env
    }

    /// Rewrite the config; later commands see the new rate
    pub fn set_failure_rate(&self, rate: f64) {
        self.write_config(&config_toml(rate, "after_confirm"));
    }

    pub fn write_config(&self, toml: &str) {
        fs::write(self.config_path(), toml).expect("Failed to write config");
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// `tf --data-dir <dir>` with quiet logging
    pub fn tf(&self) -> Command {
        let mut cmd = Command::cargo_bin("tf").expect("tf binary");
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.env("RUST_LOG", "warn");
        cmd
    }

    /// Run a successful command with `-o json` and parse stdout
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.tf().arg("-o").arg("json").args(args).assert().success();
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
        serde_json::from_str(&stdout).expect("stdout is JSON")
    }

    /// Jobs in board order
    pub fn jobs(&self) -> Vec<Value> {
        match self.json(&["jobs", "list"]) {
            Value::Array(jobs) => jobs,
            other => panic!("expected a list, got {}", other),
        }
    }

    /// Parsed records in one collection directory, as stored on disk
    pub fn stored(&self, collection: &str) -> Vec<Value> {
        let dir = self.data_dir().join(collection);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut records: Vec<Value> = entries
            .map(|e| e.expect("dir entry").path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .map(|p| {
                let raw = fs::read_to_string(&p).expect("read record");
                serde_json::from_str(&raw).expect("record is JSON")
            })
            .collect();
        records.sort_by_key(|r| r["id"].as_str().unwrap_or_default().to_string());
        records
    }
}

/// Zero latency, 6 jobs (1 archived), 4 candidates each, 2 assessments
pub fn config_toml(rate: f64, policy: &str) -> String {
    format!(
        r#"
[network]
min_delay = "0s"
max_delay = "0s"
write_failure_rate = {rate}
rng_seed = 11

[seed]
jobs = 6
archived_jobs = 1
candidates_per_job = 4
assessments = 2
rng_seed = 11

[persistence]
policy = "{policy}"
"#
    )
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}
