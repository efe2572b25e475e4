// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-per-entity store.
//!
//! Layout: `<root>/<collection>/<file_stem(key)>.json`. Every write lands in
//! a uniquely named hidden temp file in the same directory first and is then
//! persisted into place, so readers never observe a half-written record.

use crate::seed;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tf_core::{Assessment, Candidate, CandidateResponse, Clock, IdGen, Job, SeedConfig, Snapshot};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{collection}/{key} already exists")]
    AlreadyExists { collection: Collection, key: String },
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The four keyed collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Candidates,
    Assessments,
    CandidateResponses,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Jobs,
        Collection::Candidates,
        Collection::Assessments,
        Collection::CandidateResponses,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Candidates => "candidates",
            Collection::Assessments => "assessments",
            Collection::CandidateResponses => "candidateResponses",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// An entity stored in one collection under one key
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn key(&self) -> &str;
}

impl Record for Job {
    const COLLECTION: Collection = Collection::Jobs;

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for Candidate {
    const COLLECTION: Collection = Collection::Candidates;

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for Assessment {
    const COLLECTION: Collection = Collection::Assessments;

    fn key(&self) -> &str {
        &self.job_id
    }
}

impl Record for CandidateResponse {
    const COLLECTION: Collection = Collection::CandidateResponses;

    fn key(&self) -> &str {
        &self.id
    }
}

/// Every record in the store, grouped by collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub assessments: Vec<Assessment>,
    pub responses: Vec<CandidateResponse>,
}

impl Dataset {
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::new(self.jobs, self.candidates, self.assessments, self.responses)
    }
}

/// Longest encoded file stem; leaves room for `.json` under the usual
/// 255-byte file name limit
const MAX_STEM_BYTES: usize = 250;

/// Reject keys that cannot be stored under any file name
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let reason = if key.is_empty() {
        Some("empty")
    } else if file_stem(key).len() > MAX_STEM_BYTES {
        Some("too long")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Encode a key as a file stem.
///
/// ASCII alphanumerics, `-`, `_` and any non-leading `.` pass through; every
/// other byte becomes `%XX`. The mapping is injective, never yields a
/// separator, and never starts with `.`.
pub fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let plain = byte.is_ascii_alphanumeric()
            || byte == b'-'
            || byte == b'_'
            || (byte == b'.' && i > 0);
        if plain {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

/// File-backed store for the pipeline's entities
#[derive(Debug, Clone)]
pub struct PersistentStore {
    root: PathBuf,
}

impl PersistentStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(io_err(&root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.dir_name())
    }

    fn path_for(&self, collection: Collection, key: &str) -> PathBuf {
        self.dir(collection).join(format!("{}.json", file_stem(key)))
    }

    /// Every record in `T`'s collection, sorted by key
    pub fn get_all<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        let dir = self.dir(T::COLLECTION);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&dir)(e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_err(&dir))?.path();
            let is_record = path.extension().is_some_and(|e| e == "json")
                && !path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'));
            if is_record {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|p| read_record(p)).collect()
    }

    pub fn get<T: Record>(&self, key: &str) -> Result<Option<T>, StorageError> {
        validate_key(key)?;
        let path = self.path_for(T::COLLECTION, key);
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Insert or replace
    pub fn put<T: Record>(&self, record: &T) -> Result<(), StorageError> {
        let key = record.key();
        validate_key(key)?;
        let path = self.path_for(T::COLLECTION, key);
        let tmp = self.write_temp(T::COLLECTION, record)?;
        tmp.persist(&path).map_err(|e| io_err(&path)(e.error))?;
        tracing::trace!(collection = %T::COLLECTION, key, "put");
        Ok(())
    }

    /// Insert only; an existing key fails with [`StorageError::AlreadyExists`]
    pub fn add<T: Record>(&self, record: &T) -> Result<(), StorageError> {
        let key = record.key();
        validate_key(key)?;
        let path = self.path_for(T::COLLECTION, key);
        let tmp = self.write_temp(T::COLLECTION, record)?;

        // the temp file is removed when the failed persist drops it
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                tracing::trace!(collection = %T::COLLECTION, key, "add");
                Ok(())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists {
                    collection: T::COLLECTION,
                    key: key.to_string(),
                })
            }
            Err(e) => Err(io_err(&path)(e.error)),
        }
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete<T: Record>(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let path = self.path_for(T::COLLECTION, key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::trace!(collection = %T::COLLECTION, key, "delete");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    pub fn count<T: Record>(&self) -> Result<usize, StorageError> {
        Ok(self.get_all::<T>()?.len())
    }

    /// Read all four collections
    pub fn load_all(&self) -> Result<Dataset, StorageError> {
        Ok(Dataset {
            jobs: self.get_all()?,
            candidates: self.get_all()?,
            assessments: self.get_all()?,
            responses: self.get_all()?,
        })
    }

    /// Create the collection directories and seed an empty store.
    ///
    /// Seeding happens only when `jobs` is empty, so calling this any number
    /// of times leaves the same data as calling it once. Jobs are written
    /// last: a seed interrupted part way leaves `jobs` empty, and the next
    /// call clears the partial records and seeds again. Returns whether seed
    /// data was written.
    pub fn initialize(
        &self,
        config: &SeedConfig,
        clock: &impl Clock,
        ids: &impl IdGen,
    ) -> Result<bool, StorageError> {
        for collection in Collection::ALL {
            let dir = self.dir(collection);
            fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        }

        let existing = self.count::<Job>()?;
        if existing > 0 {
            tracing::debug!(jobs = existing, "store already populated, skipping seed");
            return Ok(false);
        }

        // with no jobs, anything left in the other collections is debris
        // from an interrupted seed
        let cleared = self.clear_records(Collection::Candidates)?
            + self.clear_records(Collection::Assessments)?
            + self.clear_records(Collection::CandidateResponses)?;
        if cleared > 0 {
            tracing::warn!(cleared, "removed records left by an interrupted seed");
        }

        let data = seed::generate(config, clock, ids);
        self.write_seed(&data)?;
        tracing::info!(
            jobs = data.jobs.len(),
            candidates = data.candidates.len(),
            assessments = data.assessments.len(),
            root = %self.root.display(),
            "seeded empty store"
        );
        Ok(true)
    }

    /// Write a dataset with jobs last, so `jobs` stays empty until every
    /// other record has landed
    fn write_seed(&self, data: &Dataset) -> Result<(), StorageError> {
        for candidate in &data.candidates {
            self.put(candidate)?;
        }
        for assessment in &data.assessments {
            self.put(assessment)?;
        }
        for response in &data.responses {
            self.put(response)?;
        }
        for job in &data.jobs {
            self.put(job)?;
        }
        Ok(())
    }

    /// Remove every record file in a collection. Returns how many went.
    fn clear_records(&self, collection: Collection) -> Result<usize, StorageError> {
        let dir = self.dir(collection);
        let entries = fs::read_dir(&dir).map_err(io_err(&dir))?;
        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(io_err(&dir))?.path();
            if path.extension().is_some_and(|e| e == "json") {
                fs::remove_file(&path).map_err(io_err(&path))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn write_temp<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> Result<NamedTempFile, StorageError> {
        let dir = self.dir(collection);
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let json = serde_json::to_vec_pretty(record).map_err(|source| StorageError::Json {
            path: dir.clone(),
            source,
        })?;
        // default prefix is `.tmp`, which get_all skips
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
        tmp.write_all(&json).map_err(io_err(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;
        Ok(tmp)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = fs::read(path).map_err(io_err(path))?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
