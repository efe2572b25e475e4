// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::BTreeMap;
use tempfile::TempDir;
use tf_core::{Answer, FakeClock, JobDraft, SequentialIdGen};
use yare::parameterized;

fn store() -> (TempDir, PersistentStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = PersistentStore::open(dir.path().join("data")).unwrap();
    (dir, store)
}

fn job(id: &str, order: u32) -> Job {
    JobDraft::new(format!("Job {}", id)).into_job(id.to_string(), order, FakeClock::new().now())
}

fn small_seed() -> SeedConfig {
    SeedConfig {
        jobs: 4,
        archived_jobs: 1,
        candidates_per_job: 2,
        assessments: 1,
        rng_seed: Some(9),
    }
}

#[test]
fn put_then_get() {
    let (_dir, store) = store();
    let j = job("J1", 1);
    store.put(&j).unwrap();

    assert_eq!(store.get::<Job>("J1").unwrap(), Some(j));
    assert_eq!(store.get::<Job>("J2").unwrap(), None);
}

#[test]
fn put_writes_one_json_file_per_entity() {
    let (_dir, store) = store();
    store.put(&job("J1", 1)).unwrap();

    let path = store.root().join("jobs").join("J1.json");
    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(raw["id"], "J1");
    assert_eq!(raw["createdAt"], "2024-01-01T00:00:00Z");
}

#[test]
fn put_replaces_existing_record() {
    let (_dir, store) = store();
    store.put(&job("J1", 1)).unwrap();
    store.put(&job("J1", 7)).unwrap();

    assert_eq!(store.get::<Job>("J1").unwrap().unwrap().order, 7);
    assert_eq!(store.count::<Job>().unwrap(), 1);
}

#[test]
fn add_rejects_existing_key() {
    let (_dir, store) = store();
    store.add(&job("J1", 1)).unwrap();

    let err = store.add(&job("J1", 2)).unwrap_err();
    assert!(matches!(
        err,
        StorageError::AlreadyExists { collection: Collection::Jobs, ref key } if key == "J1"
    ));
    assert_eq!(store.get::<Job>("J1").unwrap().unwrap().order, 1);
}

#[test]
fn delete_reports_whether_record_existed() {
    let (_dir, store) = store();
    store.put(&job("J1", 1)).unwrap();

    assert!(store.delete::<Job>("J1").unwrap());
    assert!(!store.delete::<Job>("J1").unwrap());
    assert_eq!(store.get::<Job>("J1").unwrap(), None);
}

#[test]
fn get_all_is_sorted_and_skips_temp_files() {
    let (_dir, store) = store();
    store.put(&job("b", 2)).unwrap();
    store.put(&job("a", 1)).unwrap();
    std::fs::write(store.root().join("jobs").join(".c.json.tmp"), "{").unwrap();
    std::fs::write(store.root().join("jobs").join("notes.txt"), "x").unwrap();

    let ids: Vec<String> = store.get_all::<Job>().unwrap().into_iter().map(|j| j.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn get_all_on_missing_collection_is_empty() {
    let (_dir, store) = store();
    assert!(store.get_all::<Candidate>().unwrap().is_empty());
}

#[test]
fn corrupt_record_is_reported() {
    let (_dir, store) = store();
    store.put(&job("J1", 1)).unwrap();
    std::fs::write(store.root().join("jobs").join("J1.json"), "not json").unwrap();

    assert!(matches!(store.get::<Job>("J1"), Err(StorageError::Json { .. })));
}

#[test]
fn assessments_are_keyed_by_job_id() {
    let (_dir, store) = store();
    let assessment = Assessment {
        job_id: "J9".to_string(),
        title: "Take-home".to_string(),
        sections: vec![],
    };
    store.put(&assessment).unwrap();

    assert!(store.root().join("assessments").join("J9.json").exists());
    assert_eq!(store.get::<Assessment>("J9").unwrap(), Some(assessment));
}

#[test]
fn responses_use_composite_key() {
    let (_dir, store) = store();
    let mut answers = BTreeMap::new();
    answers.insert("q1".to_string(), Answer::Number(4.0));
    let response = CandidateResponse::new("J1", "c1", answers, FakeClock::new().now());
    store.put(&response).unwrap();

    assert!(store
        .root()
        .join("candidateResponses")
        .join("J1-c1.json")
        .exists());
    assert_eq!(store.get::<CandidateResponse>("J1-c1").unwrap(), Some(response));
}

#[test]
fn empty_key_is_rejected() {
    let (_dir, store) = store();
    assert!(matches!(
        store.get::<Job>(""),
        Err(StorageError::InvalidKey { reason: "empty", .. })
    ));
    assert!(matches!(
        store.put(&job("", 1)),
        Err(StorageError::InvalidKey { .. })
    ));
}

#[test]
fn oversized_key_is_rejected() {
    let (_dir, store) = store();
    let key = "/".repeat(100);
    assert!(matches!(
        store.put(&job(&key, 1)),
        Err(StorageError::InvalidKey { reason: "too long", .. })
    ));
}

#[parameterized(
    dot = { ".hidden" },
    parent = { ".." },
    slash = { "team/backend" },
    backslash = { "a\\b" },
    percent = { "50%" },
    spaces = { "senior dev" },
    unicode = { "développeur" },
)]
fn awkward_keys_round_trip(key: &str) {
    let (_dir, store) = store();
    let record = job(key, 1);
    store.put(&record).unwrap();

    assert_eq!(store.get::<Job>(key).unwrap(), Some(record.clone()));
    assert_eq!(store.get_all::<Job>().unwrap(), vec![record]);
    let files: Vec<_> = std::fs::read_dir(store.root().join("jobs")).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert!(store.delete::<Job>(key).unwrap());
}

#[parameterized(
    plain = { "J1-c_2", "J1-c_2" },
    inner_dot = { "v1.2", "v1.2" },
    leading_dot = { ".x", "%2Ex" },
    slash = { "a/b", "a%2Fb" },
    percent = { "%2F", "%252F" },
)]
fn file_stem_cases(key: &str, expected: &str) {
    assert_eq!(file_stem(key), expected);
}

#[test]
fn keys_that_look_encoded_do_not_collide() {
    let (_dir, store) = store();
    store.put(&job("a/b", 1)).unwrap();
    store.put(&job("a%2Fb", 2)).unwrap();

    assert_eq!(store.get::<Job>("a/b").unwrap().unwrap().order, 1);
    assert_eq!(store.get::<Job>("a%2Fb").unwrap().unwrap().order, 2);
}

#[test]
fn concurrent_puts_to_one_key_leave_a_whole_record() {
    let (_dir, store) = store();
    std::thread::scope(|scope| {
        for writer in 0..8u32 {
            let store = &store;
            scope.spawn(move || {
                for round in 0..20u32 {
                    store.put(&job("J1", writer * 100 + round)).unwrap();
                }
            });
        }
    });

    let stored = store.get::<Job>("J1").unwrap().unwrap();
    assert_eq!(stored.id, "J1");
    let names: Vec<String> = std::fs::read_dir(store.root().join("jobs"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["J1.json"]);
}

#[test]
fn failed_add_leaves_no_temp_file() {
    let (_dir, store) = store();
    store.add(&job("J1", 1)).unwrap();
    assert!(store.add(&job("J1", 2)).is_err());

    let entries = std::fs::read_dir(store.root().join("jobs")).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn initialize_seeds_empty_store() {
    let (_dir, store) = store();
    let seeded = store
        .initialize(&small_seed(), &FakeClock::new(), &SequentialIdGen::new("s"))
        .unwrap();

    assert!(seeded);
    let data = store.load_all().unwrap();
    assert_eq!(data.jobs.len(), 4);
    assert_eq!(data.candidates.len(), 8);
    assert_eq!(data.assessments.len(), 1);
    for collection in Collection::ALL {
        assert!(store.root().join(collection.dir_name()).is_dir());
    }
}

#[test]
fn initialize_twice_equals_once() {
    let (_dir, store) = store();
    let clock = FakeClock::new();
    let ids = SequentialIdGen::new("s");

    assert!(store.initialize(&small_seed(), &clock, &ids).unwrap());
    let first = store.load_all().unwrap();

    assert!(!store.initialize(&small_seed(), &clock, &ids).unwrap());
    assert_eq!(store.load_all().unwrap(), first);
}

#[test]
fn initialize_leaves_existing_jobs_alone() {
    let (_dir, store) = store();
    store.put(&job("mine", 1)).unwrap();

    let seeded = store
        .initialize(&small_seed(), &FakeClock::new(), &SequentialIdGen::new("s"))
        .unwrap();

    assert!(!seeded);
    assert_eq!(store.count::<Job>().unwrap(), 1);
    assert_eq!(store.count::<Candidate>().unwrap(), 0);
}

#[test]
fn interrupted_seed_is_redone_cleanly() {
    let (_dir, store) = store();
    let partial = seed::generate(&small_seed(), &FakeClock::new(), &SequentialIdGen::new("old"));
    std::fs::write(store.root().join("jobs"), "in the way").unwrap();

    assert!(store.write_seed(&partial).is_err());
    assert_eq!(store.count::<Candidate>().unwrap(), 8);
    std::fs::remove_file(store.root().join("jobs")).unwrap();

    let seeded = store
        .initialize(&small_seed(), &FakeClock::new(), &SequentialIdGen::new("s"))
        .unwrap();

    assert!(seeded);
    let data = store.load_all().unwrap();
    assert_eq!(data.jobs.len(), 4);
    assert_eq!(data.candidates.len(), 8);
    assert_eq!(data.assessments.len(), 1);
    let job_ids: Vec<&str> = data.jobs.iter().map(|j| j.id.as_str()).collect();
    assert!(data.candidates.iter().all(|c| job_ids.contains(&c.job_id.as_str())));
}

#[test]
fn dataset_into_snapshot() {
    let (_dir, store) = store();
    store
        .initialize(&small_seed(), &FakeClock::new(), &SequentialIdGen::new("s"))
        .unwrap();

    let snapshot = store.load_all().unwrap().into_snapshot();
    assert_eq!(snapshot.job_count(), 4);
    assert_eq!(snapshot.candidate_count(), 8);
}
