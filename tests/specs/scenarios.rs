//! The reference scenarios: reorder, rollback, cascade, read reliability.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn reorder_first_job_to_last() {
    let world = World::with_jobs(3);
    let coordinator = world.open_with_rate(0.0).await;

    coordinator.reorder_job("J1", 3).await.unwrap();
    coordinator.flush().await;

    let expected = vec![
        ("J2".to_string(), 1),
        ("J3".to_string(), 2),
        ("J1".to_string(), 3),
    ];
    assert_eq!(orders(&coordinator.snapshot()), expected);
    assert_eq!(orders(&world.on_disk()), expected);
}

#[tokio::test]
async fn failed_insert_leaves_job_absent() {
    let world = World::with_jobs(2);
    let coordinator = world.open_with_rate(1.0).await;

    let mut draft = job("X", 1);
    draft.title = "New".to_string();
    let err = coordinator.update_job(draft).await.unwrap_err();
    coordinator.flush().await;

    assert!(err.is_rollback());
    assert!(coordinator.job("X").is_none());
    assert!(world.on_disk().job("X").is_none());
}

#[tokio::test]
async fn failed_replace_leaves_job_unchanged() {
    let world = World::with_jobs(2);
    let coordinator = world.open_with_rate(1.0).await;
    let before = coordinator.job("J2").unwrap();

    let mut edited = before.clone();
    edited.title = "New".to_string();
    assert!(coordinator.update_job(edited).await.is_err());
    coordinator.flush().await;

    assert_eq!(coordinator.job("J2"), Some(before.clone()));
    assert_eq!(world.on_disk().job("J2"), Some(&before));
}

#[tokio::test]
async fn delete_removes_the_jobs_candidates_and_assessment() {
    let world = World::seeded();
    let coordinator = world.open_with_rate(0.0).await;
    let snapshot = coordinator.snapshot();
    let doomed = snapshot.jobs_by_order()[0].id.clone();
    let survivors: Vec<(String, usize)> = snapshot
        .jobs_by_order()
        .into_iter()
        .skip(1)
        .map(|j| (j.id.clone(), snapshot.candidates_for_job(&j.id).len()))
        .collect();
    assert!(snapshot.assessment(&doomed).is_some());

    coordinator.delete_job(&doomed).await.unwrap();
    coordinator.flush().await;

    for view in [coordinator.snapshot(), Arc::new(world.on_disk())] {
        assert!(view.job(&doomed).is_none());
        assert!(view.candidates_for_job(&doomed).is_empty());
        assert!(view.assessment(&doomed).is_none());
        for (id, count) in &survivors {
            assert_eq!(view.candidates_for_job(id).len(), *count);
        }
        assert!(is_dense(&view));
    }
    // the second job kept its assessment
    assert!(coordinator.assessment(&survivors[0].0).is_some());
}

#[tokio::test]
async fn reads_never_fail_and_writes_fail_near_the_configured_rate() {
    let mut failures = 0;
    for seed in 0..10 {
        let network = SimulatedNetwork::new(NetworkConfig {
            rng_seed: Some(seed),
            ..NetworkConfig::instant()
        });
        for _ in 0..1000 {
            assert!(network.request(&Request::read("jobs")).await.is_ok());
            if network
                .request(&Request::write("update_job", serde_json::Value::Null))
                .await
                .is_err()
            {
                failures += 1;
            }
        }
    }
    // 10_000 writes at p = 0.08: mean 800, sd ~27
    assert!((705..=895).contains(&failures), "{} failures", failures);
}
