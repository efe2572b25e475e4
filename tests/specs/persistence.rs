//! Seeding, hydration and write-behind as seen across process restarts.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::collections::BTreeMap;

#[tokio::test]
async fn seeding_twice_equals_seeding_once() {
    let world = World::seeded();
    let first = world.dataset();

    let seeded_again = world
        .store
        .initialize(&seed_config(), &FakeClock::new(), &SequentialIdGen::new("other"))
        .unwrap();

    assert!(!seeded_again);
    assert_eq!(world.dataset(), first);
    assert_eq!(first.jobs.len(), 5);
    assert_eq!(first.candidates.len(), 30);
    assert_eq!(first.assessments.len(), 2);
}

#[tokio::test]
async fn seeded_board_is_dense_with_archived_tail() {
    let world = World::seeded();
    let snapshot = world.on_disk();

    assert!(is_dense(&snapshot));
    let statuses: Vec<JobStatus> = snapshot.jobs_by_order().iter().map(|j| j.status).collect();
    assert_eq!(
        statuses,
        vec![
            JobStatus::Active,
            JobStatus::Active,
            JobStatus::Active,
            JobStatus::Active,
            JobStatus::Archived
        ]
    );
}

#[tokio::test]
async fn confirmed_state_survives_a_restart() {
    let world = World::seeded();
    let coordinator = world.open_with_rate(0.0).await;
    let snapshot = coordinator.snapshot();
    let jobs: Vec<String> = snapshot.jobs_by_order().iter().map(|j| j.id.clone()).collect();
    let candidate = snapshot.candidates_for_job(&jobs[0])[0].id.clone();
    let assessment = snapshot.assessment(&jobs[0]).unwrap().clone();

    coordinator.reorder_job(&jobs[3], 1).await.unwrap();
    coordinator.toggle_job_status(&jobs[4]).await.unwrap();
    coordinator.create_job(JobDraft::new("Data Engineer")).await.unwrap();
    coordinator.move_candidate(&candidate, Stage::Offer).await.unwrap();
    coordinator
        .add_candidate_note(&candidate, "dana", "references checked")
        .await
        .unwrap();
    // every seeded question answered with a value its kind accepts
    let answers: BTreeMap<String, Answer> = assessment
        .questions()
        .map(|q| {
            let answer = match &q.kind {
                tf_core::QuestionKind::SingleChoice { options } => {
                    Answer::Text(options[0].clone())
                }
                tf_core::QuestionKind::MultiChoice { options } => {
                    Answer::Choices(vec![options[0].clone()])
                }
                tf_core::QuestionKind::NumericRange { min, .. } => Answer::Number(*min as f64),
                _ => Answer::Text("answer".to_string()),
            };
            (q.id.clone(), answer)
        })
        .collect();
    coordinator
        .submit_response(&jobs[0], &candidate, answers)
        .await
        .unwrap();
    coordinator.delete_job(&jobs[2]).await.unwrap();
    coordinator.flush().await;

    assert_eq!(coordinator.persist_stats().failed, 0);
    assert_eq!(world.on_disk(), *coordinator.snapshot());

    // a second process hydrates the same state
    let reopened = world.open_with_rate(0.0).await;
    assert_eq!(*reopened.snapshot(), *coordinator.snapshot());
}

#[tokio::test]
async fn optimistic_policy_converges_after_rollback() {
    let world = World::seeded();
    let before = world.on_disk();
    let coordinator = world.open(network(1.0), PersistPolicy::Optimistic).await;
    let first = before.jobs_by_order()[0].id.clone();

    assert!(coordinator.delete_job(&first).await.is_err());
    coordinator.flush().await;

    // the optimistic write and its undo both reached the store
    assert!(coordinator.persist_stats().written > 0);
    assert_eq!(world.on_disk(), before);
}

#[tokio::test]
async fn hydrating_damaged_orders_writes_nothing() {
    let world = World::empty();
    world.store.put(&job("A", 4)).unwrap();
    world.store.put(&job("B", 4)).unwrap();
    world.store.put(&job("C", 10)).unwrap();
    let stored = world.dataset();

    let coordinator = world.open_with_rate(0.0).await;
    coordinator.flush().await;

    assert!(is_dense(&coordinator.snapshot()));
    assert_eq!(world.dataset(), stored);
    assert_eq!(coordinator.persist_stats().written, 0);
}

#[tokio::test]
async fn first_mutation_after_hydration_persists_normalized_orders() {
    let world = World::empty();
    world.store.put(&job("A", 3)).unwrap();
    world.store.put(&job("B", 7)).unwrap();
    world.store.put(&job("C", 9)).unwrap();

    let coordinator = world.open_with_rate(0.0).await;
    coordinator.reorder_job("C", 1).await.unwrap();
    coordinator.flush().await;

    let expected = vec![
        ("C".to_string(), 1),
        ("A".to_string(), 2),
        ("B".to_string(), 3),
    ];
    assert_eq!(orders(&world.on_disk()), expected);
}
