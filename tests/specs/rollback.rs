//! A failed confirmation leaves memory and disk exactly as they were.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::collections::BTreeMap;

struct Fixture {
    world: World,
    coordinator: Coordinator,
    jobs: Vec<String>,
    candidate: String,
}

async fn failing() -> Fixture {
    let world = World::seeded();
    let coordinator = world.open_with_rate(1.0).await;
    let snapshot = coordinator.snapshot();
    let jobs: Vec<String> = snapshot.jobs_by_order().iter().map(|j| j.id.clone()).collect();
    let candidate = snapshot.candidates_for_job(&jobs[0])[0].id.clone();
    Fixture {
        world,
        coordinator,
        jobs,
        candidate,
    }
}

impl Fixture {
    async fn assert_untouched(&self, before: &Snapshot) {
        self.coordinator.flush().await;
        assert_eq!(&*self.coordinator.snapshot(), before);
        assert_eq!(&self.world.on_disk(), before);
        assert_eq!(self.coordinator.persist_stats().written, 0);
    }
}

#[tokio::test]
async fn every_job_mutation_rolls_back_completely() {
    let f = failing().await;
    let before = (*f.coordinator.snapshot()).clone();

    assert!(f.coordinator.reorder_job(&f.jobs[0], 4).await.unwrap_err().is_rollback());
    assert!(f.coordinator.toggle_job_status(&f.jobs[1]).await.is_err());
    assert!(f.coordinator.create_job(JobDraft::new("Platform Engineer")).await.is_err());
    assert!(f.coordinator.delete_job(&f.jobs[0]).await.is_err());
    assert!(f.coordinator.delete_job(&f.jobs[4]).await.is_err());

    f.assert_untouched(&before).await;
}

#[tokio::test]
async fn every_candidate_mutation_rolls_back_completely() {
    let f = failing().await;
    let before = (*f.coordinator.snapshot()).clone();

    assert!(f.coordinator.move_candidate(&f.candidate, Stage::Hired).await.is_err());
    assert!(f
        .coordinator
        .add_candidate_note(&f.candidate, "dana", "strong systems background")
        .await
        .is_err());
    let mut renamed = f.coordinator.candidate(&f.candidate).unwrap();
    renamed.name = "Renamed".to_string();
    assert!(f.coordinator.update_candidate(renamed).await.is_err());

    f.assert_untouched(&before).await;
}

#[tokio::test]
async fn assessment_mutations_roll_back_completely() {
    let f = failing().await;
    let before = (*f.coordinator.snapshot()).clone();

    let mut assessment = f.coordinator.assessment(&f.jobs[0]).unwrap();
    assessment.title = "Renamed".to_string();
    assert!(f.coordinator.save_assessment(assessment).await.is_err());

    let mut moved = f.coordinator.assessment(&f.jobs[0]).unwrap();
    moved.job_id = f.jobs[3].clone();
    assert!(f.coordinator.save_assessment(moved).await.is_err());

    f.assert_untouched(&before).await;
}

#[tokio::test]
async fn rejected_calls_send_nothing_and_change_nothing() {
    let f = failing().await;
    let before = (*f.coordinator.snapshot()).clone();

    // these fail before the optimistic apply, so none is a rollback
    let errors = [
        f.coordinator.reorder_job(&f.jobs[0], 0).await.unwrap_err(),
        f.coordinator.reorder_job("missing", 1).await.unwrap_err(),
        f.coordinator.toggle_job_status("missing").await.unwrap_err(),
        f.coordinator.create_job(JobDraft::new("")).await.unwrap_err(),
        f.coordinator.move_candidate("missing", Stage::Screen).await.unwrap_err(),
        f.coordinator
            .add_candidate_note(&f.candidate, "dana", " ")
            .await
            .unwrap_err(),
        f.coordinator
            .submit_response(&f.jobs[4], &f.candidate, BTreeMap::new())
            .await
            .unwrap_err(),
    ];
    assert!(errors.iter().all(|e| !e.is_rollback()));
    assert_eq!(f.coordinator.status().last_error, None);

    f.assert_untouched(&before).await;
}
