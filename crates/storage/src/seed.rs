// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sample data for an empty store

use crate::store::Dataset;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tf_core::{
    Assessment, Candidate, Clock, IdGen, Job, JobStatus, Question, QuestionKind, SeedConfig,
    Section, Stage,
};

pub const JOB_TAGS: [&str; 6] = [
    "Remote",
    "Full-Time",
    "Contract",
    "Engineering",
    "Design",
    "Marketing",
];

const DAY_SECS: i64 = 24 * 60 * 60;

/// Build the seed dataset.
///
/// Job `n` (1-based) is titled "Job Title n" with order `n`; the last
/// `archived_jobs` jobs are archived. Candidates are named
/// `Candi-<order>-<i>` and land in a random stage with a matching
/// timeline. Output is deterministic for a fixed `rng_seed`, clock and id
/// generator.
pub fn generate(config: &SeedConfig, clock: &impl Clock, ids: &impl IdGen) -> Dataset {
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = clock.now();
    let active = config.jobs.saturating_sub(config.archived_jobs);

    let jobs: Vec<Job> = (1..=config.jobs)
        .map(|order| {
            let status = if order > active {
                JobStatus::Archived
            } else {
                JobStatus::Active
            };
            job(&mut rng, ids.next(), order, status, now)
        })
        .collect();

    let mut candidates =
        Vec::with_capacity(config.jobs as usize * config.candidates_per_job as usize);
    for job in &jobs {
        for i in 1..=config.candidates_per_job {
            let name = format!("Candi-{}-{}", job.order, i);
            candidates.push(candidate(&mut rng, ids.next(), &job.id, name, now));
        }
    }

    let assessments = jobs
        .iter()
        .take(config.assessments as usize)
        .map(|job| assessment(&job.id, ids))
        .collect();

    Dataset {
        jobs,
        candidates,
        assessments,
        responses: Vec::new(),
    }
}

fn ago(rng: &mut StdRng, now: DateTime<Utc>, max_days: i64) -> DateTime<Utc> {
    now - Duration::seconds(rng.gen_range(0..max_days * DAY_SECS))
}

fn job(rng: &mut StdRng, id: String, order: u32, status: JobStatus, now: DateTime<Utc>) -> Job {
    let start = rng.gen_range(0..2);
    let end = rng.gen_range(2..=5);
    let tags: BTreeSet<String> = JOB_TAGS[start..end].iter().map(|t| t.to_string()).collect();
    let focus = JOB_TAGS[order as usize % JOB_TAGS.len()].to_lowercase();

    Job {
        id,
        title: format!("Job Title {}", order),
        slug: format!("job-title-{}", order),
        status,
        tags,
        order,
        description: format!(
            "We are looking for a highly motivated Job Title {} to join our team. \
             This role involves challenges in {} and offers room to grow.",
            order, focus
        ),
        created_at: ago(rng, now, 30),
    }
}

fn candidate(
    rng: &mut StdRng,
    id: String,
    job_id: &str,
    name: String,
    now: DateTime<Utc>,
) -> Candidate {
    let applied = ago(rng, now, 60);
    let email = format!("candidate.{}@talentflow.com", id);
    let stage = Stage::ALL[rng.gen_range(0..Stage::ALL.len())];
    let moved_at = applied + Duration::seconds(rng.gen_range(0..10 * DAY_SECS));

    Candidate::new(id, name, email, job_id, applied).with_stage(stage, moved_at)
}

fn assessment(job_id: &str, ids: &impl IdGen) -> Assessment {
    Assessment {
        job_id: job_id.to_string(),
        title: format!("Assessment for Job {}", job_id),
        sections: vec![
            Section {
                id: ids.next(),
                title: "Introduction".to_string(),
                questions: vec![
                    Question::new(
                        ids.next(),
                        "What is your expected salary?",
                        QuestionKind::ShortText,
                    )
                    .required(),
                    Question::new(
                        ids.next(),
                        "Are you legally authorized to work?",
                        QuestionKind::SingleChoice {
                            options: vec!["Yes".to_string(), "No".to_string()],
                        },
                    )
                    .required(),
                    Question::new(
                        ids.next(),
                        "Upload your CV/Resume (Stub)",
                        QuestionKind::FileUploadStub,
                    ),
                ],
            },
            Section {
                id: ids.next(),
                title: "Technical Skills".to_string(),
                questions: vec![
                    Question::new(
                        ids.next(),
                        "Describe a complex project you recently completed.",
                        QuestionKind::LongText { max_length: 1000 },
                    )
                    .required(),
                    Question::new(
                        ids.next(),
                        "Years of professional experience?",
                        QuestionKind::NumericRange { min: 0, max: 20 },
                    )
                    .required(),
                ],
            },
        ],
    }
}

#[cfg(test)]
#[path = "seed_tests.rs"]
mod tests;
