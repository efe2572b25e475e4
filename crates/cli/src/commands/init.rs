// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tf init` - seed an empty data directory

use crate::context::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use tf_core::{Assessment, Candidate, Job};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitReport {
    data_dir: String,
    seeded: bool,
    jobs: usize,
    candidates: usize,
    assessments: usize,
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.seeded { "Seeded" } else { "Already initialized" };
        write!(
            f,
            "{}: {} ({} jobs, {} candidates, {} assessments)",
            verb, self.data_dir, self.jobs, self.candidates, self.assessments
        )
    }
}

pub async fn init(ctx: &Context, format: OutputFormat) -> Result<()> {
    let seeded = ctx.initialize().await?;
    let store = ctx.store.clone();
    let (jobs, candidates, assessments) = tokio::task::spawn_blocking(move || {
        anyhow::Ok((
            store.count::<Job>()?,
            store.count::<Candidate>()?,
            store.count::<Assessment>()?,
        ))
    })
    .await??;
    let report = InitReport {
        data_dir: ctx.data_dir().display().to_string(),
        seeded,
        jobs,
        candidates,
        assessments,
    };
    output::print(&report, format)
}
