// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tf assessments` - assessment commands

use crate::context::{self, Context, Coordinator};
use crate::output::{self, OutputFormat};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tf_core::{Assessment, QuestionKind};

#[derive(Args)]
pub struct AssessmentsArgs {
    #[command(subcommand)]
    pub command: AssessmentsCommand,
}

#[derive(Subcommand)]
pub enum AssessmentsCommand {
    /// Show a job's assessment
    Show {
        /// Job ID
        job_id: String,
    },
    /// Create or replace a job's assessment from a JSON file
    Save {
        /// Path to the assessment JSON
        file: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct AssessmentView(Assessment);

impl fmt::Display for AssessmentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.0;
        write!(f, "{} (job {})", a.title, a.job_id)?;
        for section in &a.sections {
            write!(f, "\n\n{}", section.title)?;
            for q in &section.questions {
                let marker = if q.required { "*" } else { " " };
                write!(f, "\n {} {:<12} {}  [{}]", marker, q.id, q.label, describe(&q.kind))?;
            }
        }
        Ok(())
    }
}

fn describe(kind: &QuestionKind) -> String {
    match kind {
        QuestionKind::SingleChoice { options } => format!("one of: {}", options.join(" / ")),
        QuestionKind::MultiChoice { options } => format!("any of: {}", options.join(" / ")),
        QuestionKind::ShortText => "short text".to_string(),
        QuestionKind::LongText { max_length } => format!("text, max {} chars", max_length),
        QuestionKind::NumericRange { min, max } => format!("number {}..={}", min, max),
        QuestionKind::FileUploadStub => "file upload".to_string(),
    }
}

pub async fn handle(
    command: AssessmentsCommand,
    ctx: &Context,
    format: OutputFormat,
) -> Result<()> {
    let coordinator = ctx.coordinator().await?;
    let result = run(command, &coordinator, format).await;
    context::finish(&coordinator).await;
    result
}

async fn run(
    command: AssessmentsCommand,
    coordinator: &Coordinator,
    format: OutputFormat,
) -> Result<()> {
    match command {
        AssessmentsCommand::Show { job_id } => {
            let assessment = coordinator
                .assessment(&job_id)
                .ok_or_else(|| anyhow::anyhow!("no assessment for job: {}", job_id))?;
            output::print(&AssessmentView(assessment), format)
        }
        AssessmentsCommand::Save { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let assessment: Assessment = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", file.display()))?;
            let saved = coordinator.save_assessment(assessment).await?;
            output::print(&AssessmentView(saved), format)
        }
    }
}
