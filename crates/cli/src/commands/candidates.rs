// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tf candidates` - candidate pipeline commands

use crate::context::{self, Context, Coordinator};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use tf_core::{Candidate, Stage};

#[derive(Args)]
pub struct CandidatesArgs {
    #[command(subcommand)]
    pub command: CandidatesCommand,
}

#[derive(Subcommand)]
pub enum CandidatesCommand {
    /// List candidates grouped by stage
    List {
        /// Only candidates for this job
        #[arg(long)]
        job: Option<String>,
        /// Only this stage
        #[arg(long)]
        stage: Option<Stage>,
        /// Case-insensitive name or email search
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Move a candidate to another stage
    Move {
        /// Candidate ID
        id: String,
        /// Target stage (applied, screen, tech, offer, hired, rejected)
        stage: Stage,
    },
    /// Change a candidate's name, email or job
    Update {
        /// Candidate ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// Move the application to another job
        #[arg(long)]
        job: Option<String>,
    },
    /// Add a note to a candidate
    Note {
        /// Candidate ID
        id: String,
        /// Note text
        content: String,
        /// Note author
        #[arg(long, default_value = "recruiter")]
        author: String,
    },
    /// Show one candidate with timeline and notes
    Show {
        /// Candidate ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct CandidateRow(Candidate);

impl fmt::Display for CandidateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.0;
        write!(f, "{:<36}  {:<8}  {:<24}  {}", c.id, c.stage, c.name, c.email)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct CandidateDetail(Candidate);

impl fmt::Display for CandidateDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.0;
        writeln!(f, "{} <{}>", c.name, c.email)?;
        writeln!(f, "  id:      {}", c.id)?;
        writeln!(f, "  job:     {}", c.job_id)?;
        writeln!(f, "  stage:   {}", c.stage)?;
        write!(f, "  applied: {}", c.applied_date.format("%Y-%m-%d"))?;
        for entry in &c.timeline {
            write!(
                f,
                "\n  {}  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.status
            )?;
        }
        for note in &c.notes {
            write!(f, "\n  note by {}: {}", note.author, note.content)?;
        }
        Ok(())
    }
}

pub async fn handle(
    command: CandidatesCommand,
    ctx: &Context,
    format: OutputFormat,
) -> Result<()> {
    let coordinator = ctx.coordinator().await?;
    let result = run(command, &coordinator, format).await;
    context::finish(&coordinator).await;
    result
}

async fn run(
    command: CandidatesCommand,
    coordinator: &Coordinator,
    format: OutputFormat,
) -> Result<()> {
    match command {
        CandidatesCommand::List { job, stage, search } => {
            let snapshot = coordinator.snapshot();
            let columns = snapshot.candidates_by_stage(job.as_deref(), &search);
            if format == OutputFormat::Json {
                let rows: Vec<&Candidate> = columns
                    .iter()
                    .filter(|(s, _)| stage.is_none_or(|wanted| wanted == **s))
                    .flat_map(|(_, candidates)| candidates.iter().copied())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            for (column, mut candidates) in columns {
                if stage.is_some_and(|wanted| wanted != column) {
                    continue;
                }
                candidates.sort_by(|a, b| a.name.cmp(&b.name));
                println!("{} ({})", column.as_str().to_uppercase(), candidates.len());
                for candidate in candidates {
                    println!("  {}", CandidateRow(candidate.clone()));
                }
            }
            Ok(())
        }
        CandidatesCommand::Move { id, stage } => {
            let candidate = coordinator.move_candidate(&id, stage).await?;
            output::print(&CandidateRow(candidate), format)
        }
        CandidatesCommand::Update {
            id,
            name,
            email,
            job,
        } => {
            let mut candidate = coordinator
                .candidate(&id)
                .ok_or_else(|| anyhow::anyhow!("candidate not found: {}", id))?;
            if let Some(name) = name {
                candidate.name = name;
            }
            if let Some(email) = email {
                candidate.email = email;
            }
            if let Some(job) = job {
                candidate.job_id = job;
            }
            let candidate = coordinator.update_candidate(candidate).await?;
            output::print(&CandidateDetail(candidate), format)
        }
        CandidatesCommand::Note {
            id,
            content,
            author,
        } => {
            let candidate = coordinator
                .add_candidate_note(&id, &author, &content)
                .await?;
            output::print(&CandidateDetail(candidate), format)
        }
        CandidatesCommand::Show { id } => {
            let candidate = coordinator
                .candidate(&id)
                .ok_or_else(|| anyhow::anyhow!("candidate not found: {}", id))?;
            output::print(&CandidateDetail(candidate), format)
        }
    }
}
