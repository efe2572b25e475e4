// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tf jobs` - jobs board commands

use crate::context::{self, Context, Coordinator};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use tf_core::{Job, JobDraft, JobFilter, JobStatus};

#[derive(Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List jobs in board order
    List {
        /// Only jobs with this status (active, archived)
        #[arg(long)]
        status: Option<JobStatus>,
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a job at the end of the board
    Create {
        /// Job title
        title: String,
        /// URL slug (derived from the title when omitted)
        #[arg(long)]
        slug: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Create the job archived
        #[arg(long)]
        archived: bool,
    },
    /// Change a job's title, slug, tags or description
    Edit {
        /// Job ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New URL slug
        #[arg(long)]
        slug: Option<String>,
        /// Replace the tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Archive an active job or reactivate an archived one
    Toggle {
        /// Job ID
        id: String,
    },
    /// Move a job to a 1-based position on the board
    Reorder {
        /// Job ID
        id: String,
        /// Target position
        order: u32,
    },
    /// Delete a job with its candidates, assessment and responses
    Delete {
        /// Job ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct JobRow(Job);

impl fmt::Display for JobRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let job = &self.0;
        write!(
            f,
            "{:>3}  {:<36}  {:<8}  {}",
            job.order, job.id, job.status, job.title
        )?;
        if !job.tags.is_empty() {
            let tags: Vec<&str> = job.tags.iter().map(String::as_str).collect();
            write!(f, "  [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}

pub async fn handle(command: JobsCommand, ctx: &Context, format: OutputFormat) -> Result<()> {
    let coordinator = ctx.coordinator().await?;
    let result = run(command, &coordinator, format).await;
    context::finish(&coordinator).await;
    result
}

async fn run(command: JobsCommand, coordinator: &Coordinator, format: OutputFormat) -> Result<()> {
    match command {
        JobsCommand::List { status, search } => {
            let snapshot = coordinator.snapshot();
            let rows: Vec<JobRow> = snapshot
                .filter_jobs(&JobFilter { status, search })
                .into_iter()
                .cloned()
                .map(JobRow)
                .collect();
            output::print_rows(&rows, "No jobs", format)
        }
        JobsCommand::Create {
            title,
            slug,
            tags,
            description,
            archived,
        } => {
            let mut draft = JobDraft::new(title)
                .with_tags(tags)
                .with_description(description);
            if let Some(slug) = slug {
                draft = draft.with_slug(slug);
            }
            if archived {
                draft = draft.with_status(JobStatus::Archived);
            }
            let job = coordinator.create_job(draft).await?;
            output::print(&JobRow(job), format)
        }
        JobsCommand::Edit {
            id,
            title,
            slug,
            tags,
            clear_tags,
            description,
        } => {
            let mut job = coordinator
                .job(&id)
                .ok_or_else(|| anyhow::anyhow!("job not found: {}", id))?;
            if let Some(title) = title {
                job.title = title;
            }
            if let Some(slug) = slug {
                job.slug = slug;
            }
            if clear_tags || !tags.is_empty() {
                job.tags = tags.into_iter().collect();
            }
            if let Some(description) = description {
                job.description = description;
            }
            let job = coordinator.update_job(job).await?;
            output::print(&JobRow(job), format)
        }
        JobsCommand::Toggle { id } => {
            let job = coordinator.toggle_job_status(&id).await?;
            output::print(&JobRow(job), format)
        }
        JobsCommand::Reorder { id, order } => {
            coordinator.reorder_job(&id, order).await?;
            let rows: Vec<JobRow> = coordinator
                .snapshot()
                .job_list()
                .into_iter()
                .map(JobRow)
                .collect();
            output::print_rows(&rows, "No jobs", format)
        }
        JobsCommand::Delete { id } => {
            coordinator.delete_job(&id).await?;
            match format {
                OutputFormat::Text => println!("Deleted job {}", id),
                OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": id })),
            }
            Ok(())
        }
    }
}
