// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tf responses` - assessment submission commands

use crate::context::{self, Context, Coordinator};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tf_core::{Answer, CandidateResponse};

#[derive(Args)]
pub struct ResponsesArgs {
    #[command(subcommand)]
    pub command: ResponsesCommand,
}

#[derive(Subcommand)]
pub enum ResponsesCommand {
    /// Submit a candidate's answers to a job's assessment
    Submit {
        /// Job ID
        job_id: String,
        /// Candidate ID
        candidate_id: String,
        /// Answers as question=value; JSON values become numbers or lists
        #[arg(num_args = 0.., value_parser = parse_answer)]
        answers: Vec<(String, Answer)>,
    },
    /// List the responses submitted for a job
    List {
        /// Job ID
        job_id: String,
    },
}

/// `years=7` is a number, `skills=["rust","go"]` a list, anything else text
fn parse_answer(s: &str) -> Result<(String, Answer), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid question=value: no '=' found in '{}'", s))?;
    let answer = serde_json::from_str::<Answer>(value)
        .unwrap_or_else(|_| Answer::Text(value.to_string()));
    Ok((key.to_string(), answer))
}

#[derive(Serialize)]
#[serde(transparent)]
struct ResponseView(CandidateResponse);

impl fmt::Display for ResponseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        write!(
            f,
            "{}  candidate {}  submitted {}",
            r.id,
            r.candidate_id,
            r.submitted_at.format("%Y-%m-%d %H:%M")
        )?;
        for (question, answer) in &r.responses {
            let value = match answer {
                Answer::Number(n) => n.to_string(),
                Answer::Text(text) => text.clone(),
                Answer::Choices(choices) => choices.join(", "),
            };
            write!(f, "\n  {}: {}", question, value)?;
        }
        Ok(())
    }
}

pub async fn handle(command: ResponsesCommand, ctx: &Context, format: OutputFormat) -> Result<()> {
    let coordinator = ctx.coordinator().await?;
    let result = run(command, &coordinator, format).await;
    context::finish(&coordinator).await;
    result
}

async fn run(
    command: ResponsesCommand,
    coordinator: &Coordinator,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ResponsesCommand::Submit {
            job_id,
            candidate_id,
            answers,
        } => {
            let answers: BTreeMap<String, Answer> = answers.into_iter().collect();
            let response = coordinator
                .submit_response(&job_id, &candidate_id, answers)
                .await?;
            output::print(&ResponseView(response), format)
        }
        ResponsesCommand::List { job_id } => {
            let snapshot = coordinator.snapshot();
            let rows: Vec<ResponseView> = snapshot
                .responses_for_job(&job_id)
                .into_iter()
                .cloned()
                .map(ResponseView)
                .collect();
            output::print_rows(&rows, "No responses", format)
        }
    }
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
