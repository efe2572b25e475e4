// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tf - TalentFlow hiring pipeline CLI

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{assessments, candidates, init, jobs, responses};
use context::Context;
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "tf",
    version,
    about = "TalentFlow - jobs, candidates and assessments with optimistic updates"
)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the data directory if it is empty
    Init,
    /// Jobs board
    Jobs(jobs::JobsArgs),
    /// Candidate pipeline
    Candidates(candidates::CandidatesArgs),
    /// Assessments
    Assessments(assessments::AssessmentsArgs),
    /// Assessment responses
    Responses(responses::ResponsesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let ctx = Context::load(cli.data_dir, cli.config)?;

    match cli.command {
        Commands::Init => init::init(&ctx, cli.output).await,
        Commands::Jobs(args) => jobs::handle(args.command, &ctx, cli.output).await,
        Commands::Candidates(args) => candidates::handle(args.command, &ctx, cli.output).await,
        Commands::Assessments(args) => assessments::handle(args.command, &ctx, cli.output).await,
        Commands::Responses(args) => responses::handle(args.command, &ctx, cli.output).await,
    }
}

/// Logs go to stderr so stdout stays parseable
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
