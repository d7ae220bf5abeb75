pub mod api;
pub mod apply;
pub mod cli;
pub mod http;
pub mod model;
pub mod opts;

use std::io;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracer(&cli.log);

    match cli.subcommand {
        Commands::Serve { http, highlight } => {
            let runtime = Cli::create_runtime(cli.worker_threads)?;
            runtime.block_on(async move { http::run(http, highlight).await })
        }
        Commands::Apply { selection, action } => apply::run(selection, action),
        Commands::Prompt {
            selection,
            highlight,
        } => apply::prompt(selection, highlight),
    }
}

/// Logs go to stderr so `apply` and `prompt` keep stdout for their results.
fn init_tracer(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
