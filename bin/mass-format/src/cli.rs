pub use clap::{self, Parser};

use crate::opts::{ActionOpts, HighlightOpts, HttpOpts, SelectionOpts};

#[derive(Parser, Debug)]
#[clap(
    name = "mass-format",
    version,
    about,
    rename_all = "kebab-case",
    rename_all_env = "screaming-snake"
)]
pub struct Cli {
    /// Log filter, in `tracing` env-filter syntax
    #[arg(long, global = true, env = "MASS_FORMAT_LOG", default_value = "info")]
    pub log: String,

    /// Tokio worker threads (optional override)
    #[arg(long, env = "MASS_FORMAT_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Subcommands
    #[clap(subcommand)]
    pub subcommand: Commands,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve a shared document over HTTP and WebSocket
    Serve {
        #[clap(flatten)]
        http: HttpOpts,

        #[clap(flatten)]
        highlight: HighlightOpts,
    },
    /// Highlight (or clear) the selected phrase everywhere in a JSON document
    Apply {
        #[clap(flatten)]
        selection: SelectionOpts,

        #[clap(flatten)]
        action: ActionOpts,
    },
    /// Print the selected phrase and its current highlight color
    Prompt {
        #[clap(flatten)]
        selection: SelectionOpts,

        #[clap(flatten)]
        highlight: HighlightOpts,
    },
}

impl Cli {
    pub fn create_runtime(
        worker_threads: Option<usize>,
    ) -> anyhow::Result<tokio::runtime::Runtime> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        if let Some(n) = worker_threads {
            builder.worker_threads(n);
        }
        builder.enable_all().build().map_err(Into::into)
    }
}
