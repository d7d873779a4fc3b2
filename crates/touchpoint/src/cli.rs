use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "touchpoint")]
#[command(version)]
#[command(about = "Marketing channel attribution for page views")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample touchpoint.json
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Process one page view
    Execute {
        /// Page URL including the query string
        #[arg(short, long)]
        url: String,

        /// Referring URL (empty when omitted)
        #[arg(short, long)]
        referrer: Option<String>,

        /// Evaluation time in seconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Hook: Process a page view (stdin/stdout JSON)
    #[command(name = "hook:page-view")]
    HookPageView,

    /// Show recorded touchpoint history
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show touchpoints currently credited
    Attributed {
        /// Evaluation time in seconds since epoch (defaults to now)
        #[arg(long)]
        now: Option<i64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured channels
    Channels,

    /// Show paths, storage tiers and state summary
    Status,

    /// Clear recorded attribution state
    Reset,

    /// Print version information
    Version,
}
