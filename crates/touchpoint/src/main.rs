mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init::run(force),
        Commands::Execute {
            url,
            referrer,
            now,
        } => commands::execute::run(&url, referrer.as_deref().unwrap_or(""), now),
        Commands::HookPageView => commands::hooks::hook_page_view(),
        Commands::History { json } => commands::history::run(json),
        Commands::Attributed { now, json } => commands::attributed::run(now, json),
        Commands::Channels => commands::channels::run(),
        Commands::Status => commands::status::run(),
        Commands::Reset => commands::reset::run(),
        Commands::Version => commands::version::run(),
    }
}
