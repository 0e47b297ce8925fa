use clap::Parser;
use miette::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lineup::cli::{Cli, Commands};

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lineup={}", level)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Commands::Analyze(args) => lineup::cli::commands::analyze::run(args, &cli.global),
        Commands::Rollup(args) => lineup::cli::commands::rollup::run(args, &cli.global),
        Commands::Lineup(args) => lineup::cli::commands::lineup::run(args, &cli.global),
        Commands::WhatIf(args) => lineup::cli::commands::whatif::run(args, &cli.global),
        Commands::Config(cmd) => lineup::cli::commands::config::run(cmd, &cli.global),
        Commands::Completions(args) => lineup::cli::commands::completions::run(args),
    }
}
