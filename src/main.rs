//! covergen CLI entry point

use clap::Parser;
use covergen::cli::{Cli, Commands};
use covergen::core::error::{Result, GENERIC_NOTICE};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("COVERGEN_LOG"))
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        if !e.is_user_facing() {
            error!("{}", e);
        }
        eprintln!("{}", e.notice(GENERIC_NOTICE));
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;

    match cli.command {
        Commands::Generate(args) => covergen::cli::generate::run(args, &global).await,
        Commands::Styles(args) => covergen::cli::catalog::styles(args, &global).await,
        Commands::Platforms(args) => covergen::cli::catalog::platforms(args, &global).await,
        Commands::Dashboard(args) => covergen::cli::dashboard::run(args, &global).await,
        Commands::Admin(args) => covergen::cli::admin::run(args, &global).await,
        Commands::Feedback(args) => covergen::cli::feedback::run(args, &global).await,
        Commands::Banner(args) => covergen::cli::landing::banner(args).await,
        Commands::Stars(args) => covergen::cli::landing::stars(args).await,
        Commands::Config(args) => covergen::cli::config::run(args),
    }
}
