//! Landing page commands: typewriter banner and star count
//!
//! @module cli/landing

use crate::api::github::{star_label, GithubClient};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::landing::typewriter::{Typewriter, WORD_PAUSE};
use clap::Args;
use std::io::Write;

/// Arguments for the banner command
#[derive(Args, Debug)]
pub struct BannerArgs {
    /// Stop after this many phrases (default: run until Ctrl-C)
    #[arg(short = 'n', long)]
    pub phrases: Option<usize>,

    /// Phrase to type instead of the built-in ones (repeatable)
    #[arg(long = "phrase")]
    pub custom: Vec<String>,
}

/// Arguments for the stars command
#[derive(Args, Debug)]
pub struct StarsArgs {
    /// Repository as owner/name (default: landing.github_repo)
    #[arg(long)]
    pub repo: Option<String>,

    #[arg(long)]
    pub json: bool,
}

pub async fn banner(args: BannerArgs) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut shown = 0;

    for frame in Typewriter::new(args.custom).unwrap_or_default() {
        write!(stdout, "\r\x1B[2KCreate {}▌", frame.text)?;
        stdout.flush()?;

        if frame.delay == WORD_PAUSE {
            shown += 1;
            if args.phrases.is_some_and(|limit| shown >= limit) {
                break;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(frame.delay) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    writeln!(stdout)?;
    Ok(())
}

pub async fn stars(args: StarsArgs) -> Result<()> {
    let config = Config::load()?;
    let repo = args.repo.unwrap_or(config.landing.github_repo);
    let count = GithubClient::new(&config.landing.github_api)
        .stars(&repo)
        .await;

    if args.json {
        let value = serde_json::json!({ "repo": repo, "stars": count });
        println!("{}", crate::output::json::format(&value));
    } else {
        println!("{}  {}", repo, star_label(count));
    }
    Ok(())
}
