//! Admin command implementation
//!
//! One subcommand per panel of the admin console, plus `watch`, which keeps
//! the overview on screen and refreshes it on a fixed interval.
//!
//! @module cli/admin

use crate::admin::poller::spawn_auto_refresh;
use crate::admin::{AdminController, AdminState, FeedbackFilter, FEEDBACK_STATUSES};
use crate::cli::{confirm_with, connect, GlobalArgs};
use crate::core::error::{Error, Result, GENERIC_NOTICE};
use crate::output::{self, human, OutputFormat};
use chrono::Utc;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Arguments for the admin command
#[derive(Args, Debug)]
#[command(after_help = "All admin commands need a session cookie of an admin account:
    covergen config set --session-cookie 'session=...'")]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Totals and today's activity
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// List users, optionally filtered by username or email
    #[command(after_help = "EXAMPLES:
    covergen admin users                  Everyone
    covergen admin users -q gmail.com     Username or email contains text")]
    Users {
        /// Case-insensitive search text
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Grant admin privileges
    Promote {
        /// User id (see `admin users`)
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Revoke admin privileges
    Demote {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a user and all their generations
    DeleteUser {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Read feedback
    Feedback {
        /// all, bug, feature, improvement or other
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: FeedbackFilter,

        #[arg(long)]
        json: bool,
    },

    /// Set the triage status of a feedback entry
    FeedbackStatus {
        id: i64,

        #[arg(value_parser = clap::builder::PossibleValuesParser::new(FEEDBACK_STATUSES))]
        status: String,
    },

    /// Delete a feedback entry
    DeleteFeedback {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// Export feedback to CSV
    #[command(after_help = "EXAMPLES:
    covergen admin export                 feedback_all_<date>.csv
    covergen admin export -t bug -o out/  Only bug reports")]
    Export {
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: FeedbackFilter,

        /// Directory to write into (default: generator.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generations per style
    Styles {
        #[arg(long)]
        json: bool,
    },

    /// Latest generations
    Recent {
        #[arg(long)]
        json: bool,
    },

    /// Latest signups
    NewUsers {
        #[arg(long)]
        json: bool,
    },

    /// Most active users
    Top {
        #[arg(long)]
        json: bool,
    },

    /// Daily signups and generations, last 30 days
    Activity {
        #[arg(long)]
        json: bool,
    },

    /// Keep the overview on screen, refreshing until Ctrl-C
    Watch {
        /// Seconds between refreshes (default: admin.refresh_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Run the admin command
pub async fn run(args: AdminArgs, global: &GlobalArgs) -> Result<()> {
    let (config, api) = connect(global)?;
    let admin = AdminController::new(api);

    match args.command {
        AdminCommand::Stats { json } => {
            let stats = admin.load_stats().await?;
            print!(
                "{}",
                output::render(&stats, OutputFormat::from_flag(json), human::stats)
            );
        }

        AdminCommand::Users { query, json } => {
            admin.load_all_users().await?;
            let users = admin.search_users(query.as_deref().unwrap_or(""));
            print!(
                "{}",
                output::render(
                    users.as_slice(),
                    OutputFormat::from_flag(json),
                    human::users
                )
            );
        }

        AdminCommand::Promote { id, yes } => {
            let username = lookup_username(&admin, id).await?;
            report_action(admin.promote_user(id, &username, confirm_with(yes)).await?);
        }

        AdminCommand::Demote { id, yes } => {
            let username = lookup_username(&admin, id).await?;
            report_action(admin.demote_user(id, &username, confirm_with(yes)).await?);
        }

        AdminCommand::DeleteUser { id, yes } => {
            let username = lookup_username(&admin, id).await?;
            report_action(admin.delete_user(id, &username, confirm_with(yes)).await?);
        }

        AdminCommand::Feedback { kind, json } => {
            admin.load_feedback().await?;
            let rows = admin.filter_feedback(kind);
            print!(
                "{}",
                output::render(
                    rows.as_slice(),
                    OutputFormat::from_flag(json),
                    human::feedback
                )
            );
        }

        AdminCommand::FeedbackStatus { id, status } => {
            let message = admin.update_feedback_status(id, &status).await?;
            println!("✓ {}", message);
        }

        AdminCommand::DeleteFeedback { id, yes } => {
            if admin.delete_feedback(id, confirm_with(yes)).await? {
                println!("✓ Feedback deleted");
            } else {
                println!("Cancelled");
            }
        }

        AdminCommand::Export { kind, output } => {
            admin.load_feedback().await?;
            admin.filter_feedback(kind);
            let dir = output.unwrap_or(config.generator.output_dir);
            let path = admin.export_feedback_csv(&dir, Utc::now().date_naive())?;
            println!("✓ Exported {}", path.display());
        }

        AdminCommand::Styles { json } => {
            let bars = admin.load_style_distribution().await?;
            print!(
                "{}",
                output::render(
                    bars.as_slice(),
                    OutputFormat::from_flag(json),
                    human::style_chart
                )
            );
        }

        AdminCommand::Recent { json } => {
            let recent = admin.load_recent_generations().await?;
            print!(
                "{}",
                output::render(
                    recent.as_slice(),
                    OutputFormat::from_flag(json),
                    human::recent_generations
                )
            );
        }

        AdminCommand::NewUsers { json } => {
            let users = admin.load_recent_users().await?;
            print!(
                "{}",
                output::render(
                    users.as_slice(),
                    OutputFormat::from_flag(json),
                    human::recent_users
                )
            );
        }

        AdminCommand::Top { json } => {
            let users = admin.load_top_users().await?;
            print!(
                "{}",
                output::render(
                    users.as_slice(),
                    OutputFormat::from_flag(json),
                    human::top_users
                )
            );
        }

        AdminCommand::Activity { json } => {
            let days = admin.load_user_activity().await?;
            print!(
                "{}",
                output::render(
                    days.as_slice(),
                    OutputFormat::from_flag(json),
                    human::activity
                )
            );
        }

        AdminCommand::Watch { interval } => {
            let secs = interval.unwrap_or(config.admin.refresh_secs);
            if secs == 0 {
                return Err(Error::validation("--interval must be at least 1 second"));
            }
            watch(admin, Duration::from_secs(secs)).await?;
        }
    }

    Ok(())
}

/// Username for the confirmation prompt; the users list is loaded first
async fn lookup_username(admin: &AdminController, id: i64) -> Result<String> {
    admin.load_all_users().await?;
    admin
        .cached_user(id)
        .map(|u| u.username)
        .ok_or_else(|| Error::validation(format!("No user with id {}", id)))
}

fn report_action(outcome: Option<String>) {
    match outcome {
        Some(message) => println!("✓ {}", message),
        None => println!("Cancelled"),
    }
}

async fn watch(admin: AdminController, period: Duration) -> Result<()> {
    let first = admin.refresh().await;
    draw_overview(&admin.snapshot(), &first.failures);

    let (handle, mut reports) = spawn_auto_refresh(admin.clone(), period);
    info!(period_secs = period.as_secs(), "Watching admin overview");

    loop {
        tokio::select! {
            Some(report) = reports.recv() => {
                draw_overview(&admin.snapshot(), &report.failures);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.abort();
    Ok(())
}

fn draw_overview(state: &AdminState, failures: &[String]) {
    // Clear screen, cursor home
    print!("\x1B[2J\x1B[H");

    if let Some(at) = state.refreshed_at {
        println!("Updated {}\n", at.format("%H:%M:%S UTC"));
    }
    if let Some(stats) = &state.stats {
        println!("{}", human::stats(stats));
    }
    println!("Recent generations\n");
    println!("{}", human::recent_generations(&state.recent_generations));
    println!(
        "Users: {}   Feedback: {}\n",
        state.users.len(),
        state.feedback.len()
    );

    if !failures.is_empty() {
        eprintln!("{}", GENERIC_NOTICE);
    }
}
