//! Dashboard command implementation
//!
//! @module cli/dashboard

use crate::cli::{confirm_with, connect, write_download, GlobalArgs};
use crate::core::error::{Error, Result};
use crate::dashboard::{DashboardController, DeleteOutcome, Modal};
use crate::output::{self, human, OutputFormat};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the dashboard command
#[derive(Args, Debug)]
pub struct DashboardArgs {
    #[command(subcommand)]
    pub command: DashboardCommand,
}

#[derive(Subcommand, Debug)]
pub enum DashboardCommand {
    /// List past generations
    #[command(visible_alias = "ls")]
    List {
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Delete a generation
    #[command(after_help = "EXAMPLES:
    covergen dashboard delete 6f1c2a      Asks before deleting
    covergen dashboard delete 6f1c2a -y   No prompt")]
    Delete {
        /// Generation id (see `dashboard list`)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Download a generation at the default platform size
    Download {
        /// Generation id
        id: String,

        /// Directory to save the image in (default: generator.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the saved image
        #[arg(long)]
        open: bool,
    },

    /// Open a generation's image in the browser
    View {
        /// Generation id
        id: String,
    },
}

/// Run the dashboard command
pub async fn run(args: DashboardArgs, global: &GlobalArgs) -> Result<()> {
    let (config, api) = connect(global)?;
    let mut controller = DashboardController::new(api.clone());

    match args.command {
        DashboardCommand::List { json } => {
            controller.reload().await?;
            print!(
                "{}",
                output::render(
                    controller.state().cards(),
                    OutputFormat::from_flag(json),
                    human::cards
                )
            );
        }

        DashboardCommand::Delete { id, yes } => {
            controller.reload().await?;
            let title = controller
                .state()
                .card(&id)
                .map(|c| c.title.clone())
                .ok_or_else(|| Error::validation(format!("No generation with id '{}'", id)))?;

            controller.state_mut().request_delete(&id, &title);
            let question = format!("Delete \"{}\"? This cannot be undone.", title);
            if !confirm_with(yes)(&question) {
                controller.state_mut().on_key(crate::dashboard::ESCAPE);
                println!("Cancelled");
                return Ok(());
            }

            match controller.confirm_delete().await? {
                DeleteOutcome::Removed { remaining, .. } => {
                    println!("✓ Deleted \"{}\" ({} left)", title, remaining);
                }
                DeleteOutcome::Reloaded { cards } => {
                    println!("✓ Deleted \"{}\"", title);
                    if cards == 0 {
                        print!("{}", human::cards(&[]));
                    }
                }
            }
        }

        DashboardCommand::Download { id, output, open } => {
            let dir = output.unwrap_or(config.generator.output_dir);
            let image = controller.redownload(&id).await?;
            let path = write_download(&dir, &image)?;
            println!("✓ Saved {}", path.display());
            if open {
                open::that(&path)?;
            }
        }

        DashboardCommand::View { id } => {
            controller.reload().await?;
            let url = controller
                .state()
                .card(&id)
                .and_then(|c| c.image_url.clone())
                .ok_or_else(|| Error::validation(format!("No image for generation '{}'", id)))?;

            controller.state_mut().open_image(api.url(&url));
            if let Modal::Image { url } = controller.state().modal() {
                println!("{}", url);
                open::that(url)?;
            }
        }
    }

    Ok(())
}
