//! CLI command definitions and handlers

pub mod admin;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod feedback;
pub mod generate;
pub mod landing;

use crate::api::ApiClient;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::generator::DownloadedImage;
use clap::{Args, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LONG_ABOUT: &str = r#"
  ___ _____   _____ ___  ___ ___ _  _
 / __/ _ \ \ / / __| _ \/ __| __| \| |
| (_| (_) \ V /| _||   / (_ | _|| .` |
 \___\___/ \_/ |___|_|_\\___|___|_|\_|

AI blog cover images from your terminal.

QUICK START:
    1. covergen config set --base-url https://covers.example.com
    2. covergen generate -t "My first post"   Pick an image, size it, download it
    3. covergen dashboard list                See what you generated before

GENERATOR:
    covergen generate               Interactive: prompt, pick, preview, download
    covergen generate --pick 2      Non-interactive: take the second candidate
    covergen styles                 List image styles
    covergen platforms              List platform sizes

DASHBOARD (needs a session cookie):
    covergen dashboard list         Past generations
    covergen dashboard delete <id>  Delete a generation
    covergen dashboard download <id>

ADMIN (needs an admin session):
    covergen admin stats            Totals and today's activity
    covergen admin users -q <text>  Search users
    covergen admin feedback         Read feedback; export with `admin export`
    covergen admin watch            Refresh the overview until Ctrl-C

ENVIRONMENT:
    COVERGEN_URL     Overrides server.base_url
    COVERGEN_HOME    Overrides the config directory
    COVERGEN_LOG     Log filter, e.g. `covergen=debug`
"#;

/// Terminal client for the AI blog cover generator
#[derive(Parser, Debug)]
#[command(name = "covergen")]
#[command(author, version)]
#[command(about = "Terminal client for the AI blog cover generator")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Service base URL (overrides config and COVERGEN_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Session cookie for this invocation (`name=value`)
    #[arg(long, global = true)]
    pub cookie: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate cover images, pick one and download it
    #[command(visible_alias = "g")]
    Generate(generate::GenerateArgs),

    /// List the image styles the service offers
    Styles(catalog::CatalogArgs),

    /// List the target platforms and their sizes
    Platforms(catalog::CatalogArgs),

    /// Past generations of the signed-in user
    #[command(visible_alias = "d")]
    Dashboard(dashboard::DashboardArgs),

    /// Admin console
    Admin(admin::AdminArgs),

    /// Send feedback to the maintainers
    Feedback(feedback::FeedbackArgs),

    /// Play the landing page headline
    Banner(landing::BannerArgs),

    /// Show the project's GitHub star count
    Stars(landing::StarsArgs),

    /// Show or change the configuration
    Config(config::ConfigArgs),
}

/// Load config and build a client, applying command-line overrides
pub(crate) fn connect(global: &GlobalArgs) -> Result<(Config, ApiClient)> {
    let mut config = Config::load()?;
    if let Some(url) = &global.url {
        config.server.base_url = url.clone();
    }
    if let Some(cookie) = &global.cookie {
        config.server.session_cookie = Some(cookie.clone());
    }

    let api = ApiClient::from_config(&config)?;
    debug!(base_url = %api.base_url(), "Connected");
    Ok((config, api))
}

/// Confirmation callback for controller mutations; `--yes` skips the prompt
pub(crate) fn confirm_with(assume_yes: bool) -> impl FnOnce(&str) -> bool {
    move |question: &str| {
        assume_yes
            || Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact()
                .unwrap_or(false)
    }
}

/// Save downloaded bytes under `dir`
pub(crate) fn write_download(dir: &Path, image: &DownloadedImage) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(&image.filename);
    std::fs::write(&path, &image.bytes)?;
    info!(path = %path.display(), bytes = image.bytes.len(), "Saved image");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "covergen",
            "styles",
            "--url",
            "http://127.0.0.1:5000",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.global.url.as_deref(), Some("http://127.0.0.1:5000"));
        assert!(matches!(cli.command, Commands::Styles(ref a) if a.json));
    }

    #[test]
    fn test_write_download_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("covers");
        let image = DownloadedImage {
            filename: "blog-cover-devto.png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        let path = write_download(&target, &image).unwrap();
        assert_eq!(path, target.join("blog-cover-devto.png"));
        assert_eq!(std::fs::read(path).unwrap(), image.bytes);
    }

    #[test]
    fn test_confirm_with_yes_skips_prompt() {
        assert!(confirm_with(true)("Make ada an admin?"));
    }
}
