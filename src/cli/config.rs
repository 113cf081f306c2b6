//! Config command implementation

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use clap::{Args, Subcommand};

/// Arguments for the config command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    covergen config show
    covergen config set --base-url https://covers.example.com
    covergen config set --session-cookie 'session=eyJ...'
    covergen config set --clear-cookie")]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Change settings and save
    Set {
        /// Service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Session cookie (`name=value`)
        #[arg(long, conflicts_with = "clear_cookie")]
        session_cookie: Option<String>,

        /// Forget the stored session cookie
        #[arg(long)]
        clear_cookie: bool,

        /// Default image style
        #[arg(long)]
        style: Option<String>,

        /// Platform chosen when an image is picked
        #[arg(long)]
        platform: Option<String>,

        /// Seconds between `admin watch` refreshes
        #[arg(long)]
        refresh_secs: Option<u64>,
    },
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => {
            println!("{}", Config::config_path()?.display());
        }
        ConfigCommand::Set {
            base_url,
            session_cookie,
            clear_cookie,
            style,
            platform,
            refresh_secs,
        } => {
            let mut config = Config::load_file()?;
            if let Some(url) = base_url {
                url::Url::parse(&url)?;
                config.server.base_url = url;
            }
            if let Some(cookie) = session_cookie {
                config.server.session_cookie = Some(cookie);
            }
            if clear_cookie {
                config.server.session_cookie = None;
            }
            if let Some(style) = style {
                config.generator.default_style = Some(style);
            }
            if let Some(platform) = platform {
                config.generator.default_platform = platform;
            }
            if let Some(secs) = refresh_secs {
                if secs == 0 {
                    return Err(Error::validation("refresh_secs must be at least 1"));
                }
                config.admin.refresh_secs = secs;
            }
            let path = config.save()?;
            println!("✓ Saved {}", path.display());
        }
    }
    Ok(())
}
