//! Styles and platforms listings
//!
//! @module cli/catalog

use crate::cli::{connect, GlobalArgs};
use crate::core::error::Result;
use crate::generator::platform::PlatformCatalog;
use crate::output::{self, human, OutputFormat};
use clap::Args;

/// Arguments for the styles and platforms commands
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    covergen styles               One style per line
    covergen platforms --json     Name to size map")]
pub struct CatalogArgs {
    /// JSON output
    #[arg(long)]
    pub json: bool,
}

pub async fn styles(args: CatalogArgs, global: &GlobalArgs) -> Result<()> {
    let (_, api) = connect(global)?;
    let styles = api.styles().await?;
    print!(
        "{}",
        output::render(
            styles.as_slice(),
            OutputFormat::from_flag(args.json),
            human::styles
        )
    );
    Ok(())
}

pub async fn platforms(args: CatalogArgs, global: &GlobalArgs) -> Result<()> {
    let (config, api) = connect(global)?;
    let platforms = api.platforms().await?;

    match OutputFormat::from_flag(args.json) {
        OutputFormat::Json => println!("{}", output::json::format(&platforms)),
        OutputFormat::Human => {
            let catalog = PlatformCatalog::new(platforms);
            print!(
                "{}",
                human::platforms(&catalog, &config.generator.default_platform)
            );
        }
    }
    Ok(())
}
