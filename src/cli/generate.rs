//! Generate command implementation
//!
//! Walks the two-step flow in the terminal: prompt → candidates → preview
//! (platform + caption) → download. With `--pick` it runs start to finish
//! without asking anything.
//!
//! @module cli/generate

use crate::api::types::Anchor;
use crate::cli::{connect, write_download, GlobalArgs};
use crate::core::config::Config;
use crate::core::error::{Error, Result, DOWNLOAD_NOTICE, GENERIC_NOTICE};
use crate::generator::overlay::COLOR_PRESETS;
use crate::generator::platform::{PlatformCatalog, CUSTOM};
use crate::generator::{
    GenerateForm, GeneratorController, GeneratorState, Step, DOWNLOADING_LABEL, GENERATING_LABEL,
};
use crate::output::{self, human};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Arguments for the generate command
#[derive(Args, Debug, Default)]
#[command(after_help = "EXAMPLES:
    covergen generate                                 Fully interactive
    covergen generate -t \"Rust error handling\" -s Minimalist
    covergen generate -t \"Launch week\" --pick 1 --platform Dev.to
    covergen generate -p \"neon city at dusk\" --pick 3 --text \"Launch week\" --position bottom-center
    covergen generate -t \"Notes\" --pick 1 --platform Custom --width 1600 --height 900 -o covers/")]
pub struct GenerateArgs {
    /// Article title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Custom image prompt (used instead of the title when given)
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Link to the draft, for extra context
    #[arg(long)]
    pub draft_link: Option<String>,

    /// Image style
    #[arg(short, long)]
    pub style: Option<String>,

    /// Take candidate N (1-based) and download without prompting
    #[arg(long)]
    pub pick: Option<usize>,

    /// Target platform (see `covergen platforms`)
    #[arg(long)]
    pub platform: Option<String>,

    /// Custom width in pixels (platform Custom)
    #[arg(long)]
    pub width: Option<String>,

    /// Custom height in pixels (platform Custom)
    #[arg(long)]
    pub height: Option<String>,

    /// Caption drawn over the image
    #[arg(long)]
    pub text: Option<String>,

    /// Caption font family
    #[arg(long)]
    pub font: Option<String>,

    /// Caption size in pixels
    #[arg(long)]
    pub size: Option<String>,

    /// Caption colour, e.g. #ffd700
    #[arg(long, conflicts_with = "preset")]
    pub color: Option<String>,

    /// Caption colour preset N (1-6)
    #[arg(long)]
    pub preset: Option<usize>,

    /// Caption position
    #[arg(long, value_parser = parse_anchor)]
    pub position: Option<Anchor>,

    /// Draw the caption without a drop shadow
    #[arg(long)]
    pub no_shadow: bool,

    /// Directory to save the image in (default: generator.output_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the pick to your dashboard
    #[arg(long)]
    pub save: bool,

    /// Open the saved image
    #[arg(long)]
    pub open: bool,

    /// JSON output (requires --pick)
    #[arg(long, requires = "pick")]
    pub json: bool,
}

fn parse_anchor(s: &str) -> std::result::Result<Anchor, String> {
    s.parse()
}

/// Interactive preview menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Download,
    Platform,
    Overlay,
    Save,
    Back,
    StartOver,
    Quit,
}

const ACTIONS: [(Action, &str); 7] = [
    (Action::Download, "⬇ Download Image"),
    (Action::Platform, "Change platform"),
    (Action::Overlay, "Edit text overlay"),
    (Action::Save, "Save to dashboard"),
    (Action::Back, "Back to images"),
    (Action::StartOver, "Start over"),
    (Action::Quit, "Quit"),
];

/// Run the generate command
pub async fn run(args: GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let (config, api) = connect(global)?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.generator.output_dir.clone());

    let mut controller = GeneratorController::new(api);
    controller.load_catalog().await;
    apply_overlay_args(controller.state_mut(), &args)?;
    controller
        .state_mut()
        .set_custom_dimensions(args.width.as_deref(), args.height.as_deref());

    match args.pick {
        Some(pick) => run_once(&mut controller, &args, &config, &output_dir, pick).await,
        None => run_interactive(&mut controller, &args, &config, &output_dir).await,
    }
}

// =============================================================================
// ONE-SHOT
// =============================================================================

async fn run_once(
    controller: &mut GeneratorController,
    args: &GenerateArgs,
    config: &Config,
    output_dir: &Path,
    pick: usize,
) -> Result<()> {
    let index = pick
        .checked_sub(1)
        .ok_or_else(|| Error::validation("--pick counts from 1"))?;

    let form = form_from_args(args, config, controller.state());
    if !args.json {
        eprintln!("{}", GENERATING_LABEL);
    }
    controller.generate(&form).await?;

    controller.select_image(index)?;
    remember(controller).await;
    apply_platform_args(controller.state_mut(), args, config)?;

    if !args.json {
        print!("{}", human::preview(controller.state()));
        eprintln!("{}", DOWNLOADING_LABEL);
    }
    let path = download(controller, output_dir, args.open).await?;

    let saved = if args.save {
        Some(controller.save_selection().await?)
    } else {
        None
    };

    if args.json {
        let state = controller.state();
        let report = serde_json::json!({
            "generation_id": state.session().map(|s| s.generation_id.clone()),
            "images": state.session().map(|s| s.images.clone()).unwrap_or_default(),
            "selected_index": index,
            "platform": state.platform(),
            "path": path,
            "saved": saved,
        });
        println!("{}", output::json::format(&report));
    } else {
        println!("✓ Saved {}", path.display());
        if let Some(message) = saved {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

// =============================================================================
// INTERACTIVE
// =============================================================================

async fn run_interactive(
    controller: &mut GeneratorController,
    args: &GenerateArgs,
    config: &Config,
    output_dir: &Path,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut form = if args.title.is_some() || args.prompt.is_some() {
        form_from_args(args, config, controller.state())
    } else {
        prompt_form(&theme, args, config, controller.state(), &seed_form(args))?
    };

    'generate: loop {
        eprintln!("{}", GENERATING_LABEL);
        if let Err(e) = controller.generate(&form).await {
            report(&e, GENERIC_NOTICE);
            let retry = Confirm::with_theme(&theme)
                .with_prompt("Try again?")
                .default(true)
                .interact()?;
            if !retry {
                return Ok(());
            }
            form = prompt_form(&theme, args, config, controller.state(), &form)?;
            continue 'generate;
        }

        'select: loop {
            let Some(session) = controller.state().session() else {
                return Ok(());
            };
            println!();
            print!("{}", human::candidates(&session.images));
            let items: Vec<String> = session
                .images
                .iter()
                .enumerate()
                .map(|(i, url)| format!("Image {}: {}", i + 1, human::describe_image(url)))
                .collect();

            let index = Select::with_theme(&theme)
                .with_prompt("Choose an image")
                .items(&items)
                .default(0)
                .interact()?;

            controller.select_image(index)?;
            remember(controller).await;
            if let Err(e) = apply_platform_args(controller.state_mut(), args, config) {
                report(&e, GENERIC_NOTICE);
            }

            loop {
                println!();
                print!("{}", human::preview(controller.state()));

                let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
                let choice = Select::with_theme(&theme)
                    .with_prompt("Next")
                    .items(&labels)
                    .default(0)
                    .interact()?;

                match ACTIONS[choice].0 {
                    Action::Download => {
                        eprintln!("{}", DOWNLOADING_LABEL);
                        match download(controller, output_dir, args.open).await {
                            Ok(path) => println!("✓ Saved {}", path.display()),
                            Err(e) => report(&e, notice_for(Action::Download)),
                        }
                    }
                    Action::Platform => {
                        if let Err(e) = choose_platform(&theme, controller.state_mut()) {
                            report(&e, GENERIC_NOTICE);
                        }
                    }
                    Action::Overlay => edit_overlay(&theme, controller.state_mut())?,
                    Action::Save => match controller.save_selection().await {
                        Ok(message) => println!("✓ {}", message),
                        Err(e) => report(&e, notice_for(Action::Save)),
                    },
                    Action::Back => {
                        controller.state_mut().back_to_selection();
                        continue 'select;
                    }
                    Action::StartOver => {
                        controller.state_mut().navigate_to(Step::Input);
                        form =
                            prompt_form(&theme, args, config, controller.state(), &seed_form(args))?;
                        continue 'generate;
                    }
                    Action::Quit => return Ok(()),
                }
            }
        }
    }
}

/// Ask for the form, starting from `seed`'s values
fn prompt_form(
    theme: &ColorfulTheme,
    args: &GenerateArgs,
    config: &Config,
    state: &GeneratorState,
    seed: &GenerateForm,
) -> Result<GenerateForm> {
    let article_title: String = Input::with_theme(theme)
        .with_prompt("Article title")
        .with_initial_text(seed.article_title.clone())
        .allow_empty(true)
        .interact_text()?;
    let custom_prompt: String = Input::with_theme(theme)
        .with_prompt("Custom prompt (optional)")
        .with_initial_text(seed.custom_prompt.clone())
        .allow_empty(true)
        .interact_text()?;
    let draft_link: String = Input::with_theme(theme)
        .with_prompt("Draft link (optional)")
        .with_initial_text(seed.draft_link.clone())
        .allow_empty(true)
        .interact_text()?;

    let style = match preset_style(args, config) {
        Some(style) => style,
        None if state.styles().is_empty() => String::new(),
        None => {
            let index = Select::with_theme(theme)
                .with_prompt("Style")
                .items(state.styles())
                .default(style_index(state, &seed.style))
                .interact()?;
            state.styles()[index].clone()
        }
    };

    Ok(GenerateForm {
        custom_prompt,
        article_title,
        draft_link,
        style,
    })
}

fn choose_platform(theme: &ColorfulTheme, state: &mut GeneratorState) -> Result<()> {
    let entries: Vec<(String, String)> = state
        .catalog()
        .iter()
        .map(|(name, dims)| {
            (
                name.to_string(),
                format!("{} ({})", name, PlatformCatalog::label(name, dims)),
            )
        })
        .collect();
    if entries.is_empty() {
        return Err(Error::validation("No platforms available."));
    }

    let current = entries
        .iter()
        .position(|(name, _)| name == state.platform())
        .unwrap_or(0);
    let labels: Vec<&str> = entries.iter().map(|(_, label)| label.as_str()).collect();
    let index = Select::with_theme(theme)
        .with_prompt("Platform")
        .items(&labels)
        .default(current)
        .interact()?;

    let name = entries[index].0.clone();
    state.set_platform(&name)?;

    if state.custom_inputs_visible() {
        let width: String = Input::with_theme(theme)
            .with_prompt("Width (px)")
            .with_initial_text(state.custom.width.clone())
            .allow_empty(true)
            .interact_text()?;
        let height: String = Input::with_theme(theme)
            .with_prompt("Height (px)")
            .with_initial_text(state.custom.height.clone())
            .allow_empty(true)
            .interact_text()?;
        state.set_custom_dimensions(Some(&width), Some(&height));
    }
    Ok(())
}

fn edit_overlay(theme: &ColorfulTheme, state: &mut GeneratorState) -> Result<()> {
    let overlay = &mut state.overlay;

    overlay.text = Input::with_theme(theme)
        .with_prompt("Text (empty for none)")
        .with_initial_text(overlay.text.clone())
        .allow_empty(true)
        .interact_text()?;
    if !overlay.has_text() {
        return Ok(());
    }

    overlay.font = Input::with_theme(theme)
        .with_prompt("Font")
        .with_initial_text(overlay.font.clone())
        .interact_text()?;
    overlay.size = Input::with_theme(theme)
        .with_prompt("Size (px)")
        .with_initial_text(overlay.size.clone())
        .interact_text()?;

    let mut swatches: Vec<String> = COLOR_PRESETS.iter().map(|c| c.to_string()).collect();
    swatches.push("Custom colour...".to_string());
    let current = overlay.active_preset().unwrap_or(COLOR_PRESETS.len());
    let swatch = Select::with_theme(theme)
        .with_prompt("Colour")
        .items(&swatches)
        .default(current)
        .interact()?;
    if swatch < COLOR_PRESETS.len() {
        overlay.choose_preset(swatch)?;
    } else {
        let color: String = Input::with_theme(theme)
            .with_prompt("Colour")
            .with_initial_text(overlay.color().to_string())
            .interact_text()?;
        overlay.set_custom_color(color);
    }

    let anchors: Vec<&str> = Anchor::ALL.iter().map(|a| a.as_str()).collect();
    let current = Anchor::ALL
        .iter()
        .position(|a| *a == overlay.position)
        .unwrap_or(0);
    let position = Select::with_theme(theme)
        .with_prompt("Position")
        .items(&anchors)
        .default(current)
        .interact()?;
    overlay.position = Anchor::ALL[position];

    overlay.shadow = Confirm::with_theme(theme)
        .with_prompt("Drop shadow?")
        .default(overlay.shadow)
        .interact()?;
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

/// Starting values for a blank form: whatever text flags were given
fn seed_form(args: &GenerateArgs) -> GenerateForm {
    GenerateForm {
        custom_prompt: args.prompt.clone().unwrap_or_default(),
        article_title: args.title.clone().unwrap_or_default(),
        draft_link: args.draft_link.clone().unwrap_or_default(),
        style: String::new(),
    }
}

fn style_index(state: &GeneratorState, style: &str) -> usize {
    state
        .styles()
        .iter()
        .position(|s| s == style)
        .unwrap_or(0)
}

fn preset_style(args: &GenerateArgs, config: &Config) -> Option<String> {
    args.style
        .clone()
        .or_else(|| config.generator.default_style.clone())
}

/// Form straight from flags; the first listed style stands in when none is given
fn form_from_args(args: &GenerateArgs, config: &Config, state: &GeneratorState) -> GenerateForm {
    GenerateForm {
        custom_prompt: args.prompt.clone().unwrap_or_default(),
        article_title: args.title.clone().unwrap_or_default(),
        draft_link: args.draft_link.clone().unwrap_or_default(),
        style: preset_style(args, config)
            .or_else(|| state.styles().first().cloned())
            .unwrap_or_default(),
    }
}

fn apply_overlay_args(state: &mut GeneratorState, args: &GenerateArgs) -> Result<()> {
    let overlay = &mut state.overlay;
    if let Some(text) = &args.text {
        overlay.text = text.clone();
    }
    if let Some(font) = &args.font {
        overlay.font = font.clone();
    }
    if let Some(size) = &args.size {
        overlay.size = size.clone();
    }
    if let Some(preset) = args.preset {
        let index = preset
            .checked_sub(1)
            .ok_or_else(|| Error::validation("--preset counts from 1"))?;
        overlay.choose_preset(index)?;
    }
    if let Some(color) = &args.color {
        overlay.set_custom_color(color.clone());
    }
    if let Some(position) = args.position {
        overlay.position = position;
    }
    if args.no_shadow {
        overlay.shadow = false;
    }
    Ok(())
}

/// Selecting an image resets the platform, so flags and config are applied after it
fn apply_platform_args(
    state: &mut GeneratorState,
    args: &GenerateArgs,
    config: &Config,
) -> Result<()> {
    let wanted = args
        .platform
        .as_deref()
        .unwrap_or(config.generator.default_platform.as_str());
    if wanted == state.platform() {
        return Ok(());
    }
    if args.platform.is_none() && !state.catalog().contains(wanted) {
        debug!(platform = wanted, "Configured platform not offered, keeping default");
        return Ok(());
    }
    state.set_platform(wanted)?;
    if wanted == CUSTOM {
        debug!(dims = ?state.preview_dimensions(), "Custom size");
    }
    Ok(())
}

async fn download(
    controller: &mut GeneratorController,
    output_dir: &Path,
    open_after: bool,
) -> Result<PathBuf> {
    let image = controller.download().await?;
    let path = write_download(output_dir, &image)?;
    if open_after {
        open::that(&path)?;
    }
    Ok(path)
}

/// Best-effort: keeps a guest's pick across signing up
async fn remember(controller: &GeneratorController) {
    if let Err(e) = controller.remember_selection().await {
        debug!("Could not remember selection: {}", e);
    }
}

/// Fallback shown when a menu action fails without a message of its own
fn notice_for(action: Action) -> &'static str {
    match action {
        Action::Download => DOWNLOAD_NOTICE,
        _ => GENERIC_NOTICE,
    }
}

fn report(e: &Error, fallback: &str) {
    if !e.is_user_facing() {
        warn!("{}", e);
    }
    eprintln!("{}", e.notice(fallback));
}
