//! Feedback command implementation

use crate::api::types::FeedbackSubmission;
use crate::cli::{connect, GlobalArgs};
use crate::core::error::{Error, Result};
use clap::Args;

/// Arguments for the feedback command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    covergen feedback \"Love the retro style\" -r 5
    covergen feedback -t bug \"Download fails for Custom 4000x4000\"")]
pub struct FeedbackArgs {
    /// What you want to tell us
    pub message: String,

    /// Kind of feedback
    #[arg(short = 't', long = "type", default_value = "other",
          value_parser = ["bug", "feature", "improvement", "other"])]
    pub kind: String,

    /// Rating from 1 to 5
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,

    /// Your name
    #[arg(long)]
    pub name: Option<String>,

    /// Where we can reach you
    #[arg(long)]
    pub email: Option<String>,
}

/// Run the feedback command
pub async fn run(args: FeedbackArgs, global: &GlobalArgs) -> Result<()> {
    let message = args.message.trim();
    if message.is_empty() {
        return Err(Error::validation("Please enter a message."));
    }

    let (_, api) = connect(global)?;
    let submission = FeedbackSubmission {
        kind: args.kind,
        rating: args.rating,
        message: message.to_string(),
        name: args.name.filter(|n| !n.trim().is_empty()),
        email: args.email.filter(|e| !e.trim().is_empty()),
    };

    let response = api.submit_feedback(&submission).await?;
    if response.success {
        println!(
            "✓ {}",
            response
                .message
                .unwrap_or_else(|| "Thank you for your feedback!".to_string())
        );
        Ok(())
    } else {
        Err(Error::api(
            response
                .error
                .unwrap_or_else(|| "Failed to submit feedback".to_string()),
        ))
    }
}
