//! Wire types for the cover generator REST API
//!
//! Field names follow the server's JSON exactly; records are mirrored
//! verbatim and never reshaped on the client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// GENERATOR
// =============================================================================

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} × {}px", self.width, self.height)
    }
}

/// `GET /api/platforms` body
pub type PlatformMap = BTreeMap<String, Dimensions>;

/// `POST /api/generate` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_link: Option<String>,
}

/// `POST /api/generate` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub generation_id: String,
    pub images: Vec<String>,
}

/// One of the seven overlay anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    #[default]
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 7] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::Center,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Tag used on the wire and as the preview class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopCenter => "top-center",
            Anchor::TopRight => "top-right",
            Anchor::Center => "center",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl std::str::FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Anchor::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown position '{}'", s))
    }
}

/// Caption drawn by the server at download time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub font: String,
    /// `null` when the size field does not hold a number
    pub size: Option<u32>,
    pub color: String,
    pub position: Anchor,
    pub shadow: bool,
}

/// `POST /api/download` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub generation_id: String,
    pub selected_image_index: usize,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dims: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_overlay: Option<TextOverlay>,
}

/// `POST /api/save-selection` and `/api/update-selection` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub generation_id: String,
    pub selected_index: usize,
}

/// `POST /api/feedback` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// SHARED ENVELOPES
// =============================================================================

/// `{success, message}` / `{success: false, error}` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Error body attached to non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

// =============================================================================
// ADMIN
// =============================================================================

/// `GET /admin/api/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_users: u64,
    pub total_generations: u64,
    pub total_images: u64,
    pub users_today: u64,
    pub users_this_week: u64,
    pub users_this_month: u64,
    pub generations_today: u64,
    pub generations_this_week: u64,
    pub generations_this_month: u64,
}

/// `GET /admin/api/users` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: String,
    #[serde(default)]
    pub generation_count: u64,
}

/// `GET /admin/api/recent-users` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
    #[serde(default)]
    pub generation_count: u64,
}

/// `GET /admin/api/recent-generations` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentGeneration {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub style: String,
    pub created_at: String,
    #[serde(default)]
    pub image_count: u64,
}

/// `GET /admin/api/style-distribution` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCount {
    #[serde(default)]
    pub style: String,
    pub count: u64,
}

/// `GET /admin/api/top-users` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub generation_count: u64,
    pub created_at: String,
}

/// `GET /admin/api/user-activity` row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: String,
    pub users: u64,
    pub generations: u64,
}

/// Author block of a feedback record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAuthor {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `GET /admin/api/feedback` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rating: Option<u8>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: String,
    pub user: FeedbackAuthor,
}

/// `PUT /admin/api/feedback/:id/status` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

// =============================================================================
// GITHUB
// =============================================================================

/// Subset of the GitHub repository payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubRepo {
    pub stargazers_count: Option<u64>,
}
