//! Admin controller
//!
//! Loads and renders stats, users and feedback, and runs user/feedback
//! mutations behind an explicit confirmation. Cached lists live in a
//! controller-local `AdminState`; searching and filtering derive subsets
//! from the cache and never refetch or mutate it.
//!
//! @module admin

pub mod chart;
pub mod csv;
pub mod poller;

use crate::api::types::{
    ActionResponse, ActivityDay, FeedbackRow, RecentGeneration, RecentUser, Stats, TopUser,
    UserRow,
};
use crate::api::ApiClient;
use crate::core::error::{Error, Result};
use chart::StyleBar;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Values accepted by the feedback status endpoint
pub const FEEDBACK_STATUSES: [&str; 4] = ["new", "in-progress", "resolved", "closed"];

// =============================================================================
// FILTERS
// =============================================================================

/// Feedback type facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackFilter {
    #[default]
    All,
    Bug,
    Feature,
    Improvement,
    Other,
}

impl FeedbackFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackFilter::All => "all",
            FeedbackFilter::Bug => "bug",
            FeedbackFilter::Feature => "feature",
            FeedbackFilter::Improvement => "improvement",
            FeedbackFilter::Other => "other",
        }
    }

    pub fn matches(&self, kind: &str) -> bool {
        *self == FeedbackFilter::All || self.as_str() == kind
    }
}

impl std::str::FromStr for FeedbackFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(FeedbackFilter::All),
            "bug" => Ok(FeedbackFilter::Bug),
            "feature" => Ok(FeedbackFilter::Feature),
            "improvement" => Ok(FeedbackFilter::Improvement),
            "other" => Ok(FeedbackFilter::Other),
            _ => Err(format!(
                "unknown feedback type '{}' (expected all, bug, feature, improvement or other)",
                s
            )),
        }
    }
}

/// Case-insensitive substring match over username or email; blank query keeps all
pub fn search_users<'a>(users: &'a [UserRow], query: &str) -> Vec<&'a UserRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.iter().collect();
    }

    users
        .iter()
        .filter(|u| {
            u.username.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn filter_feedback(rows: &[FeedbackRow], filter: FeedbackFilter) -> Vec<&FeedbackRow> {
    rows.iter().filter(|fb| filter.matches(&fb.kind)).collect()
}

/// Images per generation; zero generations give 0
pub fn images_per_generation(stats: &Stats) -> f64 {
    if stats.total_generations == 0 {
        0.0
    } else {
        stats.total_images as f64 / stats.total_generations as f64
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Controller-local cache; each list is written only by its own loader
#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub stats: Option<Stats>,
    pub users: Vec<UserRow>,
    pub user_query: String,
    pub feedback: Vec<FeedbackRow>,
    pub feedback_filter: FeedbackFilter,
    pub recent_generations: Vec<RecentGeneration>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl AdminState {
    pub fn visible_users(&self) -> Vec<UserRow> {
        search_users(&self.users, &self.user_query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn visible_feedback(&self) -> Vec<FeedbackRow> {
        filter_feedback(&self.feedback, self.feedback_filter)
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Outcome of one auto-refresh round
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub at: DateTime<Utc>,
    pub failures: Vec<String>,
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Clone)]
pub struct AdminController {
    api: ApiClient,
    state: Arc<Mutex<AdminState>>,
}

impl AdminController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(AdminState::default())),
        }
    }

    /// Copy of the current cache
    pub fn snapshot(&self) -> AdminState {
        self.state.lock().clone()
    }

    // -------------------------------------------------------------------------
    // Loaders
    // -------------------------------------------------------------------------

    pub async fn load_stats(&self) -> Result<Stats> {
        let stats = self.api.stats().await?;
        self.state.lock().stats = Some(stats.clone());
        Ok(stats)
    }

    /// Refetch users; returns the list with the current search applied
    pub async fn load_all_users(&self) -> Result<Vec<UserRow>> {
        let users = self.api.users().await?;
        let mut state = self.state.lock();
        state.users = users;
        Ok(state.visible_users())
    }

    /// Filter the cached users; no request is made
    pub fn search_users(&self, query: &str) -> Vec<UserRow> {
        let mut state = self.state.lock();
        state.user_query = query.to_string();
        state.visible_users()
    }

    pub async fn load_feedback(&self) -> Result<Vec<FeedbackRow>> {
        let feedback = self.api.feedback().await?;
        let mut state = self.state.lock();
        state.feedback = feedback;
        Ok(state.visible_feedback())
    }

    /// Change the type facet over the cached feedback
    pub fn filter_feedback(&self, filter: FeedbackFilter) -> Vec<FeedbackRow> {
        let mut state = self.state.lock();
        state.feedback_filter = filter;
        state.visible_feedback()
    }

    pub async fn load_recent_generations(&self) -> Result<Vec<RecentGeneration>> {
        let recent = self.api.recent_generations().await?;
        self.state.lock().recent_generations = recent.clone();
        Ok(recent)
    }

    pub async fn load_style_distribution(&self) -> Result<Vec<StyleBar>> {
        let styles = self.api.style_distribution().await?;
        Ok(chart::style_bars(&styles))
    }

    pub async fn load_top_users(&self) -> Result<Vec<TopUser>> {
        self.api.top_users().await
    }

    pub async fn load_recent_users(&self) -> Result<Vec<RecentUser>> {
        self.api.recent_users().await
    }

    pub async fn load_user_activity(&self) -> Result<Vec<ActivityDay>> {
        self.api.user_activity().await
    }

    /// Reload the auto-refreshed sections; failures are logged, not raised
    pub async fn refresh(&self) -> RefreshReport {
        let (stats, users, recent, feedback) = futures::join!(
            self.load_stats(),
            self.load_all_users(),
            self.load_recent_generations(),
            self.load_feedback(),
        );

        let mut failures = Vec::new();
        for (section, err) in [
            ("stats", stats.err()),
            ("users", users.err()),
            ("recent generations", recent.err()),
            ("feedback", feedback.err()),
        ] {
            if let Some(e) = err {
                warn!("Error loading {}: {}", section, e);
                failures.push(format!("{}: {}", section, e));
            }
        }

        let at = Utc::now();
        self.state.lock().refreshed_at = Some(at);
        RefreshReport { at, failures }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Returns None when the user declines
    pub async fn promote_user(
        &self,
        user_id: i64,
        username: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<String>> {
        if !confirm(&format!("Make {} an admin?", username)) {
            return Ok(None);
        }
        let response = self.api.promote_user(user_id).await?;
        let message = action_result(response, "Failed to promote user")?;
        info!(user_id, "Promoted user");
        self.reload_users().await;
        Ok(Some(message))
    }

    pub async fn demote_user(
        &self,
        user_id: i64,
        username: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<String>> {
        if !confirm(&format!("Remove admin privileges from {}?", username)) {
            return Ok(None);
        }
        let response = self.api.demote_user(user_id).await?;
        let message = action_result(response, "Failed to demote user")?;
        info!(user_id, "Demoted user");
        self.reload_users().await;
        Ok(Some(message))
    }

    /// Deleting a user changes the totals, so stats reload too
    pub async fn delete_user(
        &self,
        user_id: i64,
        username: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<String>> {
        let question = format!(
            "Are you sure you want to delete user \"{}\"? This action cannot be undone and will delete all their generations.",
            username
        );
        if !confirm(&question) {
            return Ok(None);
        }
        let response = self.api.delete_user(user_id).await?;
        let message = action_result(response, "Failed to delete user")?;
        info!(user_id, "Deleted user");
        self.reload_users().await;
        if let Err(e) = self.load_stats().await {
            warn!("Error loading stats: {}", e);
        }
        Ok(Some(message))
    }

    /// Returns false when the user declines
    pub async fn delete_feedback(
        &self,
        feedback_id: i64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool> {
        if !confirm("Are you sure you want to delete this feedback?") {
            return Ok(false);
        }
        self.api.delete_feedback(feedback_id).await?;
        if let Err(e) = self.load_feedback().await {
            warn!("Error loading feedback: {}", e);
        }
        Ok(true)
    }

    pub async fn update_feedback_status(&self, feedback_id: i64, status: &str) -> Result<String> {
        if !FEEDBACK_STATUSES.contains(&status) {
            return Err(Error::validation("Invalid status"));
        }
        let response = self.api.update_feedback_status(feedback_id, status).await?;
        let message = action_result(response, "Failed to update status")?;
        if let Err(e) = self.load_feedback().await {
            warn!("Error loading feedback: {}", e);
        }
        Ok(message)
    }

    /// Write the currently filtered feedback to `dir`; returns the file path
    pub fn export_feedback_csv(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        let (content, filter) = {
            let state = self.state.lock();
            let rows = filter_feedback(&state.feedback, state.feedback_filter);
            (csv::feedback_csv(&rows)?, state.feedback_filter)
        };

        let path = dir.join(csv::export_filename(filter, today));
        std::fs::write(&path, content)?;
        info!(path = %path.display(), "Exported feedback");
        Ok(path)
    }

    /// User row from the cache, for confirmation prompts
    pub fn cached_user(&self, user_id: i64) -> Option<UserRow> {
        self.state
            .lock()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    async fn reload_users(&self) {
        if let Err(e) = self.load_all_users().await {
            warn!("Error loading users: {}", e);
        }
    }
}

/// Server message on success; server error or `fallback` otherwise
fn action_result(response: ActionResponse, fallback: &str) -> Result<String> {
    if response.success {
        Ok(response.message.unwrap_or_default())
    } else {
        Err(Error::api(
            response.error.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::FeedbackAuthor;

    fn user(id: i64, username: &str, email: &str) -> UserRow {
        UserRow {
            id,
            username: username.to_string(),
            email: email.to_string(),
            is_admin: false,
            created_at: "2024-01-01T00:00:00".to_string(),
            generation_count: 0,
        }
    }

    fn feedback(id: i64, kind: &str) -> FeedbackRow {
        FeedbackRow {
            id,
            kind: kind.to_string(),
            rating: Some(5),
            message: "msg".to_string(),
            status: None,
            created_at: "2024-01-01T00:00:00".to_string(),
            user: FeedbackAuthor {
                username: "u".to_string(),
                email: None,
            },
        }
    }

    fn users() -> Vec<UserRow> {
        vec![
            user(1, "Alice", "alice@example.com"),
            user(2, "bob", "BOB@corp.io"),
            user(3, "carol", "carol@example.com"),
        ]
    }

    #[test]
    fn test_empty_search_returns_all() {
        let users = users();
        assert_eq!(search_users(&users, "").len(), 3);
        assert_eq!(search_users(&users, "   ").len(), 3);
    }

    #[test]
    fn test_search_username_or_email_case_insensitive() {
        let users = users();
        let ids: Vec<i64> = search_users(&users, "ALI").iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1]);

        let ids: Vec<i64> = search_users(&users, "corp").iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2]);

        let ids: Vec<i64> = search_users(&users, "example")
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(search_users(&users, "zed").is_empty());
    }

    #[test]
    fn test_feedback_filter() {
        let rows = vec![feedback(1, "bug"), feedback(2, "feature"), feedback(3, "bug")];
        assert_eq!(filter_feedback(&rows, FeedbackFilter::All).len(), 3);
        let ids: Vec<i64> = filter_feedback(&rows, FeedbackFilter::Bug)
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter_feedback(&rows, FeedbackFilter::Other).is_empty());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("improvement".parse::<FeedbackFilter>().unwrap(), FeedbackFilter::Improvement);
        assert!("praise".parse::<FeedbackFilter>().is_err());
    }

    #[test]
    fn test_images_per_generation_guard() {
        let mut stats = Stats::default();
        assert_eq!(images_per_generation(&stats), 0.0);
        stats.total_generations = 4;
        stats.total_images = 10;
        assert_eq!(images_per_generation(&stats), 2.5);
    }

    #[test]
    fn test_search_does_not_mutate_cache() {
        let controller =
            AdminController::new(ApiClient::new("http://127.0.0.1:9", None).unwrap());
        controller.state.lock().users = users();

        assert_eq!(controller.search_users("bob").len(), 1);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.users.len(), 3);
        assert_eq!(snapshot.user_query, "bob");
        assert_eq!(controller.search_users("").len(), 3);
    }

    #[test]
    fn test_export_uses_filtered_set() {
        let dir = tempfile::tempdir().unwrap();
        let controller =
            AdminController::new(ApiClient::new("http://127.0.0.1:9", None).unwrap());
        controller.state.lock().feedback = vec![feedback(1, "bug"), feedback(2, "feature")];
        controller.filter_feedback(FeedbackFilter::Feature);

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let path = controller.export_feedback_csv(dir.path(), today).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "feedback_feature_2024-06-01.csv"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with("feature,"));

        controller.filter_feedback(FeedbackFilter::Other);
        let err = controller.export_feedback_csv(dir.path(), today).unwrap_err();
        assert_eq!(err.to_string(), "No feedback to export");
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        // Unreachable server: any request would surface as an HTTP error
        let controller =
            AdminController::new(ApiClient::new("http://127.0.0.1:9", None).unwrap());
        let mut asked = String::new();
        let outcome = controller
            .delete_user(7, "mallory", |q| {
                asked = q.to_string();
                false
            })
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(asked.contains("\"mallory\""));

        assert!(!controller.delete_feedback(1, |_| false).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_status_rejected_locally() {
        let controller =
            AdminController::new(ApiClient::new("http://127.0.0.1:9", None).unwrap());
        let err = controller
            .update_feedback_status(1, "archived")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_action_result() {
        let ok = ActionResponse {
            success: true,
            message: Some("bob is now an admin".to_string()),
            error: None,
        };
        assert_eq!(action_result(ok, "x").unwrap(), "bob is now an admin");

        let refused = ActionResponse {
            success: false,
            message: None,
            error: Some("You cannot demote yourself".to_string()),
        };
        assert_eq!(
            action_result(refused, "x").unwrap_err().to_string(),
            "You cannot demote yourself"
        );

        let bare = ActionResponse::default();
        assert_eq!(
            action_result(bare, "Failed to delete user").unwrap_err().to_string(),
            "Failed to delete user"
        );
    }
}
