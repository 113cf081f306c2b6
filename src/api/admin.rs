//! Admin endpoints (`/admin/api/*`)
//!
//! @module api/admin

use crate::api::client::{read_envelope, ApiClient};
use crate::api::types::{
    ActionResponse, ActivityDay, FeedbackRow, RecentGeneration, RecentUser, StatusUpdate, Stats,
    StyleCount, TopUser, UserRow,
};
use crate::core::error::{Error, Result};

impl ApiClient {
    pub async fn stats(&self) -> Result<Stats> {
        self.get_json("/admin/api/stats").await
    }

    pub async fn users(&self) -> Result<Vec<UserRow>> {
        self.get_json("/admin/api/users").await
    }

    pub async fn recent_users(&self) -> Result<Vec<RecentUser>> {
        self.get_json("/admin/api/recent-users").await
    }

    pub async fn recent_generations(&self) -> Result<Vec<RecentGeneration>> {
        self.get_json("/admin/api/recent-generations").await
    }

    pub async fn style_distribution(&self) -> Result<Vec<StyleCount>> {
        self.get_json("/admin/api/style-distribution").await
    }

    pub async fn top_users(&self) -> Result<Vec<TopUser>> {
        self.get_json("/admin/api/top-users").await
    }

    pub async fn user_activity(&self) -> Result<Vec<ActivityDay>> {
        self.get_json("/admin/api/user-activity").await
    }

    pub async fn feedback(&self) -> Result<Vec<FeedbackRow>> {
        self.get_json("/admin/api/feedback").await
    }

    /// `POST /admin/api/users/:id/promote`
    pub async fn promote_user(&self, user_id: i64) -> Result<ActionResponse> {
        let path = format!("/admin/api/users/{}/promote", user_id);
        let res = self.client.post(self.url(&path)).send().await?;
        read_envelope(res).await
    }

    /// `POST /admin/api/users/:id/demote`
    pub async fn demote_user(&self, user_id: i64) -> Result<ActionResponse> {
        let path = format!("/admin/api/users/{}/demote", user_id);
        let res = self.client.post(self.url(&path)).send().await?;
        read_envelope(res).await
    }

    /// `DELETE /admin/api/users/:id`
    pub async fn delete_user(&self, user_id: i64) -> Result<ActionResponse> {
        let path = format!("/admin/api/users/{}", user_id);
        let res = self.client.delete(self.url(&path)).send().await?;
        read_envelope(res).await
    }

    /// `DELETE /admin/api/feedback/:id`; only the status code matters
    pub async fn delete_feedback(&self, feedback_id: i64) -> Result<()> {
        let path = format!("/admin/api/feedback/{}", feedback_id);
        let res = self.client.delete(self.url(&path)).send().await?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(Error::api("Failed to delete feedback"))
        }
    }

    /// `PUT /admin/api/feedback/:id/status`
    pub async fn update_feedback_status(
        &self,
        feedback_id: i64,
        status: &str,
    ) -> Result<ActionResponse> {
        let path = format!("/admin/api/feedback/{}/status", feedback_id);
        let res = self
            .client
            .put(self.url(&path))
            .json(&StatusUpdate {
                status: status.to_string(),
            })
            .send()
            .await?;
        read_envelope(res).await
    }
}

