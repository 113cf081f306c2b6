//! Dashboard controller
//!
//! Past generations with an image modal, a two-step delete and a plain
//! re-download (fixed platform, no overlay).
//!
//! @module dashboard

pub mod extract;

use crate::api::types::DownloadRequest;
use crate::api::ApiClient;
use crate::core::error::{Error, Result};
use crate::generator::platform::DEFAULT_PLATFORM;
use crate::generator::{download_filename, DownloadedImage};
pub use extract::DashboardCard;
use tracing::{info, warn};

/// Key that dismisses any open modal
pub const ESCAPE: &str = "Escape";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Image {
        url: String,
    },
    ConfirmDelete {
        generation_id: String,
        title: String,
    },
}

/// What a confirmed delete did to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Card removed locally; others remain
    Removed { generation_id: String, remaining: usize },
    /// Last card went away; the list was reloaded from the server, or left
    /// empty when that reload failed
    Reloaded { cards: usize },
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    cards: Vec<DashboardCard>,
    modal: Modal,
}

impl DashboardState {
    pub fn new(cards: Vec<DashboardCard>) -> Self {
        Self {
            cards,
            modal: Modal::Closed,
        }
    }

    pub fn cards(&self) -> &[DashboardCard] {
        &self.cards
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn open_image(&mut self, url: impl Into<String>) {
        self.modal = Modal::Image { url: url.into() };
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Returns true if the key closed a modal
    pub fn on_key(&mut self, key: &str) -> bool {
        if key == ESCAPE && self.modal != Modal::Closed {
            self.close_modal();
            return true;
        }
        false
    }

    /// First step of a delete: show the confirmation for this card
    pub fn request_delete(&mut self, generation_id: impl Into<String>, title: impl Into<String>) {
        self.modal = Modal::ConfirmDelete {
            generation_id: generation_id.into(),
            title: title.into(),
        };
    }

    pub fn pending_delete(&self) -> Option<&str> {
        match &self.modal {
            Modal::ConfirmDelete { generation_id, .. } => Some(generation_id),
            _ => None,
        }
    }

    /// Drop a card; returns how many remain
    pub fn remove_card(&mut self, generation_id: &str) -> usize {
        self.cards.retain(|c| c.generation_id != generation_id);
        self.cards.len()
    }

    pub fn card(&self, generation_id: &str) -> Option<&DashboardCard> {
        self.cards.iter().find(|c| c.generation_id == generation_id)
    }
}

pub struct DashboardController {
    api: ApiClient,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Replace the card list with what the server renders now
    pub async fn reload(&mut self) -> Result<usize> {
        let html = self.api.dashboard_page().await?;
        let cards = extract::extract_cards(&html);
        let count = cards.len();
        self.state = DashboardState::new(cards);
        Ok(count)
    }

    /// Second step of a delete; the confirmation modal must be open
    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome> {
        let generation_id = self
            .state
            .pending_delete()
            .map(str::to_string)
            .ok_or_else(|| Error::validation("No generation selected for deletion."))?;
        self.state.close_modal();

        let response = self.api.delete_generation(&generation_id).await?;
        if !response.success {
            return Err(Error::api(
                response
                    .error
                    .unwrap_or_else(|| "Failed to delete generation".to_string()),
            ));
        }
        info!(%generation_id, "Deleted generation");

        // The server already dropped the generation; a failed reload must not
        // report the delete as failed
        let remaining = self.state.remove_card(&generation_id);
        if remaining == 0 {
            let cards = match self.reload().await {
                Ok(cards) => cards,
                Err(e) => {
                    warn!("Error reloading dashboard: {}", e);
                    0
                }
            };
            return Ok(DeleteOutcome::Reloaded { cards });
        }

        Ok(DeleteOutcome::Removed {
            generation_id,
            remaining,
        })
    }

    /// Download a saved generation at the default platform size
    pub async fn redownload(&self, generation_id: &str) -> Result<DownloadedImage> {
        let request = DownloadRequest {
            generation_id: generation_id.to_string(),
            selected_image_index: 0,
            platform: DEFAULT_PLATFORM.to_string(),
            custom_dims: None,
            text_overlay: None,
        };

        let bytes = self
            .api
            .download(&request)
            .await
            .map_err(|e| e.with_api_prefix("Error downloading image: "))?;

        Ok(DownloadedImage {
            filename: download_filename(DEFAULT_PLATFORM),
            bytes,
        })
    }
}
