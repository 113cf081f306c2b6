//! HTTP client for the cover generator service
//!
//! Every call is a single request/response: no retries, no client-side
//! timeout beyond the HTTP stack's own, no cancellation.
//!
//! @module api/client

use crate::api::types::{
    ActionResponse, DownloadRequest, ErrorBody, FeedbackSubmission, GenerateRequest,
    GenerateResponse, PlatformMap, SelectionRequest,
};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("covergen/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// CLIENT
// =============================================================================

/// Typed client for the generator, dashboard and admin endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`, optionally carrying a session cookie
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| Error::ConfigError {
                message: format!("Invalid session cookie: {}", e),
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the `[server]` config section
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.server.base_url,
            config.server.session_cookie.as_deref(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path; absolute inputs pass through
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
        {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let res = self.client.get(self.url(path)).send().await?;
        read_json(res).await
    }

    // =========================================================================
    // GENERATOR
    // =========================================================================

    /// `GET /api/styles`
    pub async fn styles(&self) -> Result<Vec<String>> {
        self.get_json("/api/styles").await
    }

    /// `GET /api/platforms`
    pub async fn platforms(&self) -> Result<PlatformMap> {
        self.get_json("/api/platforms").await
    }

    /// `POST /api/generate`
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        debug!(style = %request.style, "POST /api/generate");
        let res = self
            .client
            .post(self.url("/api/generate"))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    /// `POST /api/download`; returns the image bytes
    pub async fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
        debug!(
            generation_id = %request.generation_id,
            platform = %request.platform,
            "POST /api/download"
        );
        let res = self
            .client
            .post(self.url("/api/download"))
            .json(request)
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(error_from_body(status, &bytes))
        }
    }

    /// `POST /api/save-selection` (requires a logged-in session)
    pub async fn save_selection(&self, request: &SelectionRequest) -> Result<ActionResponse> {
        let res = self
            .client
            .post(self.url("/api/save-selection"))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    /// `POST /api/update-selection` (guest sessions)
    pub async fn update_selection(&self, request: &SelectionRequest) -> Result<ActionResponse> {
        let res = self
            .client
            .post(self.url("/api/update-selection"))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    /// `POST /api/feedback`
    pub async fn submit_feedback(&self, feedback: &FeedbackSubmission) -> Result<ActionResponse> {
        let res = self
            .client
            .post(self.url("/api/feedback"))
            .json(feedback)
            .send()
            .await?;
        read_json(res).await
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    /// `DELETE /api/generation/:id`
    pub async fn delete_generation(&self, generation_id: &str) -> Result<ActionResponse> {
        let path = format!(
            "/api/generation/{}",
            urlencoding::encode(generation_id)
        );
        let res = self.client.delete(self.url(&path)).send().await?;
        read_json(res).await
    }

    /// `GET /dashboard` (server-rendered HTML)
    pub async fn dashboard_page(&self) -> Result<String> {
        let res = self.client.get(self.url("/dashboard")).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!(%status, "dashboard page unavailable");
            return Err(Error::api(format!(
                "Failed to load dashboard (HTTP {})",
                status.as_u16()
            )));
        }
        Ok(res.text().await?)
    }
}

// =============================================================================
// RESPONSE DECODING
// =============================================================================

/// Decode a JSON body on success, or the server's `{error}` on failure
pub(crate) async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let bytes = res.bytes().await?;
    if status.is_success() {
        Ok(serde_json::from_slice(&bytes)?)
    } else {
        Err(error_from_body(status, &bytes))
    }
}

/// Decode a `{success, message, error}` envelope regardless of status
pub(crate) async fn read_envelope(res: Response) -> Result<ActionResponse> {
    let status = res.status();
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!(%status, "response was not an action envelope");
        Error::Json(e)
    })
}

fn error_from_body(status: StatusCode, bytes: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(ErrorBody { error: Some(message) }) => Error::api(message),
        Ok(_) => Error::api(format!("Request failed with status {}", status.as_u16())),
        Err(e) => {
            warn!(%status, "non-JSON error response");
            Error::Json(e)
        }
    }
}
