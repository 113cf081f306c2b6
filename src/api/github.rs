//! Public repository star count
//!
//! Non-critical: every failure collapses to a count of zero.

use crate::api::types::GithubRepo;
use reqwest::Client;
use tracing::warn;

/// Client for the GitHub repository endpoint
pub struct GithubClient {
    client: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!("covergen/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Star count for `owner/name`, or 0 on any failure
    pub async fn stars(&self, repo: &str) -> u64 {
        let url = format!("{}/repos/{}", self.api_base, repo);
        let res = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(e) => {
                warn!("Error fetching GitHub stars: {}", e);
                return 0;
            }
        };

        match res.json::<GithubRepo>().await {
            Ok(repo) => repo.stargazers_count.unwrap_or(0),
            Err(e) => {
                warn!("Error fetching GitHub stars: {}", e);
                0
            }
        }
    }
}

/// Label shown next to the repository link
pub fn star_label(stars: u64) -> String {
    format!("★ {}", stars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_label() {
        assert_eq!(star_label(0), "★ 0");
        assert_eq!(star_label(128), "★ 128");
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back_to_zero() {
        // Port 9 (discard) on loopback refuses connections
        let client = GithubClient::new("http://127.0.0.1:9");
        assert_eq!(client.stars("ifihan/blog-cover-generator").await, 0);
    }
}
