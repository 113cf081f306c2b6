//! Card extraction from the server-rendered dashboard page
//!
//! @module dashboard/extract

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Opening tag of a generation card
static CARD_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<[a-zA-Z][^>]*\bdata-generation-id\s*=\s*"([^"]+)"[^>]*>"#).unwrap());

static TITLE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bdata-title\s*=\s*"([^"]*)""#).unwrap());

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img\b[^>]*\bsrc\s*=\s*"([^"]*)""#).unwrap());

/// One past generation as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub generation_id: String,
    pub title: String,
    pub image_url: Option<String>,
}

/// Cards in page order; a repeated id keeps its first occurrence
pub fn extract_cards(html: &str) -> Vec<DashboardCard> {
    let tags: Vec<_> = CARD_TAG.captures_iter(html).collect();
    let mut cards: Vec<DashboardCard> = Vec::with_capacity(tags.len());

    for (i, caps) in tags.iter().enumerate() {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let generation_id = unescape(id.as_str());
        if cards.iter().any(|c| c.generation_id == generation_id) {
            continue;
        }

        let title = TITLE_ATTR
            .captures(whole.as_str())
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str()))
            .unwrap_or_default();

        // Image belongs to this card if it appears before the next card tag
        let body_end = tags
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let body = &html[whole.end()..body_end];
        let image_url = IMG_SRC
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str()));

        cards.push(DashboardCard {
            generation_id,
            title,
            image_url,
        });
    }

    cards
}

fn unescape(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
