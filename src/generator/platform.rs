//! Platform catalog and custom dimensions
//!
//! @module generator/platform

use crate::api::types::{Dimensions, PlatformMap};
use crate::core::error::{Error, Result};

/// Synthetic catalog entry whose size comes from the user
pub const CUSTOM: &str = "Custom";

/// Platform active when the preview panel opens
pub const DEFAULT_PLATFORM: &str = "Hashnode";

/// Preview size used while a custom field is empty
pub const CUSTOM_FALLBACK: Dimensions = Dimensions {
    width: 1200,
    height: 630,
};

/// Smallest side accepted for a custom download
pub const MIN_CUSTOM_SIDE: u32 = 100;

/// Named cover sizes, read-only once fetched
#[derive(Debug, Clone, Default)]
pub struct PlatformCatalog {
    platforms: PlatformMap,
}

impl PlatformCatalog {
    /// Wrap the server map; "Custom" is always present
    pub fn new(mut platforms: PlatformMap) -> Self {
        platforms
            .entry(CUSTOM.to_string())
            .or_insert(Dimensions::new(0, 0));
        Self { platforms }
    }

    pub fn get(&self, name: &str) -> Option<Dimensions> {
        self.platforms.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Dimensions)> {
        self.platforms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Caption shown under a platform name
    pub fn label(name: &str, dims: Dimensions) -> String {
        if name == CUSTOM {
            "Custom size".to_string()
        } else {
            dims.to_string()
        }
    }
}

/// Raw contents of the custom width/height inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomInputs {
    pub width: String,
    pub height: String,
}

impl CustomInputs {
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Live preview size: empty, zero or non-numeric fields fall back to 1200×630
    pub fn preview(&self) -> Dimensions {
        Dimensions {
            width: parse_int(&self.width)
                .filter(|w| *w != 0)
                .unwrap_or(CUSTOM_FALLBACK.width),
            height: parse_int(&self.height)
                .filter(|h| *h != 0)
                .unwrap_or(CUSTOM_FALLBACK.height),
        }
    }

    /// Size sent with a download; both sides must be numbers of at least 100
    pub fn validate(&self) -> Result<Dimensions> {
        match (parse_int(&self.width), parse_int(&self.height)) {
            (Some(width), Some(height))
                if width >= MIN_CUSTOM_SIDE && height >= MIN_CUSTOM_SIDE =>
            {
                Ok(Dimensions { width, height })
            }
            _ => Err(Error::validation(
                "Please specify valid width and height (minimum 100px).",
            )),
        }
    }
}

/// Leading-integer parse: `" 640px"` → 640, `"abc"` → None
pub fn parse_int(input: &str) -> Option<u32> {
    let trimmed = input.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
