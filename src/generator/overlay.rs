//! Text overlay form and live preview
//!
//! The preview is a pure function of the form; nothing here touches the
//! network. The form is serialized only when a download is requested.
//!
//! @module generator/overlay

use crate::api::types::{Anchor, TextOverlay};
use crate::core::error::{Error, Result};
use crate::generator::platform::parse_int;

pub const SHADOW_CSS: &str = "2px 2px 4px rgba(0, 0, 0, 0.8)";
pub const NO_SHADOW_CSS: &str = "none";

/// Swatches offered next to the custom colour input
pub const COLOR_PRESETS: [&str; 6] = [
    "#ffffff", "#000000", "#ffd700", "#ff6b6b", "#4ecdc4", "#a29bfe",
];

/// Current values of the overlay inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayForm {
    /// Caption; whitespace and line breaks are kept as typed
    pub text: String,
    pub font: String,
    /// Raw size input, in pixels
    pub size: String,
    pub position: Anchor,
    pub shadow: bool,
    color: String,
    active_preset: Option<usize>,
}

impl Default for OverlayForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: "Inter".to_string(),
            size: "48".to_string(),
            position: Anchor::default(),
            shadow: true,
            color: COLOR_PRESETS[0].to_string(),
            active_preset: Some(0),
        }
    }
}

/// Rendered state of the caption on the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayPreview {
    Hidden,
    Visible(OverlayStyle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub text: String,
    pub font_family: String,
    pub font_size: String,
    pub color: String,
    pub text_shadow: &'static str,
    pub anchor: Anchor,
}

impl OverlayForm {
    /// Pick a swatch; the custom colour input takes its value
    pub fn choose_preset(&mut self, index: usize) -> Result<()> {
        let color = COLOR_PRESETS
            .get(index)
            .ok_or_else(|| Error::validation(format!("No colour preset #{}", index + 1)))?;
        self.color = color.to_string();
        self.active_preset = Some(index);
        Ok(())
    }

    /// Edit the custom colour; no swatch stays highlighted
    pub fn set_custom_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.active_preset = None;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn active_preset(&self) -> Option<usize> {
        self.active_preset
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn preview(&self) -> OverlayPreview {
        if !self.has_text() {
            return OverlayPreview::Hidden;
        }

        OverlayPreview::Visible(OverlayStyle {
            text: self.text.clone(),
            font_family: self.font.clone(),
            font_size: format!("{}px", self.size),
            color: self.color.clone(),
            text_shadow: if self.shadow { SHADOW_CSS } else { NO_SHADOW_CSS },
            anchor: self.position,
        })
    }

    /// Overlay sent with a download, if there is any text
    pub fn to_overlay(&self) -> Option<TextOverlay> {
        if !self.has_text() {
            return None;
        }

        Some(TextOverlay {
            text: self.text.clone(),
            font: self.font.clone(),
            size: parse_int(&self.size),
            color: self.color.clone(),
            position: self.position,
            shadow: self.shadow,
        })
    }
}
