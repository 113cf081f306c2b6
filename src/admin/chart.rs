//! Style distribution bars

use crate::api::types::StyleCount;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleBar {
    pub style: String,
    pub count: u64,
    /// Width relative to the most used style, 0–100
    pub width_pct: f64,
}

/// One bar per style, scaled to the largest count; empty input draws nothing
pub fn style_bars(styles: &[StyleCount]) -> Vec<StyleBar> {
    let Some(max) = styles.iter().map(|s| s.count).max() else {
        return Vec::new();
    };

    styles
        .iter()
        .map(|s| StyleBar {
            style: s.style.clone(),
            count: s.count,
            width_pct: if max == 0 {
                0.0
            } else {
                s.count as f64 / max as f64 * 100.0
            },
        })
        .collect()
}
