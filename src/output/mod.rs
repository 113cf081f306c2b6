//! Output formatting

pub mod human;
pub mod json;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Render `value` as JSON, or with `human` otherwise
pub fn render<T: serde::Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    human: impl FnOnce(&T) -> String,
) -> String {
    match format {
        OutputFormat::Human => human(value),
        OutputFormat::Json => json::format(value),
    }
}

/// Short date (`M/D/YYYY`) from an ISO timestamp; unparseable input is returned as-is
pub fn format_date(iso: &str) -> String {
    let date = iso
        .parse::<NaiveDateTime>()
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(iso).map(|dt| dt.date_naive()))
        .or_else(|_| iso.parse::<NaiveDate>());

    match date {
        Ok(d) => d.format("%-m/%-d/%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Integer with thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Five-star rating, or `-` when unrated
pub fn rating_stars(rating: Option<u8>) -> String {
    match rating {
        Some(r) if r > 0 => {
            let r = r.min(5) as usize;
            format!("{}{}", "★".repeat(r), "☆".repeat(5 - r))
        }
        _ => "-".to_string(),
    }
}

pub fn feedback_icon(kind: &str) -> &'static str {
    match kind {
        "bug" => "🐛",
        "feature" => "💡",
        "improvement" => "⚡",
        _ => "💬",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2024-03-09T08:15:00.123456"), "3/9/2024");
        assert_eq!(format_date("2024-12-25T00:00:00+00:00"), "12/25/2024");
        assert_eq!(format_date("2024-01-02"), "1/2/2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(Some(3)), "★★★☆☆");
        assert_eq!(rating_stars(None), "-");
        assert_eq!(rating_stars(Some(0)), "-");
    }
}
