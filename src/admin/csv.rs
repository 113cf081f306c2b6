//! Feedback CSV export
//!
//! Only the message column is quoted; the other columns are written as-is.

use crate::admin::FeedbackFilter;
use crate::api::types::FeedbackRow;
use crate::core::error::{Error, Result};
use crate::output::format_date;
use chrono::NaiveDate;

pub const HEADER: [&str; 6] = ["Type", "Username", "Email", "Rating", "Message", "Date"];

/// Wrap in double quotes, doubling embedded quotes
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serialize `rows`; an empty set is refused
pub fn feedback_csv(rows: &[&FeedbackRow]) -> Result<String> {
    if rows.is_empty() {
        return Err(Error::validation("No feedback to export"));
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.join(","));

    for fb in rows {
        let rating = match fb.rating {
            Some(r) if r > 0 => r.to_string(),
            _ => String::new(),
        };
        let fields = [
            fb.kind.clone(),
            fb.user.username.clone(),
            fb.user.email.clone().unwrap_or_default(),
            rating,
            quote(&fb.message),
            format_date(&fb.created_at),
        ];
        lines.push(fields.join(","));
    }

    Ok(lines.join("\n"))
}

/// `feedback_<filter>_<YYYY-MM-DD>.csv`
pub fn export_filename(filter: FeedbackFilter, date: NaiveDate) -> String {
    format!("feedback_{}_{}.csv", filter.as_str(), date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::FeedbackAuthor;

    fn row(kind: &str, message: &str, rating: Option<u8>, email: Option<&str>) -> FeedbackRow {
        FeedbackRow {
            id: 1,
            kind: kind.to_string(),
            rating,
            message: message.to_string(),
            status: Some("new".to_string()),
            created_at: "2024-03-09T08:15:00".to_string(),
            user: FeedbackAuthor {
                username: "ada".to_string(),
                email: email.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(quote(r#"He said "hi""#), r#""He said ""hi""""#);
        assert_eq!(quote("plain"), "\"plain\"");
    }

    #[test]
    fn test_csv_layout() {
        let a = row("bug", r#"He said "hi""#, Some(4), Some("ada@example.com"));
        let b = row("other", "Nice, thanks", None, None);
        let csv = feedback_csv(&[&a, &b]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Type,Username,Email,Rating,Message,Date");
        assert_eq!(
            lines[1],
            r#"bug,ada,ada@example.com,4,"He said ""hi""",3/9/2024"#
        );
        assert_eq!(lines[2], r#"other,ada,,,"Nice, thanks",3/9/2024"#);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_export_refused() {
        let err = feedback_csv(&[]).unwrap_err();
        assert_eq!(err.to_string(), "No feedback to export");
    }

    #[test]
    fn test_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            export_filename(FeedbackFilter::Bug, date),
            "feedback_bug_2024-01-05.csv"
        );
        assert_eq!(
            export_filename(FeedbackFilter::All, date),
            "feedback_all_2024-01-05.csv"
        );
    }
}
