//! Human-readable output formatting

use crate::admin::chart::StyleBar;
use crate::admin::images_per_generation;
use crate::api::types::{
    ActivityDay, FeedbackRow, RecentGeneration, RecentUser, Stats, TopUser, UserRow,
};
use crate::dashboard::DashboardCard;
use crate::generator::overlay::OverlayPreview;
use crate::generator::platform::PlatformCatalog;
use crate::generator::GeneratorState;
use crate::output::{feedback_icon, format_count, format_date, rating_stars};

const BAR_COLUMNS: usize = 40;
const MESSAGE_COLUMNS: usize = 60;

/// Left-aligned table with a header rule
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{}{}", c, " ".repeat(w - c.chars().count())))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut output = line(headers.iter().map(|h| h.to_string()).collect());
    output.push_str(&line(widths.iter().map(|w| "─".repeat(*w)).collect()));
    for row in rows {
        output.push_str(&line(row.clone()));
    }
    output
}

fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

/// Short description of an image URL; inline data URLs are summarised
pub fn describe_image(url: &str) -> String {
    if url.starts_with("data:") {
        let payload = url.split_once(',').map(|(_, b)| b.len()).unwrap_or(0);
        format!("inline image ({} KB)", payload * 3 / 4 / 1024)
    } else {
        url.to_string()
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

pub fn styles(styles: &[String]) -> String {
    if styles.is_empty() {
        return "No styles available\n".to_string();
    }
    styles.iter().map(|s| format!("  {}\n", s)).collect()
}

pub fn platforms(catalog: &PlatformCatalog, active: &str) -> String {
    let mut output = String::new();
    for (name, dims) in catalog.iter() {
        let marker = if name == active { "●" } else { "○" };
        output.push_str(&format!(
            "  {} {:<12} {}\n",
            marker,
            name,
            PlatformCatalog::label(name, dims)
        ));
    }
    output
}

pub fn candidates(images: &[String]) -> String {
    let mut output = format!("Generated {} images\n\n", images.len());
    for (i, url) in images.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, describe_image(url)));
    }
    output
}

/// Split-view summary: chosen image, platform size and caption
pub fn preview(state: &GeneratorState) -> String {
    let mut output = String::new();

    if let Some(sel) = state.session().and_then(|s| s.selected()) {
        output.push_str(&format!(
            "Selected image {}: {}\n",
            sel.index + 1,
            describe_image(&sel.url)
        ));
    }

    match state.preview_dimensions() {
        Some(dims) => output.push_str(&format!("Platform: {} ({})\n", state.platform(), dims)),
        None => output.push_str(&format!("Platform: {}\n", state.platform())),
    }

    match state.overlay.preview() {
        OverlayPreview::Hidden => output.push_str("Text overlay: none\n"),
        OverlayPreview::Visible(style) => output.push_str(&format!(
            "Text overlay: \"{}\" {} {} {} at {}{}\n",
            truncate(&style.text, MESSAGE_COLUMNS),
            style.font_family,
            style.font_size,
            style.color,
            style.anchor.as_str(),
            if style.text_shadow == "none" { "" } else { " with shadow" },
        )),
    }

    output
}

// =============================================================================
// ADMIN
// =============================================================================

pub fn stats(stats: &Stats) -> String {
    format!(
        "Total Users        {:>10}   +{} this week\n\
         Total Generations  {:>10}   +{} this week\n\
         Total Images       {:>10}   {:.1} avg/gen\n\
         Today's Activity   {:>10}   {} new users\n",
        format_count(stats.total_users),
        stats.users_this_week,
        format_count(stats.total_generations),
        stats.generations_this_week,
        format_count(stats.total_images),
        images_per_generation(stats),
        stats.generations_today,
        stats.users_today,
    )
}

pub fn users(users: &[UserRow]) -> String {
    if users.is_empty() {
        return "No users found\n".to_string();
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username.clone(),
                u.email.clone(),
                if u.is_admin { "Admin" } else { "User" }.to_string(),
                u.generation_count.to_string(),
                format_date(&u.created_at),
            ]
        })
        .collect();
    table(
        &["ID", "Username", "Email", "Role", "Generations", "Joined"],
        &rows,
    )
}

pub fn recent_users(users: &[RecentUser]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.username.clone(),
                u.email.clone(),
                u.generation_count.to_string(),
                format_date(&u.created_at),
            ]
        })
        .collect();
    table(&["Username", "Email", "Generations", "Joined"], &rows)
}

pub fn recent_generations(generations: &[RecentGeneration]) -> String {
    let rows: Vec<Vec<String>> = generations
        .iter()
        .map(|g| {
            vec![
                g.username.clone(),
                truncate(&g.title, MESSAGE_COLUMNS),
                g.style.clone(),
                g.image_count.to_string(),
                format_date(&g.created_at),
            ]
        })
        .collect();
    table(&["User", "Title", "Style", "Images", "Date"], &rows)
}

pub fn style_chart(bars: &[StyleBar]) -> String {
    if bars.is_empty() {
        return "No generations yet\n".to_string();
    }

    let name_width = bars
        .iter()
        .map(|b| b.style.chars().count())
        .max()
        .unwrap_or(0);
    let mut output = String::new();
    for bar in bars {
        let filled = (bar.width_pct / 100.0 * BAR_COLUMNS as f64).round() as usize;
        output.push_str(&format!(
            "{}{}  {}{} {}\n",
            bar.style,
            " ".repeat(name_width - bar.style.chars().count()),
            "█".repeat(filled),
            " ".repeat(BAR_COLUMNS - filled.min(BAR_COLUMNS)),
            bar.count
        ));
    }
    output
}

pub fn top_users(users: &[TopUser]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.username.clone(),
                u.generation_count.to_string(),
                format_date(&u.created_at),
            ]
        })
        .collect();
    table(&["Username", "Generations", "Joined"], &rows)
}

pub fn activity(days: &[ActivityDay]) -> String {
    let rows: Vec<Vec<String>> = days
        .iter()
        .map(|d| {
            vec![
                format_date(&d.date),
                d.users.to_string(),
                d.generations.to_string(),
            ]
        })
        .collect();
    table(&["Date", "New users", "Generations"], &rows)
}

pub fn feedback(rows: &[FeedbackRow]) -> String {
    if rows.is_empty() {
        return "No feedback found\n".to_string();
    }

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|fb| {
            let author = match &fb.user.email {
                Some(email) => format!("{} <{}>", fb.user.username, email),
                None => fb.user.username.clone(),
            };
            vec![
                fb.id.to_string(),
                format!("{} {}", feedback_icon(&fb.kind), fb.kind),
                author,
                rating_stars(fb.rating),
                truncate(&fb.message, MESSAGE_COLUMNS),
                fb.status.clone().unwrap_or_default(),
                format_date(&fb.created_at),
            ]
        })
        .collect();
    table(
        &["ID", "Type", "From", "Rating", "Message", "Status", "Date"],
        &rows,
    )
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub fn cards(cards: &[DashboardCard]) -> String {
    if cards.is_empty() {
        return "No generations yet. Run `covergen generate` to create one.\n".to_string();
    }

    let rows: Vec<Vec<String>> = cards
        .iter()
        .map(|c| {
            vec![
                c.generation_id.clone(),
                truncate(&c.title, MESSAGE_COLUMNS),
                c.image_url
                    .as_deref()
                    .map(describe_image)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    table(&["Generation", "Title", "Image"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::FeedbackAuthor;

    #[test]
    fn test_stats_guards_zero_generations() {
        let text = stats(&Stats {
            total_users: 1234,
            ..Stats::default()
        });
        assert!(text.contains("1,234"));
        assert!(text.contains("0.0 avg/gen"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(users(&[]), "No users found\n");
        assert_eq!(feedback(&[]), "No feedback found\n");
        assert_eq!(style_chart(&[]), "No generations yet\n");
    }

    #[test]
    fn test_style_chart_bar_lengths() {
        let bars = vec![
            StyleBar {
                style: "Tech".to_string(),
                count: 10,
                width_pct: 100.0,
            },
            StyleBar {
                style: "Abstract".to_string(),
                count: 5,
                width_pct: 50.0,
            },
        ];
        let chart = style_chart(&bars);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0].matches('█').count(), BAR_COLUMNS);
        assert_eq!(lines[1].matches('█').count(), BAR_COLUMNS / 2);
    }

    #[test]
    fn test_feedback_row_rendering() {
        let text = feedback(&[FeedbackRow {
            id: 9,
            kind: "feature".to_string(),
            rating: Some(4),
            message: "Add\nWebP".to_string(),
            status: Some("new".to_string()),
            created_at: "2024-02-01T12:00:00".to_string(),
            user: FeedbackAuthor {
                username: "lin".to_string(),
                email: Some("lin@example.com".to_string()),
            },
        }]);
        assert!(text.contains("💡 feature"));
        assert!(text.contains("lin <lin@example.com>"));
        assert!(text.contains("★★★★☆"));
        assert!(text.contains("Add WebP"));
        assert!(text.contains("2/1/2024"));
    }

    #[test]
    fn test_describe_data_url() {
        let url = format!("data:image/png;base64,{}", "A".repeat(4096));
        assert_eq!(describe_image(&url), "inline image (3 KB)");
        assert_eq!(describe_image("/images/a.png"), "/images/a.png");
    }
}
