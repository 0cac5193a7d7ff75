// Output formatting utilities

use crate::models::{DistributionSlice, QuadrantItem, Settings, Statistics};
use crate::utils::{format_minutes, format_percent};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Characters of a task id shown in listings
pub const SHORT_ID_LEN: usize = 8;

/// Width of the longest distribution bar
const BAR_WIDTH: usize = 30;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn color_if_tty(text: &str, color: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", color, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Leading part of a task id used for display and prefix lookup
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// One quadrant of the matrix listing
pub struct QuadrantSection {
    pub title: String,
    pub items: Vec<QuadrantItem>,
}

/// Render quadrants with their tasks
///
/// Each task line is `[x] <short id>  <description>`; descriptions are cut to
/// fit `width`.
pub fn format_matrix(sections: &[QuadrantSection], width: usize, is_tty: bool) -> String {
    let mut lines = Vec::new();
    // "  [x] " + id + "  "
    let prefix_len = 6 + SHORT_ID_LEN + 2;
    let desc_width = width.saturating_sub(prefix_len).max(20);

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let heading = format!("{} ({})", section.title, section.items.len());
        lines.push(bold_if_tty(&heading, is_tty));

        if section.items.is_empty() {
            lines.push(color_if_tty("  (empty)", ANSI_FG_BRIGHT_BLACK, is_tty));
            continue;
        }
        for item in &section.items {
            let mark = if item.done {
                color_if_tty("[x]", ANSI_FG_GREEN, is_tty)
            } else {
                "[ ]".to_string()
            };
            lines.push(format!(
                "  {} {:<width$}  {}",
                mark,
                short_id(&item.id),
                truncate(&item.description, desc_width),
                width = SHORT_ID_LEN
            ));
        }
    }

    lines.join("\n")
}

/// Render the overview and per-quadrant statistics
pub fn format_statistics(stats: &Statistics, is_tty: bool) -> String {
    let mut lines = Vec::new();

    lines.push(bold_if_tty("Overview", is_tty));
    let overview = &stats.overview;
    push_rows(
        &mut lines,
        &[
            ("Total Tasks Created:", overview.total_created.to_string()),
            ("Total Tasks Completed:", overview.total_completed.to_string()),
            ("Current Active Tasks:", overview.current_active.to_string()),
        ],
    );

    for (quadrant, data) in &stats.per_quadrant {
        lines.push(String::new());
        lines.push(bold_if_tty(quadrant, is_tty));
        push_rows(
            &mut lines,
            &[
                ("Tasks Created:", data.total_created.to_string()),
                ("Tasks Completed:", data.completed.to_string()),
                ("Active Tasks:", data.active_tasks.to_string()),
                ("Average Completion Time:", format_minutes(data.avg_completion_time)),
                ("Completion Rate:", format_percent(data.completion_rate)),
            ],
        );
    }

    lines.push(String::new());
    lines.push(bold_if_tty("Current Task Distribution", is_tty));
    lines.push(format_distribution(&stats.distribution()));

    lines.join("\n")
}

fn push_rows(lines: &mut Vec<String>, rows: &[(&str, String)]) {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        lines.push(format!("  {:<width$} {}", label, value, width = label_width));
    }
}

/// Horizontal bar chart of active tasks per quadrant
pub fn format_distribution(slices: &[DistributionSlice]) -> String {
    if slices.is_empty() {
        return "  No active tasks".to_string();
    }
    let label_width = slices.iter().map(|s| s.quadrant.chars().count()).max().unwrap_or(0);
    slices
        .iter()
        .map(|slice| {
            let bar_len = ((slice.percent / 100.0) * BAR_WIDTH as f64).round().max(1.0) as usize;
            format!(
                "  {:<width$} {:<bar$} {} ({})",
                slice.quadrant,
                "#".repeat(bar_len),
                format_percent(slice.percent),
                slice.active_tasks,
                width = label_width,
                bar = BAR_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the settings document
pub fn format_settings(settings: &Settings) -> String {
    let appearance = &settings.appearance;
    let mut lines = vec![
        "Appearance".to_string(),
        format!("  background_color  {}", appearance.background_color),
        format!("  text_color        {}", appearance.text_color),
        format!("  opacity           {}%", appearance.opacity),
    ];
    if let Some(rgba) = appearance.rgba() {
        lines.push(format!("  background        {}", rgba));
    }
    lines.push(String::new());
    lines.push("Quadrants".to_string());
    for (i, name) in settings.quadrants.names.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, name));
    }
    lines.push(String::new());
    lines.push(format!("Theme: {}", settings.theme));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuadrantStats;

    fn item(id: &str, description: &str, done: bool) -> QuadrantItem {
        QuadrantItem {
            id: id.to_string(),
            description: description.to_string(),
            done,
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("hello", 0), "");
    }

    #[test]
    fn test_format_matrix_plain() {
        let sections = vec![
            QuadrantSection {
                title: "Do".to_string(),
                items: vec![item("aaaaaaaa-1111", "Ship release", true), item("bbbbbbbb-2222", "Reply", false)],
            },
            QuadrantSection { title: "Drop".to_string(), items: vec![] },
        ];
        let text = format_matrix(&sections, 80, false);
        assert!(text.contains("Do (2)"));
        assert!(text.contains("  [x] aaaaaaaa  Ship release"));
        assert!(text.contains("  [ ] bbbbbbbb  Reply"));
        assert!(text.contains("Drop (0)\n  (empty)"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_format_statistics() {
        let mut stats = Statistics::default();
        stats.per_quadrant.insert("Q1".to_string(), QuadrantStats::new(2, 1, 1, Some(10.0)));
        stats.overview.total_created = 2;
        stats.overview.total_completed = 1;
        stats.overview.current_active = 1;

        let text = format_statistics(&stats, false);
        assert!(text.contains("Total Tasks Created:"));
        assert!(text.contains("Average Completion Time: 10m"));
        assert!(text.contains("Completion Rate:"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("100.0% (1)"));
    }

    #[test]
    fn test_format_distribution_empty() {
        assert_eq!(format_distribution(&[]), "  No active tasks");
    }

    #[test]
    fn test_format_settings() {
        let text = format_settings(&Settings::default());
        assert!(text.contains("opacity           95%"));
        assert!(text.contains("rgba(100, 100, 100, 0.95)"));
        assert!(text.contains("  4. Not Important & Not Urgent"));
        assert!(text.contains("Theme: dark"));
    }
}
