// Duration formatting for statistics output

/// Render a minute count the way the statistics view shows it:
/// `2h 5m` from one hour up, `45m` below, `N/A` when there is no value.
pub fn format_minutes(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) if m.is_finite() && m > 0.0 => {
            let total = m.floor() as i64;
            let hours = total / 60;
            let mins = total % 60;
            if hours > 0 {
                format!("{}h {}m", hours, mins)
            } else {
                format!("{}m", mins)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Format a percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
