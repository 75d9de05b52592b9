use chrono::{DateTime, Local, Utc};

use recall_lib::knowledge::scheduler::{day_window, format_interval};
use recall_lib::knowledge::KnowledgeItem;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

const TITLE_MAX_WIDTH: usize = 40;

/// Wrap `text` in an ANSI color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Format a stored timestamp in the local time zone
pub fn format_local(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Render items as a table: title, review count, next review, due-in, id
pub fn render_items(items: &[KnowledgeItem], now: DateTime<Utc>, use_color: bool) -> String {
    let title_width = items
        .iter()
        .map(|i| i.title.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, TITLE_MAX_WIDTH);

    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(format!(
        "{:<tw$} {:>7} {:<16} {:<7} {}",
        "Title", "Reviews", "Next review", "Due in", "ID",
        tw = title_width
    ));
    lines.push(format!(
        "{} {} {} {} {}",
        "\u{2500}".repeat(title_width),
        "\u{2500}".repeat(7),
        "\u{2500}".repeat(16),
        "\u{2500}".repeat(7),
        "\u{2500}".repeat(36)
    ));

    let (today_start, tomorrow_start) = day_window(&now.with_timezone(&Local));
    let today_start = today_start.with_timezone(&Utc);
    let tomorrow_start = tomorrow_start.with_timezone(&Utc);

    for item in items {
        let title = truncate(&item.title, title_width);
        let (due, color) = if item.next_review_date < now {
            ("overdue".to_string(), Color::RED)
        } else if item.is_due_between(&today_start, &tomorrow_start) {
            ("today".to_string(), Color::YELLOW)
        } else {
            // Due tomorrow but less than 24h away still reads as one day
            let days = item.days_until_review(&now).max(1);
            (format_interval(days), Color::GRAY)
        };

        lines.push(format!(
            "{:<tw$} {:>7} {:<16} {} {}",
            title,
            item.review_count,
            format_local(&item.next_review_date),
            paint(&format!("{:<7}", due), color, use_color),
            item.id,
            tw = title_width
        ));
    }

    lines.join("\n")
}

/// Truncate to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
        assert_eq!(truncate("艾宾浩斯遗忘曲线", 6), "艾宾浩...");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_render_items_without_color() {
        let now = Utc::now();
        let item = KnowledgeItem::new("Traits".to_string(), &now);
        let table = render_items(&[item.clone()], now, false);

        assert!(table.contains("Traits"));
        assert!(table.contains("1d"));
        assert!(table.contains(&item.id.to_string()));
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn test_render_items_marks_due_today() {
        let now = Utc::now();
        let (start, _) = day_window(&now.with_timezone(&Local));
        let mut item = KnowledgeItem::new("Due now".to_string(), &now);
        item.next_review_date = now;
        let mut overdue = item.clone();
        overdue.next_review_date = start.with_timezone(&Utc) - chrono::Duration::hours(1);

        let table = render_items(&[item, overdue], now, true);

        assert!(table.contains(&format!("{}{:<7}{}", Color::YELLOW, "today", Color::RESET)));
        assert!(table.contains(&format!("{}{:<7}{}", Color::RED, "overdue", Color::RESET)));
    }
}
