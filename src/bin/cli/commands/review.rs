use anyhow::Result;
use chrono::Utc;

use recall_lib::knowledge::scheduler::{format_interval, review_label};

use crate::app::App;
use crate::render::terminal::{format_local, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let id = app.parse_id(id)?;
    let item = app.mark_reviewed(id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            let days = item.days_until_review(&Utc::now());
            println!(
                "Reviewed \"{}\" ({} done)",
                paint(&item.title, Color::BOLD, use_color),
                item.review_count
            );
            println!(
                "  Next: {} in {}, {}",
                review_label(item.review_count),
                paint(&format_interval(days), Color::GREEN, use_color),
                format_local(&item.next_review_date)
            );
        }
    }

    Ok(())
}
