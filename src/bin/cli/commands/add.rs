use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{format_local, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, title: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let item = app.add(title)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\"", paint(&item.title, Color::BOLD, use_color));
            println!("  First review: {}", format_local(&item.next_review_date));
            println!("  ID: {}", item.id);
        }
    }

    Ok(())
}
