use anyhow::Result;

use crate::app::App;
use crate::render::terminal::render_items;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items = app.list_due_today()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("Nothing to review today.");
                return Ok(());
            }

            println!("{}", render_items(&items, chrono::Utc::now(), use_color));
            println!("\n{} items due today", items.len());
        }
    }

    Ok(())
}
