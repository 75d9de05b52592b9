use anyhow::Result;

use crate::app::App;
use crate::render::terminal::render_items;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items = app.list_all()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No knowledge items yet. Add one with `recall-cli add <title>`.");
                return Ok(());
            }

            println!("{}", render_items(&items, chrono::Utc::now(), use_color));
            println!("\n{} items total", items.len());
        }
    }

    Ok(())
}
