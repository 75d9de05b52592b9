use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let id = app.parse_id(id)?;
    app.delete(id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "success": true, "id": id.to_string() }));
        }
        OutputFormat::Plain => println!("Deleted {}", id),
    }

    Ok(())
}
