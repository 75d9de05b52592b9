use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    app.init()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "message": "storage initialized",
                "database": app.db_path.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Storage initialized at {}", app.db_path.display());
        }
    }

    Ok(())
}
