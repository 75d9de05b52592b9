use std::net::ToSocketAddrs;

use anyhow::{Context, Result};

use recall_lib::server;

use crate::app::App;

/// Run the HTTP API in the foreground until Ctrl-C
pub fn run(app: App, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| app.config.server.host.clone());
    let port = port.unwrap_or(app.config.server.port);

    let addr = (host.as_str(), port)
        .to_socket_addrs()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for {}", host))?;

    log::info!("Serving {} on {}", app.db_path.display(), addr);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(server::serve(app.store, addr))
        .context("HTTP server failed")?;

    Ok(())
}
