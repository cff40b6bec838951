//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use spendscope_server::ServerSettings;

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    config: Option<&Path>,
    allow_origin: Vec<String>,
) -> Result<()> {
    let settings = resolve_settings(host, port, config, allow_origin)?;

    println!("🚀 Starting Spendscope web server...");
    println!("   Listening: http://{}:{}", settings.host, settings.port);
    println!(
        "   Max upload: {} MB",
        settings.max_upload_size / 1024 / 1024
    );
    if settings.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", settings.allowed_origins.join(", "));
    }

    spendscope_server::serve(&settings.host, settings.port, settings.server_config())
        .await
        .context("Server exited with an error")
}

/// Settings file and environment first, then command-line flags
pub fn resolve_settings(
    host: Option<String>,
    port: Option<u16>,
    config: Option<&Path>,
    allow_origin: Vec<String>,
) -> Result<ServerSettings> {
    let mut settings = ServerSettings::load(config).context("Failed to load server settings")?;

    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if !allow_origin.is_empty() {
        settings.allowed_origins = allow_origin;
    }

    Ok(settings)
}
