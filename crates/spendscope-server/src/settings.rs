//! Server settings
//!
//! Settings are resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. A TOML file: the `--config` path if given, else the default location
//!    (~/.local/share/spendscope/config/server.toml) when it exists
//! 3. Environment overrides (`SPENDSCOPE_ALLOWED_ORIGINS`, `SPENDSCOPE_MAX_UPLOAD_MB`)
//!
//! Command-line flags are applied on top by the CLI.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! allowed_origins = ["*"]
//!
//! [limits]
//! max_upload_mb = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{ServerConfig, MAX_UPLOAD_SIZE};

/// Environment variable with comma-separated allowed CORS origins
pub const ENV_ALLOWED_ORIGINS: &str = "SPENDSCOPE_ALLOWED_ORIGINS";

/// Environment variable with the maximum upload size in megabytes
pub const ENV_MAX_UPLOAD_MB: &str = "SPENDSCOPE_MAX_UPLOAD_MB";

/// Resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin
    pub allowed_origins: Vec<String>,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: vec![],
            max_upload_size: MAX_UPLOAD_SIZE,
        }
    }
}

impl ServerSettings {
    /// Load settings from file (if any) and the process environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut settings = match override_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Settings file not found: {}", path.display());
                }
                Self::from_file(path)?
            }
            None => match default_settings_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        parse_settings(&content)
    }

    /// Apply environment overrides via a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
            self.allowed_origins = parse_origins(&origins);
        }

        if let Some(mb) = lookup(ENV_MAX_UPLOAD_MB).filter(|s| !s.trim().is_empty()) {
            let mb: usize = mb
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_MAX_UPLOAD_MB, mb))?;
            self.max_upload_size = megabytes_to_bytes(mb)
                .with_context(|| format!("Invalid {}: {}", ENV_MAX_UPLOAD_MB, mb))?;
        }

        Ok(())
    }

    /// Router configuration derived from these settings
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            allowed_origins: self.allowed_origins.clone(),
            max_upload_size: self.max_upload_size,
        }
    }
}

/// Default settings file location
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendscope").join("config").join("server.toml"))
}

fn megabytes_to_bytes(mb: usize) -> Result<usize> {
    match mb.checked_mul(1024 * 1024) {
        Some(bytes) => Ok(bytes),
        None => bail!("{} MB overflows the upload size limit", mb),
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawSettings {
    server: Option<RawServer>,
    limits: Option<RawLimits>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawLimits {
    max_upload_mb: Option<usize>,
}

/// Parse settings from TOML content
fn parse_settings(content: &str) -> Result<ServerSettings> {
    let raw: RawSettings = toml::from_str(content).context("Invalid settings TOML")?;

    let mut settings = ServerSettings::default();

    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            settings.host = host;
        }
        if let Some(port) = server.port {
            settings.port = port;
        }
        if let Some(origins) = server.allowed_origins {
            settings.allowed_origins = origins;
        }
    }

    if let Some(limits) = raw.limits {
        if let Some(mb) = limits.max_upload_mb {
            settings.max_upload_size =
                megabytes_to_bytes(mb).context("Invalid limits.max_upload_mb")?;
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_full_settings() {
        let settings = parse_settings(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8000
            allowed_origins = ["*"]

            [limits]
            max_upload_mb = 2
            "#,
        )
        .unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.allowed_origins, vec!["*"]);
        assert_eq!(settings.max_upload_size, 2 * 1024 * 1024);
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = parse_settings("[server]\nport = 9000\n").unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.max_upload_size, MAX_UPLOAD_SIZE);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(parse_settings("[server\nport = ").is_err());
        assert!(parse_settings("[server]\nport = \"high\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_ALLOWED_ORIGINS, "http://localhost:5173, https://app.example.com,"),
            (ENV_MAX_UPLOAD_MB, "5"),
        ]);

        let mut settings = ServerSettings::default();
        settings
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(
            settings.allowed_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert_eq!(settings.max_upload_size, 5 * 1024 * 1024);
    }

    #[test]
    fn test_env_rejects_bad_upload_size() {
        let mut settings = ServerSettings::default();
        let result = settings.apply_env(|key| {
            (key == ENV_MAX_UPLOAD_MB).then(|| "lots".to_string())
        });
        assert!(result.is_err());

        let mut settings = ServerSettings::default();
        let huge = usize::MAX.to_string();
        let result = settings.apply_env(|key| (key == ENV_MAX_UPLOAD_MB).then(|| huge.clone()));
        assert!(result.is_err());
        assert_eq!(settings.max_upload_size, MAX_UPLOAD_SIZE);
    }

    #[test]
    fn test_oversized_file_limit_is_rejected() {
        let content = format!("[limits]\nmax_upload_mb = {}\n", usize::MAX / 2);
        assert!(parse_settings(&content).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"10.0.0.2\"").unwrap();

        let settings = ServerSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.host, "10.0.0.2");
    }

    #[test]
    fn test_missing_override_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ServerSettings::load(Some(&missing)).is_err());
    }
}
