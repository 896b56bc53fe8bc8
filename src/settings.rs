//! Runtime configuration, layered: built-in defaults, then a TOML file,
//! then `SYMBOLIZE__SECTION__KEY` environment variables.

use crate::config::*;
use anyhow::{bail, Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub gateway: GatewaySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allow any origin, so a browser canvas served elsewhere can post
    pub cors: bool,
    /// Largest accepted form body, base64 canvases get big
    pub max_payload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".into(),
            port: 5000,
            cors: true,
            max_payload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub classes_path: PathBuf,
    /// Must equal the spatial size the model was trained on
    pub target_size: u32,
    pub top_k: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        ModelSettings {
            classes_path: PathBuf::from(CLASSES_PATH),
            target_size: TARGET_SIZE,
            top_k: TOP_N,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Full URL of the REST predict method
    pub endpoint: String,
    /// Bearer token sent with every request, if any
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        GatewaySettings {
            endpoint: "http://127.0.0.1:8501/v1/models/symbols:predict".into(),
            token: None,
            timeout_secs: GATEWAY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives, `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: RUST_LOG.into(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `symbolize.toml` in the working directory is used if present
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name(CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.target_size == 0 {
            bail!("model.target_size must be positive");
        }
        if self.model.top_k == 0 {
            bail!("model.top_k must be positive");
        }
        if self.gateway.endpoint.trim().is_empty() {
            bail!("gateway.endpoint must be set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_trained_model() {
        let settings = Settings::default();
        assert_eq!(settings.model.target_size, 28);
        assert_eq!(settings.model.top_k, 5);
        assert_eq!(settings.model.classes_path, PathBuf::from("all_classes.txt"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9000

            [gateway]
            endpoint = "https://example.invalid/v1/endpoints/1:predict"
            timeout_secs = 5
            "#,
        );
        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.gateway.timeout_secs, 5);
        assert_eq!(settings.model.target_size, 28);
    }

    #[test]
    fn zero_target_size_is_rejected() {
        let file = write_config("[model]\ntarget_size = 0\n");
        assert!(Settings::load(file.path().to_str()).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        // Only this test touches the token, so parallel tests are unaffected
        let file = write_config("[gateway]\ntoken = \"from-file\"\n");
        std::env::set_var("SYMBOLIZE__GATEWAY__TOKEN", "from-env");
        let settings = Settings::load(file.path().to_str());
        std::env::remove_var("SYMBOLIZE__GATEWAY__TOKEN");

        assert_eq!(settings.unwrap().gateway.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Settings::load(Some("/definitely/not/here.toml")).is_err());
    }
}
