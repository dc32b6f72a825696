//! Server configuration: defaults, layered with `flatedit.toml` and
//! `FLATEDIT_`-prefixed environment variables.

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Root directory relative paths in tool calls are resolved against.
    pub project_root: PathBuf,
    /// `trace`, `debug`, `info`, `warn`, or `error`.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration in priority order: environment variables, then
    /// `flatedit.toml` in the current directory, then defaults.
    pub fn load() -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

        let toml_path = std::path::Path::new("flatedit.toml");
        if toml_path.exists() {
            figment = figment.merge(Toml::file(toml_path));
        }

        figment.merge(Env::prefixed("FLATEDIT_")).extract()
    }
}
