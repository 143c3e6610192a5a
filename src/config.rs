//! Configuration of the root parser with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML file passed to [`Settings::load`]
//! 3. Environment variables: `ARGTREE_*` prefix

use std::path::Path;

use clap::Command as Parser;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{Error, Result};

/// Metadata of an application's root parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Program name shown in usage and help
    pub name: String,
    /// Version reported by `--version`
    pub version: Option<String>,
    /// One-line description
    pub about: Option<String>,
    pub author: Option<String>,
    /// Let subcommands report the root's version
    pub propagate_version: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: None,
            about: None,
            author: None,
            propagate_version: false,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// A missing file is not an error; a malformed one is.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("name", defaults.name)
            .map_err(config_err)?
            .set_default("propagate_version", defaults.propagate_version)
            .map_err(config_err)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix("ARGTREE").separator("__"))
            .build()
            .map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        debug!(?settings, "loaded");
        Ok(settings)
    }

    /// Parse settings from a TOML string, without other layers.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Root parser carrying these settings.
    pub fn to_parser(&self) -> Parser {
        let mut parser = Parser::new(self.name.clone());
        if let Some(version) = &self.version {
            parser = parser.version(version.clone());
        }
        if let Some(about) = &self.about {
            parser = parser.about(about.clone());
        }
        if let Some(author) = &self.author {
            parser = parser.author(author.clone());
        }
        parser.propagate_version(self.propagate_version)
    }
}

fn config_err(e: ConfigError) -> Error {
    Error::Config {
        message: e.to_string(),
    }
}
