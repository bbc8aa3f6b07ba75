//! Configuration types for the panel host.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for the panel session, with optional YAML persistence.

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Command-line arguments for the parley-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct PanelArgs {
    /// Chat endpoint to post submissions to.
    #[arrrg(optional, "Chat endpoint URL (default: $PARLEY_ENDPOINT)", "URL")]
    pub endpoint: Option<String>,

    /// Optional YAML configuration file.
    #[arrrg(optional, "Path to a YAML config file", "PATH")]
    pub config: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a panel session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Chat endpoint URL. `None` defers to the client's environment lookup.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    #[serde(default = "default_use_color")]
    pub use_color: bool,
}

fn default_use_color() -> bool {
    true
}

impl PanelConfig {
    /// Creates a new PanelConfig with default values.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            use_color: true,
        }
    }

    /// Sets the chat endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Loads a configuration from a YAML file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|err| Error::io("failed to read config file", err))?;
        serde_yaml::from_str(&content)
            .map_err(|err| Error::serialization("failed to parse config file", Some(Box::new(err))))
    }

    /// Saves the configuration to a YAML file.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|err| {
            Error::serialization("failed to serialize config", Some(Box::new(err)))
        })?;
        std::fs::write(path.as_ref(), content)
            .map_err(|err| Error::io("failed to write config file", err))
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PanelArgs> for PanelConfig {
    fn from(args: PanelArgs) -> Self {
        PanelConfig {
            endpoint: args.endpoint,
            use_color: !args.no_color,
        }
    }
}
