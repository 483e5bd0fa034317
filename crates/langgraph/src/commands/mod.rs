//! CLI command handlers.

pub mod health;
pub mod join;
pub mod runs;
pub mod stream;
pub mod threads;

use anyhow::{Context as _, Result};
use langgraph_client::{ClientBuilder, ClientConfig, FrameMode, LangGraphClient};

use crate::Cli;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective client settings.
    pub config: ClientConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Merge the config file (if any) with command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(url) = &cli.url {
            config.base_url = url.clone();
        }
        if let Some(key) = &cli.api_key {
            config.api_key = Some(key.clone());
        }
        if cli.eager {
            config.frame_mode = FrameMode::Eager;
        }

        Ok(Self {
            config,
            json_output: cli.json,
            verbose: cli.verbose,
        })
    }

    /// Build a client from the effective settings.
    pub fn client(&self) -> Result<LangGraphClient> {
        ClientBuilder::from_config(&self.config)
            .build()
            .context("invalid client configuration")
    }
}

/// Parse a JSON command-line argument.
pub(crate) fn parse_json(flag: &str, raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON"))
}

/// Parse a JSON object command-line argument.
pub(crate) fn parse_json_object(
    flag: &str,
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    match parse_json(flag, raw)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{flag} must be a JSON object"),
    }
}
