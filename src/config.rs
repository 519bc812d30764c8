//! Configuration
//!
//! Library users build a [`ClientConfig`] directly. The `inspectctl` binary
//! fills it from CLI arguments with environment fallbacks via clap.

use crate::session::Session;
use clap::Args;
use serde::{Deserialize, Serialize};

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the inspection REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the logged-in user
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { "http://localhost:8000".to_string() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn session(&self) -> Session {
        let session = Session::new(&self.base_url);
        match &self.token {
            Some(token) => session.with_token(token),
            None => session,
        }
    }
}

/// Connection arguments shared by every `inspectctl` subcommand
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the inspection API
    #[arg(long, global = true, env = "INSPECTION_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Bearer token (from the login endpoint)
    #[arg(long, global = true, env = "INSPECTION_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl From<&ConnectionArgs> for ClientConfig {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            base_url: args.api_url.clone(),
            token: args.token.clone().filter(|t| !t.trim().is_empty()),
            timeout_secs: args.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.session().is_authenticated());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.session().token(), Some("abc"));
    }

    #[test]
    fn test_from_args_drops_blank_token() {
        let args = ConnectionArgs {
            api_url: "https://inspections.example.com/".into(),
            token: Some("  ".into()),
            timeout_secs: 5,
            log_level: "info".into(),
        };
        let config = ClientConfig::from(&args);
        assert_eq!(config.token, None);
        assert_eq!(config.session().endpoint("/reports/"), "https://inspections.example.com/reports/");
    }
}
