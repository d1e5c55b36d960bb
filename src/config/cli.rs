use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://hate-chat-backend.onrender.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "moderation-chat")]
#[command(about = "Terminal chat that runs every message through a moderation service")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// TOML file with server/health/client settings; replaces the connection flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "3000")]
    pub poll_interval_ms: u64,

    /// Per-request timeout. Unset means requests may wait indefinitely
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Moderate a single message and exit instead of starting the chat
    #[arg(short, long)]
    pub message: Option<String>,

    /// How long one-shot mode waits for the server to become ready
    #[arg(long, default_value = "60")]
    pub ready_timeout_secs: u64,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("poll_interval_ms", self.poll_interval_ms, 1)?;
        if let Some(timeout) = self.request_timeout_secs {
            validate_positive_number("request_timeout_secs", timeout, 1)?;
        }
        validate_positive_number("ready_timeout_secs", self.ready_timeout_secs, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["moderation-chat"]);

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.message.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = CliConfig::parse_from([
            "moderation-chat",
            "--base-url",
            "http://localhost:8000",
            "--poll-interval-ms",
            "0",
            "--request-timeout-secs",
            "10",
            "--log-format",
            "json",
            "-m",
            "hola",
        ]);

        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.message.as_deref(), Some("hola"));
        assert!(config.validate().is_err());
    }
}
