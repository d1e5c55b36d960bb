use crate::core::health::DEFAULT_POLL_INTERVAL;
use crate::core::ConfigProvider;
use crate::utils::error::{ChatError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub health: Option<HealthConfig>,
    pub client: Option<ClientConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub request_timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ChatError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ChatError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODERATION_URL})；未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ChatError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.server.base_url
    }

    fn poll_interval(&self) -> Duration {
        self.health
            .as_ref()
            .and_then(|h| h.poll_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.client
            .as_ref()
            .and_then(|c| c.request_timeout_seconds)
            .map(Duration::from_secs)
    }

    fn user_agent(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.user_agent.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.base_url", &self.server.base_url)?;

        if let Some(interval) = self.health.as_ref().and_then(|h| h.poll_interval_ms) {
            validate_positive_number("health.poll_interval_ms", interval, 1)?;
        }

        if let Some(client) = &self.client {
            if let Some(timeout) = client.request_timeout_seconds {
                validate_positive_number("client.request_timeout_seconds", timeout, 1)?;
            }
            if let Some(agent) = &client.user_agent {
                validate_non_empty_string("client.user_agent", agent)?;
            }
        }

        Ok(())
    }
}
