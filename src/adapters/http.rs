use crate::domain::model::{HttpReply, ModerationRequest};
use crate::domain::ports::{ConfigProvider, ModerationService};
use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Response};

/// `ModerationService` over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpModerationClient {
    base_url: String,
    client: Client,
}

impl HttpModerationClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("base_url", base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_url("base_url", config.base_url())?;

        let mut builder = Client::builder();
        // no timeout unless configured: a hung request keeps the session in Sending
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = config.user_agent() {
            builder = builder.user_agent(agent.to_string());
        }

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn into_reply(response: Response) -> Result<HttpReply> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();
    if body.is_none() && !bytes.is_empty() {
        tracing::debug!("Response body ({} bytes) is not JSON", bytes.len());
    }
    Ok(HttpReply { status, body })
}

#[async_trait]
impl ModerationService for HttpModerationClient {
    async fn fetch_health(&self) -> Result<HttpReply> {
        let url = self.endpoint("/health");
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        tracing::debug!("Health response status: {}", response.status());
        into_reply(response).await
    }

    async fn moderate(&self, request: &ModerationRequest) -> Result<HttpReply> {
        let url = self.endpoint("/moderate");
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(request).send().await?;
        tracing::debug!("Moderation response status: {}", response.status());
        into_reply(response).await
    }
}
