#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::error::Error;
use std::time::Duration;
use thiserror::Error as ThisError;

use crate::models::chat::{ ChatRequest, ChatResponse };

#[derive(Debug, ThisError)]
pub enum WidgetError {
    #[error("failed to reach relay: {0}")]
    Network(String),
    #[error("relay responded with status {0}")]
    Status(u16),
    #[error("relay response could not be read: {0}")]
    MalformedBody(String),
}

/// Carries one chat request to the relay and brings back its text.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, WidgetError>;
}

pub struct HttpRelayTransport {
    http: HttpClient,
    url: String,
}

impl HttpRelayTransport {
    pub fn new(url: String, timeout: Duration) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &ChatRequest) -> Result<String, WidgetError> {
        let resp = self.http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| WidgetError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status.as_u16()));
        }

        let data = resp
            .json::<ChatResponse>()
            .await
            .map_err(|e| WidgetError::MalformedBody(e.to_string()))?;
        Ok(data.response)
    }
}
