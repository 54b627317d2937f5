//! Messaging API reply client

use super::message::LineMessage;
use crate::state_machine::OutboundMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.line.me";

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Reply request failed: {0}")]
    Network(String),
    #[error("Reply rejected with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Delivers one message against a reply token
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, message: &OutboundMessage) -> Result<(), ReplyError>;
}

#[async_trait]
impl<T: ReplySender + ?Sized> ReplySender for Arc<T> {
    async fn reply(&self, reply_token: &str, message: &OutboundMessage) -> Result<(), ReplyError> {
        (**self).reply(reply_token, message).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<LineMessage>,
}

pub struct LineClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    pub fn new(
        access_token: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReplyError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, reply_token: &str, message: &OutboundMessage) -> Result<(), ReplyError> {
        let body = ReplyRequest {
            reply_token,
            messages: vec![LineMessage::from(message)],
        };

        let response = self
            .client
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Reply delivered");
        Ok(())
    }
}
