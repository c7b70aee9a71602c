use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::payment::{AccountQuery, OrderSubmission};

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Raw answer from the provider. HTTP status is not interpreted by adapters;
/// each use case decides what a non-2xx reply means.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub reason: String,
    /// `None` when the body was not JSON.
    pub body: Option<Value>,
}

impl UpstreamReply {
    pub fn new(status: u16, reason: impl Into<String>, body: Value) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: Some(body),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, "OK", body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<&Value, ProviderError> {
        self.body.as_ref().ok_or_else(|| {
            ProviderError::Decode(format!("non-JSON body (status {})", self.status))
        })
    }

    pub fn into_json(self) -> Result<Value, ProviderError> {
        let status = self.status;
        self.body
            .ok_or_else(|| ProviderError::Decode(format!("non-JSON body (status {status})")))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_value(self.json()?.clone()).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
pub trait PaymentProvider: Send + Sync + 'static {
    async fn rate(
        &self,
        token: &str,
        amount: f64,
        currency: &str,
    ) -> Result<UpstreamReply, ProviderError>;
    async fn verify_account(&self, query: &AccountQuery) -> Result<UpstreamReply, ProviderError>;
    async fn tokens(&self) -> Result<UpstreamReply, ProviderError>;
    async fn currencies(&self) -> Result<UpstreamReply, ProviderError>;
    async fn institutions(&self, currency: &str) -> Result<UpstreamReply, ProviderError>;
    async fn submit_order(&self, order: &OrderSubmission) -> Result<UpstreamReply, ProviderError>;
    async fn order(&self, id: &str) -> Result<UpstreamReply, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::Envelope;
    use serde_json::json;

    #[test]
    fn reply_accessors() {
        let reply = UpstreamReply::ok(json!({"status": "success", "data": "1500.2"}));
        assert!(reply.is_success());
        let env: Envelope = reply.decode().unwrap();
        assert!(env.is_success());

        let text = UpstreamReply {
            status: 502,
            reason: "Bad Gateway".into(),
            body: None,
        };
        assert!(!text.is_success());
        assert!(matches!(text.json(), Err(ProviderError::Decode(_))));
        assert!(text.into_json().is_err());
    }
}
