use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use payments_types::domain::credentials::ApiKey;
use payments_types::domain::payment::{AccountQuery, OrderSubmission};
use payments_types::ports::payment_provider::{PaymentProvider, ProviderError, UpstreamReply};
use reqwest::{RequestBuilder, Url};

pub const DEFAULT_BASE_URL: &str = "https://api.paycrest.io/v1/";
const API_KEY_HEADER: &str = "API-Key";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    pub timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct PaycrestProvider {
    base: Url,
    api_key: Option<ApiKey>,
    client: reqwest::Client,
}

#[derive(Clone)]
pub struct PaycrestProviderBuilder {
    base: Url,
    api_key: Option<ApiKey>,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

impl PaycrestProvider {
    pub fn builder(base_url: &str) -> anyhow::Result<PaycrestProviderBuilder> {
        let base = Url::parse(base_url).context("invalid provider base url")?;
        if base.cannot_be_a_base() {
            anyhow::bail!("provider base url cannot carry a path: {base_url}");
        }
        Ok(PaycrestProviderBuilder {
            base,
            api_key: None,
            timeout: None,
            client: None,
        })
    }

    pub fn from_config(config: ProviderConfig) -> anyhow::Result<Self> {
        let mut builder = Self::builder(&config.base_url)?;
        if let Some(key) = config.api_key {
            builder = builder.with_api_key(key);
        }
        if let Some(t) = config.timeout {
            builder = builder.with_timeout(t);
        }
        builder.build()
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidRequest("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key.expose()),
            None => req,
        }
    }

    async fn send(
        &self,
        endpoint: &'static str,
        req: RequestBuilder,
    ) -> Result<UpstreamReply, ProviderError> {
        let res = req.send().await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "upstream request failed");
            ProviderError::Transport(e.to_string())
        })?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let body = serde_json::from_slice(&bytes).ok();
        if body.is_none() {
            tracing::debug!(endpoint, %status, "upstream body is not JSON");
        }
        tracing::debug!(endpoint, %status, "upstream reply");
        Ok(UpstreamReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[async_trait]
impl PaymentProvider for PaycrestProvider {
    async fn rate(
        &self,
        token: &str,
        amount: f64,
        currency: &str,
    ) -> Result<UpstreamReply, ProviderError> {
        let amount = amount.to_string();
        let url = self.url(&["rates", token, &amount, currency])?;
        self.send("rates", self.client.get(url)).await
    }

    async fn verify_account(&self, query: &AccountQuery) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["verify-account"])?;
        let req = self.authed(self.client.post(url).json(query));
        self.send("verify-account", req).await
    }

    async fn tokens(&self) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["tokens"])?;
        self.send("tokens", self.client.get(url)).await
    }

    async fn currencies(&self) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["currencies"])?;
        self.send("currencies", self.client.get(url)).await
    }

    async fn institutions(&self, currency: &str) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["institutions", currency])?;
        self.send("institutions", self.client.get(url)).await
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["sender", "orders"])?;
        let req = self.authed(self.client.post(url).json(order));
        self.send("sender/orders", req).await
    }

    async fn order(&self, id: &str) -> Result<UpstreamReply, ProviderError> {
        let url = self.url(&["sender", "orders", id])?;
        let req = self.authed(self.client.get(url));
        self.send("sender/orders/{id}", req).await
    }
}

impl PaycrestProviderBuilder {
    pub fn with_api_key(mut self, key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<PaycrestProvider> {
        if let Some(client) = self.client {
            return Ok(PaycrestProvider {
                base: self.base,
                api_key: self.api_key,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(PaycrestProvider {
            base: self.base,
            api_key: self.api_key,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_segments_under_base_path() {
        let p = PaycrestProvider::builder("https://api.paycrest.io/v1/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            p.url(&["rates", "USDC", "1000", "NGN"]).unwrap().as_str(),
            "https://api.paycrest.io/v1/rates/USDC/1000/NGN"
        );

        let bare = PaycrestProvider::builder("http://127.0.0.1:9000")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            bare.url(&["sender", "orders", "a/b"]).unwrap().as_str(),
            "http://127.0.0.1:9000/sender/orders/a%2Fb"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(PaycrestProvider::builder("not a url").is_err());
        assert!(PaycrestProvider::builder("mailto:ops@example.com").is_err());
    }

    #[test]
    fn from_config_defaults_to_public_api() {
        let p = PaycrestProvider::from_config(ProviderConfig::default()).unwrap();
        assert_eq!(p.base.as_str(), DEFAULT_BASE_URL);
        assert!(p.api_key.is_none());
    }
}
