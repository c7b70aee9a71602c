//! Typed client for the payment relay's REST surface.

use std::time::Duration;

use anyhow::Context;
use payments_types::domain::payment::{AccountQuery, PaymentCreated, PaymentRequest};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone)]
pub struct PaymentsClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct PaymentsClient {
    base: Url,
    client: reqwest::Client,
}

impl PaymentsClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<PaymentsClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(PaymentsClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<T> {
        let url = self.url(segments)?;
        tracing::debug!(%url, "GET");
        let res = self.client.get(url).send().await?.error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_payment(&self, req: &PaymentRequest) -> anyhow::Result<PaymentCreated> {
        let res = self
            .client
            .post(self.url(&["payment"])?)
            .json(req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn verify_account(&self, query: &AccountQuery) -> anyhow::Result<Value> {
        let res = self
            .client
            .post(self.url(&["payment", "verify-account"])?)
            .json(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn tokens(&self) -> anyhow::Result<Value> {
        self.get_json(&["payment", "tokens"]).await
    }

    pub async fn currencies(&self) -> anyhow::Result<Value> {
        self.get_json(&["payment", "currencies"]).await
    }

    pub async fn institutions(&self, currency: &str) -> anyhow::Result<Value> {
        self.get_json(&["payment", "institutions", currency])
            .await
    }

    pub async fn order(&self, id: &str) -> anyhow::Result<Value> {
        self.get_json(&["payment", "orders", id]).await
    }
}

impl PaymentsClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<PaymentsClient> {
        if let Some(client) = self.client {
            return Ok(PaymentsClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(PaymentsClient {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use payments_types::domain::payment::{Network, Rate, Recipient};
    use serde_json::json;

    fn sample_request() -> PaymentRequest {
        PaymentRequest {
            amount: 250.0,
            token: "USDC".into(),
            network: Some(Network::Base),
            recipient: Recipient {
                institution: "OPAYNGPC".into(),
                account_identifier: "1234567890".into(),
                currency: "NGN".into(),
            },
        }
    }

    #[tokio::test]
    async fn create_payment_and_verify_account() {
        let server = MockServer::start();
        let req = sample_request();

        let create_mock = server.mock(|when, then| {
            when.method(POST).path("/payment").json_body_obj(&req);
            then.status(201).json_body(json!({
                "order": {"status": "success", "data": {"id": "ord_1"}},
                "rate": "1500.5",
                "verifyAcc": "ADA OBI"
            }));
        });
        let verify_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/payment/verify-account")
                .json_body(json!({"institution": "OPAYNGPC", "accountIdentifier": "1234567890"}));
            then.status(200)
                .json_body(json!({"status": "success", "data": "ADA OBI"}));
        });

        let client = PaymentsClient::new(&server.base_url()).unwrap();
        let created = client.create_payment(&req).await.unwrap();
        assert_eq!(created.rate, Rate::Quoted("1500.5".into()));
        assert_eq!(created.verify_acc, json!("ADA OBI"));
        assert_eq!(created.order["data"]["id"], "ord_1");

        let verified = client.verify_account(&req.account_query()).await.unwrap();
        assert_eq!(verified["status"], "success");

        create_mock.assert();
        verify_mock.assert();
    }

    #[tokio::test]
    async fn lookups_and_errors() {
        let server = MockServer::start();
        let tokens_mock = server.mock(|when, then| {
            when.method(GET).path("/payment/tokens");
            then.status(200)
                .json_body(json!({"status": "success", "data": [{"symbol": "USDC"}]}));
        });
        let inst_mock = server.mock(|when, then| {
            when.method(GET).path("/payment/institutions/NGN");
            then.status(200)
                .json_body(json!({"status": "success", "data": []}));
        });
        let order_mock = server.mock(|when, then| {
            when.method(GET).path("/payment/orders/ord_1");
            then.status(401).json_body(json!({"error": "Invalid API Key"}));
        });

        let client = PaymentsClient::builder(&server.base_url())
            .unwrap()
            .with_header("x-request-source", "tests")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let tokens = client.tokens().await.unwrap();
        assert_eq!(tokens["data"][0]["symbol"], "USDC");
        let inst = client.institutions("NGN").await.unwrap();
        assert_eq!(inst["data"], json!([]));

        let err = client.order("ord_1").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<reqwest::Error>().and_then(|e| e.status()),
            Some(reqwest::StatusCode::UNAUTHORIZED)
        );

        tokens_mock.assert();
        inst_mock.assert();
        order_mock.assert();
    }

    #[tokio::test]
    async fn path_ids_are_escaped() {
        let server = MockServer::start();
        let slash_mock = server.mock(|when, then| {
            when.method(GET).path("/payment/orders/a%2Fb");
            then.status(200)
                .json_body(json!({"status": "success", "data": {"id": "a/b"}}));
        });
        let query_mock = server.mock(|when, then| {
            when.method(GET).path("/payment/orders/x%3Fy");
            then.status(200)
                .json_body(json!({"status": "success", "data": {"id": "x?y"}}));
        });

        let client = PaymentsClient::new(&format!("{}/", server.base_url())).unwrap();
        let order = client.order("a/b").await.unwrap();
        assert_eq!(order["data"]["id"], "a/b");
        let order = client.order("x?y").await.unwrap();
        assert_eq!(order["data"]["id"], "x?y");

        slash_mock.assert();
        query_mock.assert();
    }
}
