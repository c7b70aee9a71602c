use async_trait::async_trait;
use dashmap::DashMap;
use payments_types::domain::payment::{AccountQuery, OrderSubmission};
use payments_types::ports::payment_provider::{PaymentProvider, ProviderError, UpstreamReply};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Rate,
    VerifyAccount,
    Tokens,
    Currencies,
    Institutions,
    SubmitOrder,
    Order,
}

type Scripted = Result<UpstreamReply, String>;

/// In-process provider answering from scripted replies and recording every
/// call. Replies queue per endpoint; the last one keeps answering.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<DashMap<Endpoint, VecDeque<Scripted>>>,
    calls: Arc<DashMap<Endpoint, Vec<Value>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, endpoint: Endpoint, reply: UpstreamReply) -> &Self {
        self.replies.entry(endpoint).or_default().push_back(Ok(reply));
        self
    }

    pub fn reply_json(&self, endpoint: Endpoint, body: Value) -> &Self {
        self.reply(endpoint, UpstreamReply::ok(body))
    }

    pub fn fail(&self, endpoint: Endpoint, message: impl Into<String>) -> &Self {
        self.replies
            .entry(endpoint)
            .or_default()
            .push_back(Err(message.into()));
        self
    }

    pub fn calls(&self, endpoint: Endpoint) -> Vec<Value> {
        self.calls
            .get(&endpoint)
            .map(|c| c.value().clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.get(&endpoint).map(|c| c.len()).unwrap_or(0)
    }

    fn answer(&self, endpoint: Endpoint, request: Value) -> Result<UpstreamReply, ProviderError> {
        self.calls.entry(endpoint).or_default().push(request);
        let next = match self.replies.get_mut(&endpoint) {
            Some(mut queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(msg)) => Err(ProviderError::Transport(msg)),
            None => Err(ProviderError::Transport(format!(
                "no scripted reply for {endpoint:?}"
            ))),
        }
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn rate(
        &self,
        token: &str,
        amount: f64,
        currency: &str,
    ) -> Result<UpstreamReply, ProviderError> {
        self.answer(
            Endpoint::Rate,
            json!({ "token": token, "amount": amount, "currency": currency }),
        )
    }

    async fn verify_account(&self, query: &AccountQuery) -> Result<UpstreamReply, ProviderError> {
        let request =
            serde_json::to_value(query).map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        self.answer(Endpoint::VerifyAccount, request)
    }

    async fn tokens(&self) -> Result<UpstreamReply, ProviderError> {
        self.answer(Endpoint::Tokens, Value::Null)
    }

    async fn currencies(&self) -> Result<UpstreamReply, ProviderError> {
        self.answer(Endpoint::Currencies, Value::Null)
    }

    async fn institutions(&self, currency: &str) -> Result<UpstreamReply, ProviderError> {
        self.answer(Endpoint::Institutions, json!({ "currency": currency }))
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<UpstreamReply, ProviderError> {
        let request =
            serde_json::to_value(order).map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        self.answer(Endpoint::SubmitOrder, request)
    }

    async fn order(&self, id: &str) -> Result<UpstreamReply, ProviderError> {
        self.answer(Endpoint::Order, json!({ "id": id }))
    }
}
