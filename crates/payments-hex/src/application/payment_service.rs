use crate::errors::AppError;
use payments_types::domain::envelope::{lists_token, Envelope};
use payments_types::domain::order_status::annotate_status;
use payments_types::domain::payment::{
    AccountQuery, OrderDefaults, OrderSubmission, PaymentCreated, PaymentRequest, Rate,
};
use payments_types::domain::stale_rate::StaleRatePolicy;
use payments_types::ports::payment_provider::PaymentProvider;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const WRONG_ACCOUNT: &str = "wrong account number or bank name, check and try again";
pub const INVALID_API_KEY: &str = "Invalid API Key";

pub struct PaymentService<P: PaymentProvider> {
    provider: P,
    defaults: OrderDefaults,
    retry: StaleRatePolicy,
}

impl<P: PaymentProvider> PaymentService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_defaults(provider, OrderDefaults::default())
    }

    pub fn with_defaults(provider: P, defaults: OrderDefaults) -> Self {
        Self {
            provider,
            defaults,
            retry: StaleRatePolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: StaleRatePolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn create_payment(&self, request: PaymentRequest) -> Result<PaymentCreated, AppError> {
        request
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        info!(
            token = %request.token,
            amount = request.amount,
            currency = %request.recipient.currency,
            "creating payment order"
        );
        if let Some(requested) = request.network {
            if requested != self.defaults.network {
                debug!(%requested, submitted = %self.defaults.network, "order network taken from defaults");
            }
        }

        let query = request.account_query();
        let (quote, verification) = tokio::join!(
            self.provider
                .rate(&request.token, request.amount, &request.recipient.currency),
            self.provider.verify_account(&query),
        );

        let quote: Envelope<Rate> = quote?.decode()?;
        let verified: Envelope = verification?.decode()?;
        if !verified.is_success() {
            warn!(institution = %query.institution, "account verification failed");
            return Err(AppError::BadRequest(WRONG_ACCOUNT.into()));
        }

        let Some(rate) = quote.data else {
            let msg = quote.message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
                format!(
                    "No rate available for {} to {}",
                    request.token, request.recipient.currency
                )
            });
            warn!(%msg, "rate quote unavailable");
            return Err(AppError::BadRequest(msg));
        };
        let verify_acc = verified.data.unwrap_or(Value::Null);

        let tokens = self.provider.tokens().await?;
        if !lists_token(tokens.json()?, &request.token) {
            warn!(token = %request.token, "token not supported");
            return Err(AppError::BadRequest(format!(
                "Token '{}' is not supported or configured",
                request.token
            )));
        }

        let mut submission =
            OrderSubmission::compose(&request, rate, verify_acc.clone(), &self.defaults);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let order = self.provider.submit_order(&submission).await?.into_json()?;
            let outcome: Envelope = serde_json::from_value(order.clone())
                .map_err(|e| AppError::Internal(anyhow::anyhow!("order response: {e}")))?;

            if outcome.is_success() {
                info!(attempts, rate = %submission.rate, "payment order created");
                let rate = if attempts > 1 {
                    Rate::Quoted(submission.rate.to_string())
                } else {
                    submission.rate
                };
                return Ok(PaymentCreated {
                    order,
                    rate,
                    verify_acc,
                });
            }

            let corrected = outcome
                .field_error()
                .and_then(|rejection| self.retry.corrected_rate(&rejection));
            match corrected {
                Some(available) if self.retry.allows_another(attempts) => {
                    warn!(stale = %submission.rate, available, "rate went stale, resubmitting");
                    submission.rate = Rate::Number(available);
                }
                _ => {
                    let fallback = if attempts > 1 {
                        "Failed to create order after retry"
                    } else {
                        "Failed to create order"
                    };
                    let msg = outcome.rejection_message(fallback);
                    warn!(attempts, %msg, "order rejected");
                    return Err(AppError::BadRequest(msg));
                }
            }
        }
    }

    pub async fn tokens(&self) -> Result<Value, AppError> {
        Ok(self.provider.tokens().await?.into_json()?)
    }

    pub async fn currencies(&self) -> Result<Value, AppError> {
        Ok(self.provider.currencies().await?.into_json()?)
    }

    pub async fn institutions(&self, currency: &str) -> Result<Value, AppError> {
        Ok(self.provider.institutions(currency).await?.into_json()?)
    }

    pub async fn order(&self, id: &str) -> Result<Value, AppError> {
        let reply = self.provider.order(id).await?;
        if reply.status == 401 {
            return Err(AppError::Unauthorized(INVALID_API_KEY.into()));
        }
        let mut body = reply.into_json()?;
        annotate_status(&mut body).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(body)
    }

    pub async fn verify_account(&self, query: AccountQuery) -> Result<Value, AppError> {
        query
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let reply = self
            .provider
            .verify_account(&query)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to verify account: {e}")))?;
        if !reply.is_success() {
            return Err(AppError::Upstream {
                status: reply.status,
                message: format!("Paycrest API error: {} {}", reply.status, reply.reason),
            });
        }
        reply
            .into_json()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to verify account: {e}")))
    }

    pub fn find_all(&self) -> String {
        "This action returns all payment".into()
    }

    pub fn find_one(&self, id: i64) -> String {
        format!("This action returns a #{id} payment")
    }

    pub fn update(&self, id: i64) -> String {
        format!("This action updates a #{id} payment")
    }

    pub fn remove(&self, id: i64) -> String {
        format!("This action removes a #{id} payment")
    }
}
