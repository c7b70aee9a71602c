use anyhow::Context;
use payments_types::domain::credentials::ApiKey;
use payments_types::domain::payment::{Network, OrderDefaults};
use std::env;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.paycrest.io/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    pub api_key: Option<ApiKey>,
    pub provider_base_url: String,
    pub provider_timeout: Duration,
    pub order_defaults: OrderDefaults,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let server_port = get("PORT").unwrap_or_else(|| "3000".into());
        let api_key = get("API_KEY")
            .filter(|k| !k.trim().is_empty())
            .map(ApiKey::from);
        let provider_base_url =
            get("PAYCREST_BASE_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.into());
        let timeout_secs = match get("PROVIDER_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("PROVIDER_TIMEOUT_SECS is not a number: {v}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut order_defaults = OrderDefaults::default();
        if let Some(n) = get("ORDER_NETWORK") {
            order_defaults.network = n.parse::<Network>()?;
        }
        if let Some(memo) = get("ORDER_MEMO") {
            order_defaults.memo = memo;
        }
        if let Some(addr) = get("RETURN_ADDRESS") {
            order_defaults.return_address = addr;
        }

        Ok(Self {
            server_port,
            api_key,
            provider_base_url,
            provider_timeout: Duration::from_secs(timeout_secs),
            order_defaults,
        })
    }
}
