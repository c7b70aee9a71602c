use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Base,
    BnbSmartChain,
    Lisk,
    Tron,
    Celo,
    ArbitrumOne,
    Polygon,
    AssetChain,
}

impl Network {
    pub const ALL: [Network; 8] = [
        Network::Base,
        Network::BnbSmartChain,
        Network::Lisk,
        Network::Tron,
        Network::Celo,
        Network::ArbitrumOne,
        Network::Polygon,
        Network::AssetChain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Base => "base",
            Network::BnbSmartChain => "bnb-smart-chain",
            Network::Lisk => "lisk",
            Network::Tron => "tron",
            Network::Celo => "celo",
            Network::ArbitrumOne => "arbitrum-one",
            Network::Polygon => "polygon",
            Network::AssetChain => "asset-chain",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown network: {0}")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownNetwork(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub institution: String,
    pub account_identifier: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    pub amount: f64,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    pub recipient: Recipient,
}

impl PaymentRequest {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            anyhow::bail!("amount must be a positive number");
        }
        if self.token.trim().is_empty() {
            anyhow::bail!("token empty");
        }
        if self.recipient.institution.trim().is_empty() {
            anyhow::bail!("recipient.institution empty");
        }
        if self.recipient.account_identifier.trim().is_empty() {
            anyhow::bail!("recipient.accountIdentifier empty");
        }
        if self.recipient.currency.trim().is_empty() {
            anyhow::bail!("recipient.currency empty");
        }
        Ok(())
    }

    pub fn account_query(&self) -> AccountQuery {
        AccountQuery {
            institution: self.recipient.institution.clone(),
            account_identifier: self.recipient.account_identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountQuery {
    pub institution: String,
    pub account_identifier: String,
}

impl AccountQuery {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.institution.trim().is_empty() {
            anyhow::bail!("institution empty");
        }
        if self.account_identifier.trim().is_empty() {
            anyhow::bail!("accountIdentifier empty");
        }
        Ok(())
    }
}

/// Exchange rate as the provider expresses it. Quotes usually arrive as
/// decimal strings; a rate recovered from a rejection is numeric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Rate {
    Number(f64),
    Quoted(String),
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Number(n) => write!(f, "{n}"),
            Rate::Quoted(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDefaults {
    pub network: Network,
    pub memo: String,
    pub return_address: String,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            network: Network::Celo,
            memo: "With love from split ".into(),
            return_address: "0xb39b7c02372dBBb003c05D6b4ABA2eC68842934D".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecipient {
    pub institution: String,
    pub account_identifier: String,
    pub account_name: Value,
    pub currency: String,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub amount: f64,
    pub token: String,
    pub network: Network,
    pub rate: Rate,
    pub recipient: SubmissionRecipient,
    pub return_address: String,
}

impl OrderSubmission {
    pub fn compose(
        request: &PaymentRequest,
        rate: Rate,
        account_name: Value,
        defaults: &OrderDefaults,
    ) -> Self {
        Self {
            amount: request.amount,
            token: request.token.clone(),
            network: defaults.network,
            rate,
            recipient: SubmissionRecipient {
                institution: request.recipient.institution.clone(),
                account_identifier: request.recipient.account_identifier.clone(),
                account_name,
                currency: request.recipient.currency.clone(),
                memo: defaults.memo.clone(),
            },
            return_address: defaults.return_address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreated {
    pub order: Value,
    pub rate: Rate,
    pub verify_acc: Value,
}
