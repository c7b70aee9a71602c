#![cfg(feature = "memory")]

use payments_provider::memory::{Endpoint, ScriptedProvider};
use payments_types::ports::payment_provider::{PaymentProvider, ProviderError, UpstreamReply};
use serde_json::json;

#[tokio::test]
async fn scripted_replies_queue_then_stick() {
    let provider = ScriptedProvider::new();
    provider
        .reply_json(Endpoint::Tokens, json!({"status": "success", "data": []}))
        .reply(
            Endpoint::Tokens,
            UpstreamReply::new(503, "Service Unavailable", json!({"status": "error"})),
        );

    let first = provider.tokens().await.unwrap();
    assert_eq!(first.status, 200);
    let second = provider.tokens().await.unwrap();
    assert_eq!(second.status, 503);
    let third = provider.tokens().await.unwrap();
    assert_eq!(third.status, 503);

    assert_eq!(provider.call_count(Endpoint::Tokens), 3);
    assert_eq!(provider.call_count(Endpoint::Currencies), 0);
}

#[tokio::test]
async fn records_requests_and_reports_missing_scripts() {
    let provider = ScriptedProvider::new();
    provider.fail(Endpoint::Rate, "connection reset");

    let err = provider.rate("USDT", 10.0, "KES").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(ref m) if m == "connection reset"));
    assert_eq!(
        provider.calls(Endpoint::Rate),
        vec![json!({"token": "USDT", "amount": 10.0, "currency": "KES"})]
    );

    let missing = provider.order("ord_9").await.unwrap_err();
    assert!(missing.to_string().contains("no scripted reply"));
    assert_eq!(provider.calls(Endpoint::Order), vec![json!({"id": "ord_9"})]);
}
