use payments_hex::application::payment_service::PaymentService;
use payments_provider::memory::{Endpoint, ScriptedProvider};
use payments_types::domain::payment::{Network, PaymentRequest, Rate, Recipient};
use serde_json::json;

// End-to-end service flow against the scripted adapter.
#[tokio::test]
async fn create_then_track_order_flow() {
    let provider = ScriptedProvider::new();
    provider
        .reply_json(Endpoint::Rate, json!({"status": "success", "data": "129.40"}))
        .reply_json(
            Endpoint::VerifyAccount,
            json!({"status": "success", "data": "WANJIKU KAMAU"}),
        )
        .reply_json(
            Endpoint::Tokens,
            json!({"status": "success", "data": [{"symbol": "USDT", "network": "tron"}]}),
        )
        .reply_json(
            Endpoint::SubmitOrder,
            json!({"status": "success", "data": {"id": "ord_kes_1", "receiveAddress": "0xfeed"}}),
        )
        .reply_json(
            Endpoint::Order,
            json!({"status": "success", "data": {"id": "ord_kes_1", "status": "processing"}}),
        );
    let svc = PaymentService::new(provider.clone());

    let created = svc
        .create_payment(PaymentRequest {
            amount: 40.0,
            token: "USDT".into(),
            network: Some(Network::Tron),
            recipient: Recipient {
                institution: "SAFAKEPC".into(),
                account_identifier: "0712345678".into(),
                currency: "KES".into(),
            },
        })
        .await
        .unwrap();
    assert_eq!(created.rate, Rate::Quoted("129.40".into()));

    assert_eq!(
        provider.calls(Endpoint::Rate),
        vec![json!({"token": "USDT", "amount": 40.0, "currency": "KES"})]
    );

    let id = created.order["data"]["id"].as_str().unwrap().to_string();
    let tracked = svc.order(&id).await.unwrap();
    assert_eq!(tracked["data"]["status"], "processing");
    assert_eq!(
        tracked["data"]["statusMessage"],
        "Order being processed by provider"
    );
    assert_eq!(provider.calls(Endpoint::Order), vec![json!({"id": "ord_kes_1"})]);
}
