///  To run :
///  cargo r --example client_example
use payments_client::PaymentsClient;
use payments_hex::application::payment_service::PaymentService;
use payments_hex::inbound::http::{HttpServer, HttpServerConfig};
use payments_provider::memory::{Endpoint, ScriptedProvider};
use payments_types::domain::payment::{Network, PaymentRequest, Recipient};
use serde_json::json;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Script the upstream provider so the demo runs offline.
    let provider = ScriptedProvider::new();
    provider
        .reply_json(Endpoint::Rate, json!({"status": "success", "data": "1495.10"}))
        .reply_json(
            Endpoint::VerifyAccount,
            json!({"status": "success", "data": "ADA OBI"}),
        )
        .reply_json(
            Endpoint::Tokens,
            json!({"status": "success", "data": [{"symbol": "USDC"}]}),
        )
        .reply_json(
            Endpoint::SubmitOrder,
            json!({
                "status": "error",
                "message": "Failed to validate payload",
                "data": {"field": "Rate", "message": "Rate is not achievable. Available rate is 1499.80"}
            }),
        )
        .reply_json(
            Endpoint::SubmitOrder,
            json!({"status": "success", "data": {"id": "ord_demo", "receiveAddress": "0xfeed"}}),
        )
        .reply_json(
            Endpoint::Order,
            json!({"status": "success", "data": {"id": "ord_demo", "status": "pending"}}),
        );

    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");
    let server = HttpServer::new(
        PaymentService::new(provider.clone()),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = PaymentsClient::new(&addr)?;
    let created = client
        .create_payment(&PaymentRequest {
            amount: 100.0,
            token: "USDC".into(),
            network: Some(Network::Celo),
            recipient: Recipient {
                institution: "OPAYNGPC".into(),
                account_identifier: "1234567890".into(),
                currency: "NGN".into(),
            },
        })
        .await?;
    println!(
        "Created order {} at rate {} for {}",
        created.order["data"]["id"], created.rate, created.verify_acc
    );
    println!(
        "Provider saw {} submissions (stale rate recovered)",
        provider.call_count(Endpoint::SubmitOrder)
    );

    let order = client.order("ord_demo").await?;
    println!(
        "Order status={} ({})",
        order["data"]["status"], order["data"]["statusMessage"]
    );

    handle.abort();
    Ok(())
}
