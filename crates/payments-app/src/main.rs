use payments_hex::application::payment_service::PaymentService;
use payments_hex::config::Config;
use payments_hex::inbound::http::{HttpServer, HttpServerConfig};
use payments_provider::{build_provider, ProviderConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for API_KEY / PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("API_KEY not set; authenticated provider calls will be rejected upstream");
    }
    let provider = build_provider(ProviderConfig {
        base_url: config.provider_base_url.clone(),
        api_key: config.api_key.clone(),
        timeout: Some(config.provider_timeout),
    })?;
    let service = PaymentService::with_defaults(provider, config.order_defaults.clone());

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
