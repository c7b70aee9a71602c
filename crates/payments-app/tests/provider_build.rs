use payments_hex::config::Config;
use payments_provider::{build_provider, ProviderConfig};
use payments_types::domain::credentials::ApiKey;
use std::time::Duration;

#[test]
fn builds_provider_from_config() {
    let config = Config::from_lookup(|k| match k {
        "API_KEY" => Some("from-env".into()),
        "PAYCREST_BASE_URL" => Some("http://127.0.0.1:4010/v1/".into()),
        _ => None,
    })
    .expect("config");
    assert_eq!(config.api_key, Some(ApiKey::from("from-env")));

    let provider = build_provider(ProviderConfig {
        base_url: config.provider_base_url,
        api_key: config.api_key,
        timeout: Some(config.provider_timeout),
    });
    assert!(provider.is_ok());

    let bad = build_provider(ProviderConfig {
        base_url: "::not a url::".into(),
        api_key: None,
        timeout: Some(Duration::from_secs(1)),
    });
    assert!(bad.is_err());
}
