#[cfg(not(any(feature = "memory", feature = "http")))]
compile_error!("Enable a provider feature: `memory` or `http`.");

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "http")]
pub use http::{PaycrestProvider, ProviderConfig};

#[cfg(feature = "http")]
pub fn build_provider(config: ProviderConfig) -> anyhow::Result<PaycrestProvider> {
    PaycrestProvider::from_config(config)
}
