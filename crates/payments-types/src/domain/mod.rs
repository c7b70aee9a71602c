pub mod credentials;
pub mod envelope;
pub mod order_status;
pub mod payment;
pub mod stale_rate;
