//! payments-hex: hexagonal payment relay library (core + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use payments_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
