//! payments-types: domain model and outbound ports for the payment relay

pub mod domain;
pub mod ports;
