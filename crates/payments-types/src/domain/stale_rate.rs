use regex::Regex;
use std::sync::LazyLock;

use crate::domain::envelope::FieldError;

pub const RATE_FIELD: &str = "Rate";
const AVAILABLE_RATE_MARKER: &str = "Available rate is";

static AVAILABLE_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Available rate is (\d+\.\d+)").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleRatePolicy {
    pub max_attempts: u32,
}

impl Default for StaleRatePolicy {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

impl StaleRatePolicy {
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }

    pub fn corrected_rate(&self, rejection: &FieldError) -> Option<f64> {
        if rejection.field != RATE_FIELD || !rejection.message.contains(AVAILABLE_RATE_MARKER) {
            return None;
        }
        AVAILABLE_RATE
            .captures(&rejection.message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }
}
