use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T = Value> {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl Envelope<Value> {
    pub fn field_error(&self) -> Option<FieldError> {
        let data = self.data.as_ref()?.as_object()?;
        Some(FieldError {
            field: data.get("field")?.as_str()?.to_string(),
            message: data.get("message")?.as_str()?.to_string(),
        })
    }

    pub fn rejection_message(&self, fallback: &str) -> String {
        if let Some(err) = self.field_error() {
            return format!("{}: {}", err.field, err.message);
        }
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }
}

pub fn lists_token(tokens: &Value, symbol: &str) -> bool {
    tokens
        .get("data")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .any(|t| t.get("symbol").and_then(Value::as_str) == Some(symbol))
        })
        .unwrap_or(false)
}
