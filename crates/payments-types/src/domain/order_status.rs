use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Initiated,
    Pending,
    Processing,
    Cancelled,
    Fulfilled,
    Validated,
    Settled,
    Expired,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Initiated,
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Cancelled,
        OrderStatus::Fulfilled,
        OrderStatus::Validated,
        OrderStatus::Settled,
        OrderStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Initiated => "initiated",
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Validated => "validated",
            OrderStatus::Settled => "settled",
            OrderStatus::Expired => "expired",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OrderStatus::Initiated => "Order initiated via API (before Gateway creation)",
            OrderStatus::Pending => "Order awaiting provider assignment",
            OrderStatus::Processing => "Order being processed by provider",
            OrderStatus::Cancelled => "Order cancelled by provider",
            OrderStatus::Fulfilled => "Order fulfilled by provider",
            OrderStatus::Validated => "Order validated and ready for settlement",
            OrderStatus::Settled => "Order fully completed on blockchain",
            OrderStatus::Expired => {
                "Order expired because no transfer was made to the receive address within the time limit"
            }
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Invalid order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

pub fn annotate_status(body: &mut Value) -> Result<Option<OrderStatus>, UnknownOrderStatus> {
    let Some(data) = body.get_mut("data").and_then(Value::as_object_mut) else {
        return Ok(None);
    };
    let status = match data.get("status") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.parse::<OrderStatus>()?,
        Some(other) => return Err(UnknownOrderStatus(other.to_string())),
    };
    data.insert(
        "statusMessage".into(),
        Value::String(status.description().into()),
    );
    Ok(Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_status_round_trips_through_its_name() {
        for st in OrderStatus::ALL {
            assert_eq!(st.as_str().parse::<OrderStatus>().unwrap(), st);
            assert_eq!(serde_json::to_value(st).unwrap(), json!(st.as_str()));
        }
        assert_eq!(
            "refunded".parse::<OrderStatus>(),
            Err(UnknownOrderStatus("refunded".into()))
        );
    }

    #[test]
    fn annotate_adds_status_message() {
        let mut body = json!({
            "status": "success",
            "message": "Order retrieved",
            "data": {"id": "ord_1", "status": "expired", "amount": "10"}
        });
        let st = annotate_status(&mut body).unwrap();
        assert_eq!(st, Some(OrderStatus::Expired));
        assert_eq!(
            body["data"]["statusMessage"],
            "Order expired because no transfer was made to the receive address within the time limit"
        );
        assert_eq!(body["data"]["amount"], "10");
        assert_eq!(body["message"], "Order retrieved");
    }

    #[test]
    fn annotate_rejects_unknown_and_skips_missing() {
        let mut bad = json!({"data": {"status": "lost"}});
        let err = annotate_status(&mut bad).unwrap_err();
        assert_eq!(err.to_string(), "Invalid order status: lost");

        let mut numeric = json!({"data": {"status": 3}});
        assert!(annotate_status(&mut numeric).is_err());

        let mut missing = json!({"status": "error", "message": "Order not found"});
        let before = missing.clone();
        assert_eq!(annotate_status(&mut missing).unwrap(), None);
        assert_eq!(missing, before);

        let mut no_status = json!({"data": {"id": "x"}});
        assert_eq!(annotate_status(&mut no_status).unwrap(), None);
        assert!(no_status["data"].get("statusMessage").is_none());
    }
}
