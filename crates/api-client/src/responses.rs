use core_types::{OrderSide, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The response from a successful `POST /fapi/v1/order` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub status: OrderStatus,
    pub executed_qty: Decimal,
    /// Reported as "0" until the order has a fill.
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    pub orig_qty: Decimal,
    #[serde(rename = "type")]
    pub order_type: String,
    // There are more fields, but these are the ones the client acts on.
}

/// A successfully parsed exchange response plus the untouched body it came
/// from, kept for the audit trail.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub order: OrderResponse,
    pub raw: serde_json::Value,
}

/// Represents an error response from the Binance API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub msg: String,
}
