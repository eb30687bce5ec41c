//! # Meridian Executor Crate
//!
//! Turns a validated `OrderRequest` into wire parameters for the exchange's
//! order endpoint and normalizes the gateway's outcome into an `OrderResult`
//! or an `ExecutionError`.
//!
//! ## Architectural Principles
//!
//! - **Kind-driven wire mapping:** the request's kind variant carries the
//!   price fields that kind requires, and `wire_params` maps each variant to
//!   its exact parameter set. There is no code path that can omit a required
//!   field for a given kind.
//! - **No retries here:** retrying is a transport concern and already
//!   happened inside the gateway by the time an error reaches this layer.
//!
//! ## Public API
//!
//! - `Executor`: the trait the TWAP scheduler and the CLI are written
//!   against.
//! - `LiveExecutor`: the production implementation, delegating to a
//!   `Gateway`.
//! - `ExecutionError`: the two terminal failure modes of a placement.

use api_client::error::GatewayError;
use api_client::{Gateway, Params};
use async_trait::async_trait;
use audit::{AuditRecord, AuditSink};
use core_types::{OrderKind, OrderRequest, OrderResult};
use std::sync::Arc;
use uuid::Uuid;

pub mod error;

pub use error::ExecutionError;

const COMPONENT: &str = "executor";
const ORDER_PATH: &str = "/fapi/v1/order";

/// A generic trait for an order placement engine.
///
/// The scheduler and the CLI are agnostic about whether they are talking to
/// the live exchange or a scripted stand-in.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Places a MARKET order.
    async fn place_market(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError>;

    /// Places a LIMIT order (GTC).
    async fn place_limit(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError>;

    /// Places a STOP (stop-limit) order (GTC).
    async fn place_stop(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError>;
}

/// The production executor: one gateway call per placement.
pub struct LiveExecutor {
    gateway: Arc<dyn Gateway>,
    audit: Arc<dyn AuditSink>,
}

impl LiveExecutor {
    pub fn new(gateway: Arc<dyn Gateway>, audit: Arc<dyn AuditSink>) -> Self {
        Self { gateway, audit }
    }

    async fn submit(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError> {
        let kind = order.kind.as_str();
        tracing::info!(
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            kind,
            "placing order"
        );
        self.record(AuditRecord::info(
            COMPONENT,
            format!(
                "placing {kind} order: symbol={} side={} qty={}",
                order.symbol, order.side, order.quantity
            ),
        ));

        let outcome = self.gateway.send_order(ORDER_PATH, wire_params(order)).await;

        match outcome {
            Ok(parsed) => {
                let result = OrderResult {
                    order_id: parsed.order.order_id,
                    status: parsed.order.status,
                    executed_qty: parsed.order.executed_qty,
                    // The exchange reports "0" until there is a fill; absent
                    // is the honest representation of that.
                    avg_price: parsed.order.avg_price.filter(|p| !p.is_zero()),
                    raw: parsed.raw,
                };
                self.record(AuditRecord::info(
                    COMPONENT,
                    format!(
                        "{kind} order placed: orderId={} status={}",
                        result.order_id, result.status
                    ),
                ));
                Ok(result)
            }
            Err(e) => {
                let error = map_gateway_error(e);
                self.record(AuditRecord::error(
                    COMPONENT,
                    format!("{kind} order failed: {error}"),
                ));
                tracing::error!(error = %error, "order placement failed");
                Err(error)
            }
        }
    }

    fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.append(record) {
            tracing::error!(error = %e, "failed to append audit record");
        }
    }
}

#[async_trait]
impl Executor for LiveExecutor {
    async fn place_market(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError> {
        self.submit(order).await
    }

    async fn place_limit(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError> {
        self.submit(order).await
    }

    async fn place_stop(&self, order: &OrderRequest) -> Result<OrderResult, ExecutionError> {
        self.submit(order).await
    }
}

/// Maps an order to the exact parameter set its kind requires.
fn wire_params(order: &OrderRequest) -> Params {
    let mut params = Params::new();
    params.insert("symbol", order.symbol.clone());
    params.insert("side", order.side.as_str().to_string());
    params.insert("type", order.kind.as_str().to_string());
    params.insert("quantity", order.quantity.to_string());
    params.insert("newClientOrderId", format!("meridian-{}", Uuid::new_v4()));

    match &order.kind {
        OrderKind::Market => {}
        OrderKind::Limit { price } => {
            params.insert("price", price.to_string());
            params.insert("timeInForce", "GTC".to_string());
        }
        OrderKind::Stop {
            price,
            trigger_price,
        } => {
            params.insert("price", price.to_string());
            params.insert("stopPrice", trigger_price.to_string());
            params.insert("timeInForce", "GTC".to_string());
        }
    }

    params
}

fn map_gateway_error(error: GatewayError) -> ExecutionError {
    match error {
        GatewayError::Rejected { code, msg, .. } => ExecutionError::Rejected { code, reason: msg },
        other => ExecutionError::Unavailable(other.to_string()),
    }
}
