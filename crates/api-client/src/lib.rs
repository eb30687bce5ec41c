//! # Meridian API Client Crate
//!
//! The exchange gateway: builds signed requests to the Binance USDT-M
//! Futures REST API, classifies the outcome of every attempt, retries
//! transient failures with bounded exponential backoff, and appends every
//! attempt to the audit trail before returning.
//!
//! ## Architectural Principles
//!
//! - **Classification over retries-everywhere:** a 4xx is deterministic and
//!   is never retried; only 5xx and transport failures burn retry budget. A
//!   2xx with an unparseable body is surfaced immediately because the order
//!   may already be live on the exchange.
//! - **Injected edges:** the HTTP wire (`Transport`) and the backoff waits
//!   (`Sleeper`) are traits, so the retry loop is tested with scripted
//!   responses and zero real delays.

use crate::auth::sign_request;
use crate::error::GatewayError;
use crate::responses::{ApiErrorResponse, OrderResponse, ParsedResponse};
use crate::transport::{HttpResponse, ReqwestTransport, Transport};
use async_trait::async_trait;
use audit::{AuditRecord, AuditSink};
use chrono::Utc;
use clock::{Sleeper, TokioSleeper};
use configuration::{ApiKeys, Config, RetrySettings};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

mod auth;
pub mod error;
pub mod responses;
pub mod transport;

// --- Public API ---
pub use error::TransportError;

/// Wire-level request parameters, sorted so the signed query string is
/// canonical and reproducible.
pub type Params = BTreeMap<&'static str, String>;

const COMPONENT: &str = "gateway";

/// The generic, abstract interface to the exchange's signed order endpoint.
/// This trait is the contract the executor uses, allowing the underlying
/// implementation (live or scripted) to be swapped out.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Sends a signed POST to `path` and returns the parsed response.
    /// Transient failures are retried internally; the returned error is
    /// always terminal.
    async fn send_order(&self, path: &str, params: Params)
        -> Result<ParsedResponse, GatewayError>;
}

/// A concrete `Gateway` for the Binance futures REST API.
pub struct BinanceGateway {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    audit: Arc<dyn AuditSink>,
    base_url: String,
    api_secret: String,
    recv_window: u64,
    retry: RetrySettings,
}

impl BinanceGateway {
    /// Builds a production gateway from the loaded configuration, selecting
    /// the testnet or production base URL by `live_mode`.
    pub fn connect(
        live_mode: bool,
        config: &Config,
        keys: &ApiKeys,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, GatewayError> {
        let base_url = if live_mode {
            config.exchange.production_url.clone()
        } else {
            config.exchange.testnet_url.clone()
        };

        let transport = ReqwestTransport::new(
            &keys.key,
            Duration::from_secs(config.exchange.request_timeout_secs),
        )
        .map_err(|e| GatewayError::RequestBuild(e.to_string()))?;

        Ok(Self::new(
            base_url,
            keys.secret.clone(),
            config.exchange.recv_window,
            config.retry.clone(),
            Arc::new(transport),
            Arc::new(TokioSleeper),
            audit,
        ))
    }

    /// Fully injected constructor, used directly by tests.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_url: String,
        api_secret: String,
        recv_window: u64,
        retry: RetrySettings,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            transport,
            sleeper,
            audit,
            base_url,
            api_secret,
            recv_window,
            retry,
        }
    }

    /// Canonicalizes and signs the parameters into the final request URL.
    ///
    /// The query string that is signed is byte-for-byte the query string
    /// that is sent; only the signature itself is appended afterwards.
    fn signed_url(&self, path: &str, params: &Params) -> Result<String, GatewayError> {
        let mut signed = params.clone();
        signed.insert("timestamp", Utc::now().timestamp_millis().to_string());
        signed.insert("recvWindow", self.recv_window.to_string());

        let query = serde_qs::to_string(&signed)
            .map_err(|e| GatewayError::RequestBuild(e.to_string()))?;
        let signature = sign_request(&self.api_secret, &query);

        Ok(format!(
            "{}{}?{}&signature={}",
            self.base_url, path, query, signature
        ))
    }

    /// Appends to the audit trail; an audit failure is reported but never
    /// turns a successful exchange call into an error.
    fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.append(record) {
            tracing::error!(error = %e, "failed to append audit record");
        }
    }

    fn parse_success(
        &self,
        path: &str,
        attempt: u32,
        response: HttpResponse,
    ) -> Result<ParsedResponse, GatewayError> {
        let raw: serde_json::Value = match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(e) => return Err(self.malformed(path, attempt, response.status, e.to_string())),
        };
        let order: OrderResponse = match serde_json::from_value(raw.clone()) {
            Ok(order) => order,
            Err(e) => return Err(self.malformed(path, attempt, response.status, e.to_string())),
        };

        self.record(
            AuditRecord::info(
                COMPONENT,
                format!(
                    "order accepted: orderId={} status={} executedQty={}",
                    order.order_id, order.status, order.executed_qty
                ),
            )
            .with_request("POST", path)
            .with_status(response.status)
            .with_attempt(attempt),
        );
        tracing::info!(path, order_id = order.order_id, status = %order.status, "order accepted");

        Ok(ParsedResponse { order, raw })
    }

    fn malformed(&self, path: &str, attempt: u32, status: u16, detail: String) -> GatewayError {
        self.record(
            AuditRecord::error(COMPONENT, format!("unparseable response body: {detail}"))
                .with_request("POST", path)
                .with_status(status)
                .with_attempt(attempt),
        );
        tracing::error!(path, status, "unparseable exchange response");
        GatewayError::MalformedResponse(detail)
    }

    fn rejection(&self, path: &str, attempt: u32, response: HttpResponse) -> GatewayError {
        // Surface the exchange's own code and message verbatim; fall back to
        // the raw body when the error payload itself does not parse.
        let (code, msg) = match serde_json::from_str::<ApiErrorResponse>(&response.body) {
            Ok(err) => (err.code, err.msg),
            Err(_) => (0, response.body.clone()),
        };

        self.record(
            AuditRecord::error(COMPONENT, format!("request rejected (code {code}): {msg}"))
                .with_request("POST", path)
                .with_status(response.status)
                .with_attempt(attempt),
        );
        tracing::error!(path, status = response.status, code, msg = %msg, "request rejected");

        GatewayError::Rejected {
            status: response.status,
            code,
            msg,
        }
    }
}

#[async_trait]
impl Gateway for BinanceGateway {
    async fn send_order(
        &self,
        path: &str,
        params: Params,
    ) -> Result<ParsedResponse, GatewayError> {
        let mut delay = Duration::from_millis(self.retry.base_delay_ms);
        let max_elapsed = Duration::from_millis(self.retry.max_elapsed_ms);
        let mut backoff_spent = Duration::ZERO;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            // Timestamp and signature are rebuilt per attempt so a retry is
            // never rejected for a stale timestamp.
            let url = self.signed_url(path, &params)?;

            self.record(
                AuditRecord::info(COMPONENT, format!("POST {path} params={params:?}"))
                    .with_request("POST", path)
                    .with_attempt(attempt),
            );
            tracing::info!(path, attempt, "sending request");

            let failure = match self.transport.post(&url).await {
                Ok(response) if (200..300).contains(&response.status) => {
                    return self.parse_success(path, attempt, response);
                }
                Ok(response) if (400..500).contains(&response.status) => {
                    return Err(self.rejection(path, attempt, response));
                }
                Ok(response) => {
                    self.record(
                        AuditRecord::warn(
                            COMPONENT,
                            format!("server error HTTP {}", response.status),
                        )
                        .with_request("POST", path)
                        .with_status(response.status)
                        .with_attempt(attempt),
                    );
                    format!("HTTP {}", response.status)
                }
                Err(e) => {
                    self.record(
                        AuditRecord::warn(COMPONENT, format!("transport failure: {e}"))
                            .with_request("POST", path)
                            .with_attempt(attempt),
                    );
                    e.to_string()
                }
            };

            let budget_left =
                attempt < self.retry.max_attempts && backoff_spent + delay <= max_elapsed;
            if !budget_left {
                self.record(
                    AuditRecord::error(
                        COMPONENT,
                        format!("retry budget exhausted after {attempt} attempts: {failure}"),
                    )
                    .with_request("POST", path)
                    .with_attempt(attempt),
                );
                tracing::error!(path, attempt, "retry budget exhausted");
                return Err(GatewayError::Exhausted {
                    attempts: attempt,
                    last: failure,
                });
            }

            tracing::warn!(path, attempt, delay_ms = delay.as_millis() as u64, "transient failure, backing off");
            self.sleeper.sleep(delay).await;
            backoff_spent += delay;
            delay *= 2;
        }
    }
}
