use thiserror::Error;

/// A failed attempt to reach the exchange at the transport level.
///
/// Both variants are considered transient and eligible for retry; anything
/// the exchange actually answered is classified by the gateway instead.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

/// The terminal outcomes of a gateway call, after any retries.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The exchange answered with a 4xx. Deterministic; never retried. The
    /// exchange-provided error code and message are surfaced verbatim.
    #[error("Exchange rejected the request (HTTP {status}, code {code}): {msg}")]
    Rejected { status: u16, code: i32, msg: String },

    /// Transient failures (5xx, timeouts, network errors) persisted through
    /// the whole retry budget.
    #[error("Exchange unreachable after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    /// A 2xx response whose body did not match the expected schema. Not
    /// retried: the order may well have been accepted.
    #[error("Failed to parse the exchange response: {0}")]
    MalformedResponse(String),

    #[error("Failed to build the request query string: {0}")]
    RequestBuild(String),
}
