use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// The exchange declined the order. Deterministic; retrying would only
    /// burn rate-limit budget. The exchange's reason text is kept verbatim.
    #[error("Order rejected by the exchange (code {code}): {reason}")]
    Rejected { code: i32, reason: String },

    /// The transport layer exhausted its retries or returned an unparseable
    /// response. The order's fate on the exchange may be unknown.
    #[error("Exchange unavailable: {0}")]
    Unavailable(String),
}
