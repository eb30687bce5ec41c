use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub exchange: ExchangeSettings,
    pub retry: RetrySettings,
    pub audit: AuditSettings,
}

/// Exchange endpoint and instrument constants.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeSettings {
    /// Base URL for the USDT-M Futures Testnet REST API.
    pub testnet_url: String,
    /// Base URL for the production REST API (used with `--live`).
    pub production_url: String,
    /// Validity window for signed requests, in milliseconds.
    pub recv_window: u64,
    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_secs: u64,
    /// The minimum quantity increment. Doubles as the minimum order quantity
    /// and as the flooring precision for TWAP slice arithmetic.
    pub quantity_step: Decimal,
}

/// Bounds on the gateway's transient-failure retry loop.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Total attempts for a single request, first try included.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry.
    pub base_delay_ms: u64,
    /// Hard ceiling on the cumulative backoff budget for one request.
    pub max_elapsed_ms: u64,
}

/// Where the append-only audit trail is written.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSettings {
    pub path: String,
}

/// An API key pair, loaded from the environment rather than `config.toml`.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub key: String,
    pub secret: String,
}
