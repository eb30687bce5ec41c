//! # Meridian Configuration Crate
//!
//! Loads the non-secret application settings from `config.toml` and the API
//! credentials from the environment (optionally via a `.env` file). Secrets
//! never live in the configuration file.

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{ApiKeys, AuditSettings, Config, ExchangeSettings, RetrySettings};

/// Loads the application configuration from the `config.toml` file.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

/// Loads the API key pair for the selected environment.
///
/// Testnet credentials come from `BINANCE_API_KEY` / `BINANCE_API_SECRET`;
/// production credentials from the `BINANCE_LIVE_*` pair. A `.env` file in
/// the working directory is honored if present.
pub fn load_keys(live_mode: bool) -> Result<ApiKeys, ConfigError> {
    // Safe to call repeatedly; a missing .env just means env-vars only.
    let _ = dotenvy::dotenv();

    let (key_var, secret_var) = if live_mode {
        ("BINANCE_LIVE_API_KEY", "BINANCE_LIVE_API_SECRET")
    } else {
        ("BINANCE_API_KEY", "BINANCE_API_SECRET")
    };

    let key = read_env(key_var)?;
    let secret = read_env(secret_var)?;

    Ok(ApiKeys { key, secret })
}

fn read_env(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(name.to_string())),
    }
}
