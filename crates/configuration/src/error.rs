use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Missing or empty credential: set {0} in the environment or in .env")]
    MissingCredential(String),
}
