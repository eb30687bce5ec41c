use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to write to the audit sink: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize an audit record: {0}")]
    Serialize(#[from] serde_json::Error),
}
