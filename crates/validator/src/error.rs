use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid symbol {0:?}: expected 3-20 uppercase alphanumeric characters, e.g. BTCUSDT")]
    InvalidSymbol(String),

    #[error("Invalid side {0:?}: must be BUY or SELL")]
    InvalidSide(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Missing {0}: required for this order type")]
    MissingPrice(&'static str),

    #[error("Invalid {field} {value:?}: must be a positive decimal")]
    InvalidPrice {
        field: &'static str,
        value: String,
    },

    #[error("Invalid slice count {0}: must be at least 1")]
    InvalidSliceCount(u32),
}
