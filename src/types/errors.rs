use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount error: {0}")]
    InvalidFormat(#[from] rust_decimal::Error),
    #[error("Amount error: Value must be greater than zero")]
    NotPositive,
    #[error("Amount error: Value exceeds the largest accepted amount")]
    TooLarge
}
