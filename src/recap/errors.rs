use thiserror::Error;

use crate::models::StoreError;

#[derive(Debug, Error)]
pub enum RecapError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Recap total overflowed")]
    Overflow
}
