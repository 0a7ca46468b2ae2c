mod client;
mod errors;

use async_trait::async_trait;

use crate::models::CandidateExpense;

pub use client::{parse_candidate, OpenRouterExtractor, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use errors::ExtractionError;

/// Turns free text into a candidate expense.
///
/// Implementations never retry; a candidate with a zero amount is a valid
/// answer meaning "no expense in this text".
#[async_trait]
pub trait Extractor: Send + Sync + 'static {
    async fn extract(&self, text: &str) -> Result<CandidateExpense, ExtractionError>;
}
