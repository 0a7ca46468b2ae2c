use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Extraction service returned [{status}]: {body}")]
    Api {
        status: StatusCode,
        body: String
    },
    #[error("Extraction service returned no choices")]
    EmptyResponse,
    #[error("Extraction reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Extraction reply has an invalid amount [{0}]")]
    InvalidAmount(String)
}
