use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram method [{method}] failed: {description}")]
    Api {
        method: &'static str,
        description: String
    }
}
