mod client;
mod errors;
#[cfg(test)]
mod tests;
mod update;

use async_trait::async_trait;

use crate::types::ChatId;

pub use client::TelegramClient;
pub use errors::TelegramError;
pub use update::{IncomingMessage, Update};

/// Telegram rejects messages longer than this many UTF-16 code units.
pub const MESSAGE_LIMIT: usize = 4096;

/// Outbound side of the bot transport.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError>;
    async fn set_webhook(&self, url: &str) -> Result<(), TelegramError>;
}

/// Length as Telegram measures it.
pub fn message_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Splits text into chunks of at most `limit` UTF-16 code units, preferring line boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    //NOTE: A surrogate pair needs two units, a smaller limit could never fit one
    let limit = limit.max(2);

    if message_length(text) <= limit {
        return vec![text.to_string()]
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_length = 0;

    for line in text.split_inclusive('\n') {
        let line_length = message_length(line);

        if current_length + line_length > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_length = 0;
        }

        if line_length <= limit {
            current.push_str(line);
            current_length += line_length;
            continue;
        }

        //NOTE: A single line longer than the limit has no boundary to honour, cut it between characters
        for character in line.chars() {
            let character_length = character.len_utf16();

            if current_length + character_length > limit {
                chunks.push(std::mem::take(&mut current));
                current_length = 0;
            }

            current.push(character);
            current_length += character_length;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
