use serde::Deserialize;

use crate::types::{ChatId, UserId};

/// The subset of a Telegram `Update` the bot reads; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId
}

/// A text message from an identified sender, the unit of work handed to the dispatcher.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IncomingMessage {
    pub sender_id: UserId,
    pub chat_id: ChatId,
    pub text: String
}

impl Update {
    /// Returns the text message carried by this update, if any.
    ///
    /// Edits, channel posts, stickers and messages without a sender yield `None`.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let sender = message.from?;
        let text = message.text.filter(|text| !text.is_empty())?;

        Some(IncomingMessage {
            sender_id: sender.id,
            chat_id: message.chat.id,
            text
        })
    }
}
