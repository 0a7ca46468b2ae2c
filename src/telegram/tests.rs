use super::{message_length, split_message, IncomingMessage, Messenger, TelegramClient, TelegramError, Update, MESSAGE_LIMIT};
use crate::testing::StubServer;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

const TOKEN: &str = "TEST-TOKEN";

#[test]
fn test_update_with_text_message_becomes_incoming_message() -> Result<()> {
    let update: Update = serde_json::from_str(r#"{
        "update_id": 10,
        "message": {
            "message_id": 1,
            "date": 1709251200,
            "from": {"id": 1001, "is_bot": false, "first_name": "Rafi"},
            "chat": {"id": 1001, "type": "private"},
            "text": "makan nasi padang 25000"
        }
    }"#)?;

    assert_eq!(update.into_incoming(), Some(IncomingMessage {
        sender_id: 1001,
        chat_id: 1001,
        text: "makan nasi padang 25000".to_string()
    }));

    Ok(())
}

#[test]
fn test_updates_without_text_or_sender_are_skipped() -> Result<()> {
    let sticker: Update = serde_json::from_str(
        r#"{"update_id": 11, "message": {"message_id": 2, "from": {"id": 1}, "chat": {"id": 1}, "sticker": {}}}"#
    )?;
    let anonymous: Update = serde_json::from_str(
        r#"{"update_id": 12, "message": {"message_id": 3, "chat": {"id": -100}, "text": "halo"}}"#
    )?;
    let edited: Update = serde_json::from_str(
        r#"{"update_id": 13, "edited_message": {"message_id": 4, "chat": {"id": 1}, "text": "halo"}}"#
    )?;

    assert!(sticker.into_incoming().is_none());
    assert!(anonymous.into_incoming().is_none());
    assert!(edited.into_incoming().is_none());

    Ok(())
}

#[test]
fn test_update_without_id_fails_to_parse() {
    assert!(serde_json::from_str::<Update>(r#"{"message": null}"#).is_err());
    assert!(serde_json::from_str::<Update>("not json").is_err());
}

#[test]
fn test_short_messages_are_not_split() {
    assert_eq!(split_message("halo", 4096), vec!["halo".to_string()]);
    assert_eq!(split_message("", 4096), vec![String::new()]);
}

#[test]
fn test_long_messages_split_on_line_boundaries() {
    let text = "aaaa\nbbbb\ncccc\n";
    let chunks = split_message(text, 10);

    assert_eq!(chunks, vec!["aaaa\nbbbb\n".to_string(), "cccc\n".to_string()]);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_overlong_lines_are_cut_by_characters() {
    let text = "ab\nééééééé";
    let chunks = split_message(text, 3);

    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 3));
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_counts_utf16_code_units() {
    let text = "🧾".repeat(5);
    let chunks = split_message(&text, 4);

    assert_eq!(chunks, vec!["🧾🧾".to_string(), "🧾🧾".to_string(), "🧾".to_string()]);
    assert!(chunks.iter().all(|chunk| message_length(chunk) <= 4));
}

#[test]
fn test_emoji_heavy_text_is_split_below_the_telegram_limit() {
    let text = "• 🍜 Rp25.000 (nasi padang) 🧾\n".repeat(140);
    let chunks = split_message(&text, MESSAGE_LIMIT);

    assert!(text.chars().count() <= MESSAGE_LIMIT);
    assert!(message_length(&text) > MESSAGE_LIMIT);
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|chunk| message_length(chunk) <= MESSAGE_LIMIT));
    assert_eq!(chunks.concat(), text);
}

#[tokio::test]
async fn test_client_sends_each_chunk_as_its_own_message() -> Result<()> {
    let server = StubServer::start(StatusCode::OK, json!({"ok": true, "result": {"message_id": 1}})).await?;
    let client = TelegramClient::with_base_url(&server.base_url, TOKEN);

    let text = format!("{}\n{}", "a".repeat(4000), "b".repeat(200));
    client.send_message(1001, &text).await?;

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.path == "/botTEST-TOKEN/sendMessage"));
    assert!(requests.iter().all(|request| request.body["chat_id"] == 1001));
    assert_eq!(requests[0].body["text"], format!("{}\n", "a".repeat(4000)));
    assert_eq!(requests[1].body["text"], "b".repeat(200));

    Ok(())
}

#[tokio::test]
async fn test_client_reports_api_rejection() -> Result<()> {
    let server = StubServer::start(
        StatusCode::BAD_REQUEST,
        json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})
    ).await?;
    let client = TelegramClient::with_base_url(&server.base_url, TOKEN);

    let result = client.send_message(42, "halo").await;

    assert!(matches!(
        result,
        Err(TelegramError::Api { method: "sendMessage", ref description }) if description == "Bad Request: chat not found"
    ));
    assert_eq!(server.requests().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_client_registers_webhook_url() -> Result<()> {
    let server = StubServer::start(StatusCode::OK, json!({"ok": true, "result": true, "description": "Webhook was set"})).await?;
    let client = TelegramClient::with_base_url(&server.base_url, TOKEN);

    client.set_webhook("https://bot.example.com/webhook").await?;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/botTEST-TOKEN/setWebhook");
    assert_eq!(requests[0].body["url"], "https://bot.example.com/webhook");

    Ok(())
}
