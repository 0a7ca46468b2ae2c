//! Fakes shared by the unit tests of the dispatcher, engine, server and HTTP clients.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::time::sleep;

use crate::dispatcher::BotContext;
use crate::extraction::{ExtractionError, Extractor};
use crate::models::CandidateExpense;
use crate::storage::Storage;
use crate::telegram::{Messenger, TelegramError};
use crate::types::{ChatId, UserId};

pub const AUTHORIZED_USER: UserId = 1001;
pub const STRANGER: UserId = 666;

/// Records every outbound call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(ChatId, String)>>,
    webhooks: Mutex<Vec<String>>,
    failing: AtomicBool,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send sleeps for `delay`, which keeps handlers in flight long enough to observe overlap.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { failing: AtomicBool::new(true), ..Self::default() }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn webhooks(&self) -> Vec<String> {
        self.webhooks.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(TelegramError::Api { method: "sendMessage", description: "Forbidden: bot was blocked by the user".to_string() })
        }

        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TelegramError::Api { method: "setWebhook", description: "Unauthorized".to_string() })
        }

        self.webhooks.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Returns a fixed candidate, or fails when built with [`StubExtractor::failing`].
pub struct StubExtractor {
    reply: Option<CandidateExpense>,
    calls: AtomicUsize
}

impl StubExtractor {
    pub fn returning(candidate: CandidateExpense) -> Self {
        Self { reply: Some(candidate), calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { reply: None, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self, _text: &str) -> Result<CandidateExpense, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(ExtractionError::EmptyResponse)
    }
}

pub fn candidate(description: &str, category: &str, amount: i64, date: NaiveDate) -> CandidateExpense {
    CandidateExpense {
        description: description.to_string(),
        category: category.to_string(),
        amount: Decimal::from(amount),
        date
    }
}

pub fn bot_context(storage: Arc<dyn Storage>, extractor: Arc<StubExtractor>, messenger: Arc<RecordingMessenger>) -> BotContext {
    BotContext {
        storage,
        extractor: extractor as Arc<dyn Extractor>,
        messenger: messenger as Arc<dyn Messenger>,
        authorized_user: AUTHORIZED_USER
    }
}

/// One request seen by a [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>
}

/// Local HTTP server answering every request with a fixed status and JSON body.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>
}

impl StubServer {
    pub async fn start(status: StatusCode, reply: Value) -> anyhow::Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState { status, reply, requests: requests.clone() };
        let router = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { base_url, requests })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(State(state): State<StubState>, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        authorization: headers.get("authorization").and_then(|value| value.to_str().ok()).map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null)
    });

    (state.status, Json(state.reply))
}
