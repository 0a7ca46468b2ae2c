use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::{ExtractionError, Extractor};
use crate::models::CandidateExpense;
use crate::types::MAX_AMOUNT;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extracts expenses through an OpenRouter chat completion with a JSON object response format.
pub struct OpenRouterExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage
}

#[derive(Debug, Deserialize)]
struct ExpensePayload {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    amount: Option<RawAmount>,
    #[serde(default)]
    date: Option<String>
}

/// Models are asked for a number but occasionally quote it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String)
}

impl RawAmount {
    fn to_decimal(&self) -> Result<Decimal, ExtractionError> {
        match self {
            RawAmount::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    return Ok(Decimal::from(integer))
                }

                if let Some(integer) = number.as_u64() {
                    return Ok(Decimal::from(integer))
                }

                number.as_f64()
                    .and_then(Decimal::from_f64)
                    .ok_or_else(|| ExtractionError::InvalidAmount(number.to_string()))
            },
            RawAmount::Text(text) if text.trim().is_empty() => Ok(Decimal::ZERO),
            RawAmount::Text(text) => Decimal::from_str(text.trim())
                .map_err(|_| ExtractionError::InvalidAmount(text.clone()))
        }
    }
}

impl OpenRouterExtractor {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model
        }
    }

    fn build_prompt(text: &str, today: NaiveDate) -> String {
        let today = today.format(DATE_FORMAT);

        format!(r#"Extract expense information from the following text. If the text doesn't contain expense information, return default values.

Text: "{text}"

Respond in JSON format with the following structure:
{{
    "description": "the item or service purchased",
    "category": "the category of expense (e.g., Food, Transport, etc.)",
    "amount": "the numeric amount in rupiah (as a number)",
    "date": "the date in YYYY-MM-DD format (use {today} if not specified)"
}}

If no expense information is found, return:
{{
    "description": "",
    "category": "",
    "amount": 0,
    "date": "{today}"
}}"#)
    }
}

#[async_trait]
impl Extractor for OpenRouterExtractor {
    async fn extract(&self, text: &str) -> Result<CandidateExpense, ExtractionError> {
        let today = Local::now().date_naive();

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(text, today)
            }],
            response_format: ResponseFormat { format_type: "json_object" }
        };

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api { status, body })
        }

        let completion: CompletionResponse = response.json().await?;

        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(ExtractionError::EmptyResponse)
        };

        debug!("Extraction reply: {}", choice.message.content);

        parse_candidate(&choice.message.content, today)
    }
}

/// Parses the JSON object produced by the model.
///
/// A missing or unparsable date falls back to `today`; only a malformed object
/// or a non-numeric or oversized amount is an error.
pub fn parse_candidate(content: &str, today: NaiveDate) -> Result<CandidateExpense, ExtractionError> {
    let payload: ExpensePayload = serde_json::from_str(content)?;

    let amount = match &payload.amount {
        Some(raw) => raw.to_decimal()?,
        None => Decimal::ZERO
    };

    if amount > MAX_AMOUNT {
        return Err(ExtractionError::InvalidAmount(amount.to_string()))
    }

    let date = payload.date.as_deref()
        .and_then(|date| NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok())
        .unwrap_or(today);

    Ok(CandidateExpense {
        description: payload.description.unwrap_or_default().trim().to_string(),
        category: payload.category.unwrap_or_default().trim().to_string(),
        amount,
        date
    })
}
