mod commands;
pub mod replies;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};

use crate::classifier::{classify, Intent};
use crate::extraction::Extractor;
use crate::models::StoreError;
use crate::recap::{self, RecapError};
use crate::storage::Storage;
use crate::telegram::{IncomingMessage, Messenger};
use crate::types::{format_currency, ChatId, ExpenseId, UserId};

pub use commands::{Action, CommandError, ExpenseUpdate};

type RecapBuilder = fn(&dyn Storage, UserId, NaiveDate) -> Result<String, RecapError>;

/// Everything a message handler needs, passed in explicitly rather than held globally.
#[derive(Clone)]
pub struct BotContext {
    pub storage: Arc<dyn Storage>,
    pub extractor: Arc<dyn Extractor>,
    pub messenger: Arc<dyn Messenger>,
    /// The only Telegram user the bot answers; also the owner of every stored expense.
    pub authorized_user: UserId
}

/// Routes one incoming message to exactly one reply.
pub struct Dispatcher {
    context: BotContext
}

impl Dispatcher {
    pub fn new(context: BotContext) -> Self {
        Self { context }
    }

    pub fn authorized_user(&self) -> UserId {
        self.context.authorized_user
    }

    pub async fn handle(&self, message: IncomingMessage) {
        let chat_id = message.chat_id;

        if message.sender_id != self.context.authorized_user {
            warn!("Rejected message from unauthorized user [{}]", message.sender_id);
            self.reply(chat_id, replies::UNAUTHORIZED).await;
            return;
        }

        debug!("Received text from [{}]: {}", message.sender_id, message.text);

        let text = message.text.trim();

        let action = match text.strip_prefix('/') {
            Some(command) => Action::parse_command(command),
            None => {
                let classification = classify(text);

                if classification.intent == Intent::None {
                    self.record_expense(message.sender_id, chat_id, text).await;
                    return;
                }

                Action::from_classification(classification)
            }
        };

        match action {
            Ok(action) => self.execute(message.sender_id, chat_id, action).await,
            Err(error) => {
                debug!("Rejected command from [{}]: {error:?}", message.sender_id);
                self.reply(chat_id, &error.to_string()).await;
            }
        }
    }

    /// Runs a parsed action for `owner` and sends its reply to `chat_id`.
    pub async fn execute(&self, owner: UserId, chat_id: ChatId, action: Action) {
        let reply = match action {
            Action::Start => replies::START.to_string(),
            Action::Help => replies::HELP.to_string(),
            Action::List => self.list(owner).await,
            Action::MonthlyRecap => self.recap(owner, recap::monthly_recap).await,
            Action::WeeklyRecap => self.recap(owner, recap::weekly_recap).await,
            Action::Delete(expense_id) => self.delete(owner, expense_id).await,
            Action::Update(update) => self.update(owner, update).await
        };

        self.reply(chat_id, &reply).await;
    }

    /// Sends the weekly recap to the authorized user's private chat.
    pub async fn send_weekly_recap(&self) {
        let owner = self.context.authorized_user;
        info!("Sending weekly recap to [{owner}]");
        self.execute(owner, owner, Action::WeeklyRecap).await;
    }

    async fn record_expense(&self, owner: UserId, chat_id: ChatId, text: &str) {
        let candidate = match self.context.extractor.extract(text).await {
            Ok(candidate) => candidate,
            Err(error) => {
                error!("Expense extraction failed: {error}");
                self.reply(chat_id, replies::GUIDANCE).await;
                return;
            }
        };

        if !candidate.is_expense() {
            debug!("No expense recognized in message from [{owner}]");
            self.reply(chat_id, replies::NO_EXPENSE).await;
            return;
        }

        let expense = candidate.into_new_expense(owner);
        let amount = format_currency(expense.amount);
        let category = expense.category.clone();
        let description = expense.description.clone();

        let reply = match self.with_storage(move |storage| storage.create(expense)).await {
            Ok(expense_id) => {
                info!("Saved expense [{expense_id}] for [{owner}]");
                replies::saved(expense_id, &category, &amount, &description)
            },
            Err(error) => {
                error!("Failed to save expense for [{owner}]: {error}");
                replies::SAVE_FAILED.to_string()
            }
        };

        self.reply(chat_id, &reply).await;
    }

    /// Runs a store operation on the blocking pool, the SQLite backend does disk I/O under a lock.
    async fn with_storage<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&dyn Storage) -> Result<T, E> + Send + 'static,
    {
        let storage = self.context.storage.clone();

        spawn_blocking(move || operation(storage.as_ref()))
            .await
            .map_err(StoreError::from)?
    }

    async fn list(&self, owner: UserId) -> String {
        match self.with_storage(move |storage| storage.list(owner)).await {
            Ok(expenses) => replies::expense_list(&expenses),
            Err(error) => {
                error!("Failed to list expenses for [{owner}]: {error}");
                replies::LOAD_FAILED.to_string()
            }
        }
    }

    async fn recap(&self, owner: UserId, build: RecapBuilder) -> String {
        let today = today();

        match self.with_storage(move |storage| build(storage, owner, today)).await {
            Ok(recap) => recap,
            Err(error) => {
                error!("Failed to build recap for [{owner}]: {error}");
                replies::LOAD_FAILED.to_string()
            }
        }
    }

    async fn delete(&self, owner: UserId, expense_id: ExpenseId) -> String {
        match self.with_storage(move |storage| storage.delete(owner, expense_id)).await {
            Ok(()) => {
                info!("Deleted expense [{expense_id}] for [{owner}]");
                replies::deleted(expense_id)
            },
            Err(error) => {
                warn!("Failed to delete expense: {error}");
                replies::delete_failed(expense_id)
            }
        }
    }

    async fn update(&self, owner: UserId, update: ExpenseUpdate) -> String {
        let expense_id = update.id;

        let result = self.with_storage(move |storage| {
            let mut expense = storage.get(owner, expense_id)?;

            expense.description = update.description;
            expense.amount = update.amount;
            expense.category = update.category;

            storage.update(&expense)?;
            Ok::<_, StoreError>(expense)
        }).await;

        match result {
            Ok(expense) => {
                info!("Updated expense [{expense_id}] for [{owner}]");
                replies::updated(&expense)
            },
            Err(error) if error.is_not_found() => replies::not_found(expense_id),
            Err(error) => {
                warn!("Failed to update expense: {error}");
                replies::update_failed(expense_id)
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, text: &str) {
        if let Err(error) = self.context.messenger.send_message(chat_id, text).await {
            error!("Failed to send reply to chat [{chat_id}]: {error}");
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
