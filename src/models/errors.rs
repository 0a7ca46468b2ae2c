use thiserror::Error;

use crate::models::Expense;
use crate::types::{ExpenseId, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Expense [{expense_id}] was not found for user [{owner}]")]
    NotFound {
        owner: UserId,
        expense_id: ExpenseId
    },
    #[error("Expense [{expense_id}] for user [{owner}] was modified concurrently (expected version [{version}])")]
    Conflict {
        owner: UserId,
        expense_id: ExpenseId,
        version: i64
    },
    #[error("Stored amount [{value}] for expense [{expense_id}] is not a valid decimal")]
    CorruptAmount {
        expense_id: ExpenseId,
        value: String
    },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError)
}

impl StoreError {
    pub fn not_found(owner: UserId, expense_id: ExpenseId) -> Self {
        Self::NotFound { owner, expense_id }
    }

    pub fn conflict(expense: &Expense) -> Self {
        Self::Conflict {
            owner: expense.owner,
            expense_id: expense.id,
            version: expense.version
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
