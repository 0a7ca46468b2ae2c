use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::types::{ExpenseId, UserId};

/// A persisted spending event.
///
/// Records are never physically removed: a delete stamps `deleted_at` and the
/// row is excluded from every read from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Store assigned identifier, never reused.
    pub id: ExpenseId,
    /// The user that owns the record.
    pub owner: UserId,
    pub description: String,
    pub category: String,
    /// Always greater than zero.
    pub amount: Decimal,
    /// The day the money was spent, which is not necessarily the day it was recorded.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Incremented on every successful update; used to reject stale writes.
    pub version: i64
}

/// The fields required to insert a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub owner: UserId,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate
}

/// An expense as understood by the extraction service, before it has an owner.
///
/// A zero amount means the text did not describe a purchase at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateExpense {
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate
}

impl CandidateExpense {
    /// Whether the candidate carries a positive amount and may be persisted.
    pub fn is_expense(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn into_new_expense(self, owner: UserId) -> NewExpense {
        NewExpense {
            owner,
            description: self.description,
            category: self.category,
            amount: self.amount,
            date: self.date
        }
    }
}
