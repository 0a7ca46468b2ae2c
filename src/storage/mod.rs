mod memory_storage;
mod sqlite_storage;

use chrono::NaiveDate;

use crate::models::{Expense, NewExpense, StoreError};
use crate::types::{ExpenseId, UserId};

pub use memory_storage::MemoryStorage;
pub use sqlite_storage::SqliteStorage;

/// Owner scoped access to the expense table.
///
/// Every read excludes soft-deleted records and sorts by `date` descending,
/// newest id first within a day.
pub trait Storage: Send + Sync + 'static {
    fn list(&self, owner: UserId) -> Result<Vec<Expense>, StoreError>;
    fn get(&self, owner: UserId, expense_id: ExpenseId) -> Result<Expense, StoreError>;
    fn create(&self, expense: NewExpense) -> Result<ExpenseId, StoreError>;
    /// Replaces description, amount, category and date of a fetched record.
    ///
    /// Fails with `Conflict` when the stored version no longer matches `expense.version`.
    fn update(&self, expense: &Expense) -> Result<(), StoreError>;
    /// Soft deletes a record. Deleting a missing or already deleted record is `NotFound`.
    fn delete(&self, owner: UserId, expense_id: ExpenseId) -> Result<(), StoreError>;
    fn list_in_range(&self, owner: UserId, since: NaiveDate) -> Result<Vec<Expense>, StoreError>;
}
