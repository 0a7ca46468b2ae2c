use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::info;

use crate::models::{Expense, NewExpense, StoreError};
use crate::storage::Storage;
use crate::types::{ExpenseId, UserId};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT,
        version INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses (user_id, date);
    CREATE INDEX IF NOT EXISTS idx_expenses_deleted_at ON expenses (deleted_at);
";

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, description, category, amount, date, created_at, updated_at, deleted_at, version FROM expenses";

/// Durable storage backed by a single SQLite table.
///
/// `AUTOINCREMENT` keeps ids from being reused even after rows are purged by hand.
pub struct SqliteStorage {
    connection: Mutex<Connection>
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let connection = Connection::open(path)?;
        info!("Opened expense database at {}", path.display());
        Self::with_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, StoreError> {
        connection.execute_batch(SCHEMA)?;

        Ok(Self {
            connection: Mutex::new(connection)
        })
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        //NOTE: A poisoned lock only means another thread panicked mid statement, SQLite itself keeps the data consistent
        self.connection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn query(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Expense>, StoreError> {
        let connection = self.connection();
        let mut statement = connection.prepare(sql)?;
        let rows = statement.query_map(params, read_row)?;

        let mut expenses = Vec::new();

        for row in rows {
            expenses.push(row??);
        }

        Ok(expenses)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Expense, StoreError>> {
    let id: ExpenseId = row.get(0)?;
    let amount: String = row.get(4)?;

    let Ok(amount) = Decimal::from_str(&amount) else {
        return Ok(Err(StoreError::CorruptAmount { expense_id: id, value: amount }))
    };

    Ok(Ok(Expense {
        id,
        owner: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        amount,
        date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        deleted_at: row.get(8)?,
        version: row.get(9)?
    }))
}

impl Storage for SqliteStorage {
    fn list(&self, owner: UserId) -> Result<Vec<Expense>, StoreError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND deleted_at IS NULL ORDER BY date DESC, id DESC"),
            params![owner]
        )
    }

    fn get(&self, owner: UserId, expense_id: ExpenseId) -> Result<Expense, StoreError> {
        let connection = self.connection();

        connection.query_row(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND id = ?2 AND deleted_at IS NULL"),
            params![owner, expense_id],
            read_row
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found(owner, expense_id))?
    }

    fn create(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        let connection = self.connection();
        let now = Utc::now();

        connection.execute(
            "INSERT INTO expenses (user_id, description, category, amount, date, created_at, updated_at, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, 1)",
            params![expense.owner, expense.description, expense.category, expense.amount.to_string(), expense.date, now],
        )?;

        Ok(connection.last_insert_rowid())
    }

    fn update(&self, expense: &Expense) -> Result<(), StoreError> {
        let connection = self.connection();

        let updated = connection.execute(
            "UPDATE expenses
             SET description = ?1, category = ?2, amount = ?3, date = ?4, updated_at = ?5, version = version + 1
             WHERE id = ?6 AND user_id = ?7 AND deleted_at IS NULL AND version = ?8",
            params![
                expense.description,
                expense.category,
                expense.amount.to_string(),
                expense.date,
                Utc::now(),
                expense.id,
                expense.owner,
                expense.version
            ],
        )?;

        if updated == 1 {
            return Ok(())
        }

        let exists: Option<i64> = connection.query_row(
            "SELECT version FROM expenses WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![expense.id, expense.owner],
            |row| row.get(0)
        )
        .optional()?;

        match exists {
            Some(_) => Err(StoreError::conflict(expense)),
            None => Err(StoreError::not_found(expense.owner, expense.id))
        }
    }

    fn delete(&self, owner: UserId, expense_id: ExpenseId) -> Result<(), StoreError> {
        let connection = self.connection();

        let deleted = connection.execute(
            "UPDATE expenses SET deleted_at = ?1 WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL",
            params![Utc::now(), expense_id, owner],
        )?;

        if deleted == 0 {
            return Err(StoreError::not_found(owner, expense_id))
        }

        Ok(())
    }

    fn list_in_range(&self, owner: UserId, since: NaiveDate) -> Result<Vec<Expense>, StoreError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND deleted_at IS NULL AND date >= ?2 ORDER BY date DESC, id DESC"),
            params![owner, since]
        )
    }
}
