use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::models::{Expense, NewExpense, StoreError};
use crate::storage::Storage;
use crate::types::{ExpenseId, UserId};

/// Non-durable storage kept in process memory.
pub struct MemoryStorage {
    expenses: DashMap<ExpenseId, Expense>,
    next_id: AtomicI64
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            expenses: DashMap::new(),
            next_id: AtomicI64::new(1)
        }
    }

    fn collect<F>(&self, filter: F) -> Vec<Expense>
    where
        F: Fn(&Expense) -> bool,
    {
        let mut expenses: Vec<Expense> = self.expenses.iter()
            .filter(|entry| entry.deleted_at.is_none() && filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        expenses.sort_by(|left, right| right.date.cmp(&left.date).then(right.id.cmp(&left.id)));
        expenses
    }
}

impl Storage for MemoryStorage {
    fn list(&self, owner: UserId) -> Result<Vec<Expense>, StoreError> {
        Ok(self.collect(|expense| expense.owner == owner))
    }

    fn get(&self, owner: UserId, expense_id: ExpenseId) -> Result<Expense, StoreError> {
        self.expenses.get(&expense_id)
            .filter(|expense| expense.owner == owner && expense.deleted_at.is_none())
            .map(|expense| expense.value().clone())
            .ok_or_else(|| StoreError::not_found(owner, expense_id))
    }

    fn create(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();

        self.expenses.insert(id, Expense {
            id,
            owner: expense.owner,
            description: expense.description,
            category: expense.category,
            amount: expense.amount,
            date: expense.date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: 1
        });

        Ok(id)
    }

    fn update(&self, expense: &Expense) -> Result<(), StoreError> {
        let mut stored = self.expenses.get_mut(&expense.id)
            .filter(|stored| stored.owner == expense.owner && stored.deleted_at.is_none())
            .ok_or_else(|| StoreError::not_found(expense.owner, expense.id))?;

        if stored.version != expense.version {
            return Err(StoreError::conflict(expense))
        }

        stored.description = expense.description.clone();
        stored.category = expense.category.clone();
        stored.amount = expense.amount;
        stored.date = expense.date;
        stored.updated_at = Utc::now();
        stored.version += 1;

        Ok(())
    }

    fn delete(&self, owner: UserId, expense_id: ExpenseId) -> Result<(), StoreError> {
        let mut stored = self.expenses.get_mut(&expense_id)
            .filter(|stored| stored.owner == owner && stored.deleted_at.is_none())
            .ok_or_else(|| StoreError::not_found(owner, expense_id))?;

        stored.deleted_at = Some(Utc::now());

        Ok(())
    }

    fn list_in_range(&self, owner: UserId, since: NaiveDate) -> Result<Vec<Expense>, StoreError> {
        Ok(self.collect(|expense| expense.owner == owner && expense.date >= since))
    }
}
