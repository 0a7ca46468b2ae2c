mod errors;

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Expense;
use crate::storage::Storage;
use crate::types::{format_currency, UserId};

pub use errors::RecapError;

pub const WEEKLY_WINDOW_DAYS: u64 = 7;
pub const MONTHLY_WINDOW_DAYS: u64 = 30;

pub const NO_WEEKLY_EXPENSES: &str = "Tidak ada pengeluaran dalam 7 hari terakhir.";
pub const NO_MONTHLY_EXPENSES: &str = "Tidak ada pengeluaran dalam 30 hari terakhir.";

/// Builds the 7 day per-category recap for `owner`.
pub fn weekly_recap(storage: &dyn Storage, owner: UserId, today: NaiveDate) -> Result<String, RecapError> {
    let expenses = storage.list_in_range(owner, window_start(today, WEEKLY_WINDOW_DAYS))?;
    render_weekly(&expenses)
}

/// Builds the 30 day per-month recap for `owner`.
pub fn monthly_recap(storage: &dyn Storage, owner: UserId, today: NaiveDate) -> Result<String, RecapError> {
    let expenses = storage.list_in_range(owner, window_start(today, MONTHLY_WINDOW_DAYS))?;
    render_monthly(&expenses)
}

/// First day of a window of `days` calendar days ending with `today`.
pub fn window_start(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days.saturating_sub(1))).unwrap_or(NaiveDate::MIN)
}

fn add(total: Decimal, amount: Decimal) -> Result<Decimal, RecapError> {
    total.checked_add(amount).ok_or(RecapError::Overflow)
}

pub fn render_weekly(expenses: &[Expense]) -> Result<String, RecapError> {
    if expenses.is_empty() {
        return Ok(NO_WEEKLY_EXPENSES.to_string())
    }

    let mut category_totals = BTreeMap::<&str, Decimal>::new();
    let mut total = Decimal::ZERO;

    for expense in expenses {
        let category_total = category_totals.entry(expense.category.as_str()).or_default();
        *category_total = add(*category_total, expense.amount)?;
        total = add(total, expense.amount)?;
    }

    let mut output = String::from("🧾 Rekap Mingguan:\n");

    for (category, amount) in category_totals {
        let _ = writeln!(output, "- {}: Rp{}", category, format_currency(amount));
    }

    let _ = write!(output, "Total: Rp{}", format_currency(total));

    Ok(output)
}

/// Groups expenses by calendar month, newest month first.
///
/// Expenses keep their incoming order inside a month, so a date descending
/// input lists the most recent spending first.
pub fn render_monthly(expenses: &[Expense]) -> Result<String, RecapError> {
    if expenses.is_empty() {
        return Ok(NO_MONTHLY_EXPENSES.to_string())
    }

    let mut months = BTreeMap::<(i32, u32), Vec<&Expense>>::new();

    for expense in expenses {
        months.entry((expense.date.year(), expense.date.month())).or_default().push(expense);
    }

    let mut output = String::from("🧾 Rekap Pengeluaran 30 Hari:\n\n");
    let mut grand_total = Decimal::ZERO;

    for month_expenses in months.values().rev() {
        let subtotal = month_expenses.iter().try_fold(Decimal::ZERO, |subtotal, expense| add(subtotal, expense.amount))?;
        grand_total = add(grand_total, subtotal)?;

        let label = month_expenses[0].date.format("%B %Y");
        let _ = writeln!(output, "{} (Total: Rp{})", label, format_currency(subtotal));

        for expense in month_expenses {
            let _ = writeln!(
                output,
                "• {}: Rp{} ({})",
                expense.date.format("%-d %b"),
                format_currency(expense.amount),
                expense.description
            );
        }

        output.push('\n');
    }

    let _ = write!(output, "Total 30 Hari Terakhir: Rp{}", format_currency(grand_total));

    Ok(output)
}
