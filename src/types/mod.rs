mod currency;
mod errors;
#[cfg(test)]
mod tests;

pub use currency::{format_currency, parse_amount, MAX_AMOUNT};
pub use errors::AmountError;

pub type UserId = i64;
pub type ChatId = i64;
pub type ExpenseId = i64;
