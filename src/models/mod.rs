mod errors;
mod expense;

pub use errors::StoreError;
pub use expense::{CandidateExpense, Expense, NewExpense};
