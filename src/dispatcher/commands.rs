use rust_decimal::Decimal;
use thiserror::Error;

use crate::classifier::{Classification, Intent};
use crate::types::{parse_amount, ExpenseId};

/// The user facing text of every variant is sent back verbatim.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CommandError {
    #[error("Perintah tidak dikenali. Gunakan /bantuan untuk melihat bantuan.")]
    UnknownCommand(String),
    #[error("Silakan berikan ID pengeluaran yang ingin dihapus.\nContoh: /hapus 5")]
    MissingDeleteId,
    #[error("ID pengeluaran harus berupa angka.\nContoh: /hapus 5")]
    InvalidDeleteId(String),
    #[error("Format salah. Gunakan: /update ID deskripsi jumlah kategori\nContoh: /update 5 buku 50000 Pendidikan")]
    UpdateFormat,
    #[error("ID pengeluaran harus berupa angka.\nContoh: /update 5 buku 50000 Pendidikan")]
    InvalidUpdateId(String),
    #[error("Jumlah harus berupa angka lebih dari 0.\nContoh: /update 5 buku 50000 Pendidikan")]
    InvalidAmount(String)
}

/// Replacement values for an existing expense; its date is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Decimal,
    pub category: String
}

/// Everything the bot can do besides recording a new expense.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    Help,
    List,
    MonthlyRecap,
    WeeklyRecap,
    Delete(ExpenseId),
    Update(ExpenseUpdate)
}

impl Action {
    /// Parses an explicit command, given without its leading `/`.
    ///
    /// `/hapus@my_bot 5` and `/hapus 5` are the same command.
    pub fn parse_command(command: &str) -> Result<Self, CommandError> {
        let mut tokens = command.split_whitespace();
        let name = tokens.next()
            .and_then(|token| token.split('@').next())
            .unwrap_or_default()
            .to_lowercase();
        let args: Vec<&str> = tokens.collect();

        match name.as_str() {
            "start" => Ok(Action::Start),
            "help" | "bantuan" => Ok(Action::Help),
            "list" | "lihat" => Ok(Action::List),
            "monthly-recap" | "monthly" | "bulan" => Ok(Action::MonthlyRecap),
            "weekly-recap" | "weekly" | "minggu" => Ok(Action::WeeklyRecap),
            "delete" | "hapus" => Self::parse_delete(args.first().copied()),
            "update" => Self::parse_update(&args),
            _ => Err(CommandError::UnknownCommand(name))
        }
    }

    /// Maps a free-text classification onto an action. `Intent::None` is not an action.
    pub fn from_classification(classification: Classification) -> Result<Self, CommandError> {
        match classification.intent {
            Intent::List => Ok(Action::List),
            Intent::Monthly => Ok(Action::MonthlyRecap),
            Intent::Weekly => Ok(Action::WeeklyRecap),
            Intent::Help => Ok(Action::Help),
            Intent::Delete => Self::parse_delete(classification.args.first().map(String::as_str)),
            Intent::None => Err(CommandError::UnknownCommand(String::new()))
        }
    }

    fn parse_delete(argument: Option<&str>) -> Result<Self, CommandError> {
        let argument = argument.ok_or(CommandError::MissingDeleteId)?;

        parse_id(argument)
            .map(Action::Delete)
            .ok_or_else(|| CommandError::InvalidDeleteId(argument.to_string()))
    }

    fn parse_update(args: &[&str]) -> Result<Self, CommandError> {
        let [id, description, amount, category @ ..] = args else {
            return Err(CommandError::UpdateFormat)
        };

        if category.is_empty() {
            return Err(CommandError::UpdateFormat)
        }

        let id = parse_id(id).ok_or_else(|| CommandError::InvalidUpdateId(id.to_string()))?;
        let amount = parse_amount(amount).map_err(|_| CommandError::InvalidAmount(amount.to_string()))?;

        Ok(Action::Update(ExpenseUpdate {
            id,
            description: description.to_string(),
            amount,
            category: category.join(" ")
        }))
    }
}

fn parse_id(value: &str) -> Option<ExpenseId> {
    value.parse::<ExpenseId>().ok().filter(|id| *id > 0)
}
