use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::types::errors::AmountError;

const GROUP_SIZE: usize = 3;
const GROUP_SEPARATOR: char = '.';

/// Rp1.000.000.000.000.000, the largest amount the bot accepts for a single expense.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Renders an amount as whole currency units with `.` between every group of three digits.
///
/// The fractional part is truncated, never rounded: `1234.99` renders as `1.234`.
pub fn format_currency(amount: Decimal) -> String {
    let integer = amount.trunc().to_i128().unwrap_or_default();
    let digits = integer.unsigned_abs().to_string();

    let mut output = String::with_capacity(digits.len() + digits.len() / GROUP_SIZE + 1);

    if integer < 0 {
        output.push('-');
    }

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % GROUP_SIZE == 0 {
            output.push(GROUP_SEPARATOR);
        }
        output.push(digit);
    }

    output
}

/// Parses a user supplied amount such as `50000` or `12500.50`.
pub fn parse_amount(value: &str) -> Result<Decimal, AmountError> {
    let amount = Decimal::from_str(value.trim())?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive)
    }

    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge)
    }

    Ok(amount)
}
