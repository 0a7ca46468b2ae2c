use super::{format_currency, parse_amount, AmountError, MAX_AMOUNT};
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_format_currency_groups_digits_in_threes() -> Result<()> {
    let test_cases = vec![
        ("0", "0"),
        ("7", "7"),
        ("500", "500"),
        ("1000", "1.000"),
        ("25000", "25.000"),
        ("999999", "999.999"),
        ("1234567", "1.234.567"),
        ("1000000000", "1.000.000.000"),
    ];

    for (input, expected_output) in test_cases {
        assert_eq!(format_currency(Decimal::from_str(input)?), expected_output);
    }

    Ok(())
}

#[test]
fn test_format_currency_truncates_fractions_without_rounding() -> Result<()> {
    assert_eq!(format_currency(Decimal::from_str("1234.99")?), "1.234");
    assert_eq!(format_currency(Decimal::from_str("0.75")?), "0");
    assert_eq!(format_currency(Decimal::from_str("25000.50")?), "25.000");

    Ok(())
}

#[test]
fn test_format_currency_renders_fractional_amounts_as_their_integer_part() -> Result<()> {
    for (input, integer) in [("0.1", "0"), ("12.345", "12"), ("98765.4321", "98765")] {
        assert_eq!(format_currency(Decimal::from_str(input)?), format_currency(Decimal::from_str(integer)?));
    }

    Ok(())
}

#[test]
fn test_parse_amount_accepts_positive_values() -> Result<()> {
    assert_eq!(parse_amount("50000")?, Decimal::from(50000));
    assert_eq!(parse_amount(" 12500.50 ")?, Decimal::from_str("12500.50")?);

    Ok(())
}

#[test]
fn test_parse_amount_rejects_invalid_and_non_positive_values() {
    assert!(matches!(parse_amount("abc"), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(parse_amount("50k"), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(parse_amount(""), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(parse_amount("0"), Err(AmountError::NotPositive)));
    assert!(matches!(parse_amount("-100"), Err(AmountError::NotPositive)));
}

#[test]
fn test_parse_amount_rejects_values_above_the_maximum() -> Result<()> {
    assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000_i64));
    assert_eq!(parse_amount("1000000000000000")?, MAX_AMOUNT);
    assert!(matches!(parse_amount("1000000000000000.01"), Err(AmountError::TooLarge)));
    assert!(matches!(parse_amount("79228162514264337593543950335"), Err(AmountError::TooLarge)));

    Ok(())
}
