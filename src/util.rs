use std::str::FromStr;

use rust_decimal::RoundingStrategy;

use crate::core::GenericResult;
use crate::types::{DateTime, Decimal};

pub enum DecimalRestrictions {
    No,
    PositiveOrZero,
    StrictlyPositive,
    /// VAT rates must keep `1 + rate` strictly positive, otherwise gross to
    /// net decomposition degenerates.
    AboveMinusOne,
}

pub fn parse_decimal(string: &str, restrictions: DecimalRestrictions) -> GenericResult<Decimal> {
    let value = Decimal::from_str(string).map_err(|_| format!(
        "Invalid decimal value: {:?}", string))?;
    validate_decimal(value, restrictions)
}

pub fn validate_decimal(value: Decimal, restrictions: DecimalRestrictions) -> GenericResult<Decimal> {
    if !match restrictions {
        DecimalRestrictions::No => true,
        DecimalRestrictions::PositiveOrZero => !value.is_sign_negative() || value.is_zero(),
        DecimalRestrictions::StrictlyPositive => value.is_sign_positive() && !value.is_zero(),
        DecimalRestrictions::AboveMinusOne => value > dec!(-1),
    } {
        return Err!("The value doesn't comply to the specified restrictions");
    }

    Ok(value)
}

pub fn round_to(value: Decimal, points: u32) -> Decimal {
    value.round_dp_with_strategy(points, RoundingStrategy::MidpointAwayFromZero).normalize()
}

pub fn format_timestamp(time: DateTime) -> String {
    time.format("%d/%m/%Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use super::*;

    #[rstest]
    #[case("12.345", "12.35")]
    #[case("12.344", "12.34")]
    #[case("-12.345", "-12.35")]
    #[case("1700.005", "1700.01")]
    #[case("0", "0")]
    fn rounding(#[case] value: &str, #[case] expected: &str) {
        let value: Decimal = value.parse().unwrap();
        assert_eq!(round_to(value, 2), expected.parse().unwrap());
    }

    #[test]
    fn decimal_restrictions() {
        assert!(parse_decimal("0", DecimalRestrictions::PositiveOrZero).is_ok());
        assert!(parse_decimal("-0.01", DecimalRestrictions::PositiveOrZero).is_err());
        assert!(parse_decimal("0", DecimalRestrictions::StrictlyPositive).is_err());
        assert!(parse_decimal("-0.5", DecimalRestrictions::AboveMinusOne).is_ok());
        assert!(parse_decimal("-1", DecimalRestrictions::AboveMinusOne).is_err());
        assert!(parse_decimal("not-a-number", DecimalRestrictions::No).is_err());
    }
}
