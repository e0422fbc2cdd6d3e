use std::cmp;

use crate::types::Decimal;

pub struct IrpefBracket {
    /// Upper bound of the bracket, inclusive. `None` for the last bracket
    /// which absorbs any remainder.
    upper: Option<Decimal>,
    rate: Decimal,
}

/// Progressive IRPEF schedule: an ordered list of marginal brackets.
///
/// The schedule is immutable after construction - there is one bracket table
/// per tax year and it never changes at runtime.
pub struct IrpefSchedule {
    brackets: Vec<IrpefBracket>,
}

impl IrpefSchedule {
    pub fn new(brackets: &[(Option<Decimal>, Decimal)]) -> IrpefSchedule {
        let mut lower = dec!(0);

        for (index, &(upper, _)) in brackets.iter().enumerate() {
            match upper {
                Some(upper) => {
                    assert!(upper > lower, "Invalid IRPEF bracket order");
                    lower = upper;
                },
                // Only the last bracket may be unbounded
                None => assert_eq!(index, brackets.len() - 1),
            }
        }

        IrpefSchedule {
            brackets: brackets.iter().map(|&(upper, rate)| IrpefBracket {upper, rate}).collect(),
        }
    }

    /// Computes the progressive tax on the specified income.
    ///
    /// Income exactly at a bracket boundary is taxed at the lower bracket's
    /// rate; only the amount strictly above it hits the next marginal rate.
    /// Non-positive income yields zero tax.
    pub fn tax(&self, income: Decimal) -> Decimal {
        let mut tax = dec!(0);
        let mut lower = dec!(0);
        let mut remaining = income;

        for bracket in &self.brackets {
            if remaining <= dec!(0) {
                break;
            }

            let taxable = match bracket.upper {
                Some(upper) => cmp::min(upper - lower, remaining),
                None => remaining,
            };

            tax += taxable * bracket.rate;
            remaining -= taxable;

            if let Some(upper) = bracket.upper {
                lower = upper;
            }
        }

        tax
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use crate::taxes::TaxRegime;
    use super::*;

    #[rstest]
    #[case("-10000", "0")]
    #[case("0", "0")]
    #[case("10000", "2300")]
    #[case("15000", "3450")]
    #[case("15001", "3450.25")]
    #[case("20000", "4700")]
    #[case("28000", "6700")]
    #[case("30000", "7400")]
    #[case("50000", "14400")]
    #[case("60000", "18700")]
    #[case("47852.46", "13648.361")]
    fn progressive_tax(#[case] income: &str, #[case] expected: &str) {
        let schedule = TaxRegime::italy_2025().irpef;
        let tax = schedule.tax(income.parse().unwrap());
        assert_eq!(tax, expected.parse::<Decimal>().unwrap());
    }

    #[test]
    fn monotonicity_and_continuity() {
        let schedule = TaxRegime::italy_2025().irpef;

        let mut previous = dec!(0);
        for income in 0..700 {
            let income = Decimal::from(income) * dec!(100);
            let tax = schedule.tax(income);
            assert!(tax >= previous, "IRPEF is not monotonic at {}", income);

            // Marginal rates never exceed 43%, so the tax increase on a 100
            // increment is bounded by 43
            assert!(tax - previous <= dec!(43));
            previous = tax;
        }
    }
}
