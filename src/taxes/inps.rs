use crate::company::PartnerRole;
use crate::types::Decimal;

/// INPS (Gestione commercianti) contribution schedule for partnership income:
/// a fixed minimum annual contribution plus a marginal rate on the income
/// above the contribution threshold.
pub struct InpsSchedule {
    minimum: Decimal,
    threshold: Decimal,
    rate: Decimal,
}

impl InpsSchedule {
    pub fn new(minimum: Decimal, threshold: Decimal, rate: Decimal) -> InpsSchedule {
        InpsSchedule {minimum, threshold, rate}
    }

    /// Computes the contribution owed on the specified profit share.
    ///
    /// Only general partners are subject to INPS on partnership income.
    /// No minimum is charged on a loss or zero share: with non-positive
    /// income the contribution is zero.
    pub fn contribution(&self, role: PartnerRole, income: Decimal) -> Decimal {
        match role {
            PartnerRole::Limited => dec!(0),
            PartnerRole::General => {
                if income <= dec!(0) {
                    return dec!(0);
                }

                let mut contribution = self.minimum;
                if income > self.threshold {
                    contribution += (income - self.threshold) * self.rate;
                }
                contribution
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use crate::taxes::TaxRegime;
    use super::*;

    #[rstest]
    #[case("-5000", "0")]
    #[case("0", "0")]
    #[case("0.01", "4300")]
    #[case("10000", "4300")]
    #[case("18415", "4300")]
    #[case("18416", "4300.24")]
    #[case("20000", "4680.40")]
    #[case("47852.46", "11364.9904")]
    fn general_partner_contribution(#[case] income: &str, #[case] expected: &str) {
        let schedule = TaxRegime::italy_2025().inps;
        let contribution = schedule.contribution(PartnerRole::General, income.parse().unwrap());
        assert_eq!(contribution, expected.parse::<Decimal>().unwrap());
    }

    #[rstest]
    #[case("-5000")]
    #[case("0")]
    #[case("18415")]
    #[case("1000000")]
    fn limited_partners_are_exempt(#[case] income: &str) {
        let schedule = TaxRegime::italy_2025().inps;
        assert_eq!(schedule.contribution(PartnerRole::Limited, income.parse().unwrap()), dec!(0));
    }
}
