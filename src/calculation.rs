//! The tax engine: a pure, stateless pipeline which decomposes VAT-inclusive
//! revenue, allocates the resulting profit across partners and computes IRPEF
//! and INPS obligations per partner.
//!
//! Inputs are validated once at the boundary. Past validation no step can
//! fail: the pipeline performs no I/O and returns a freshly allocated
//! summary, so concurrent invocations need no synchronization.

use crate::company::Partner;
use crate::core::{EmptyResult, GenericResult};
use crate::taxes::TaxRegime;
use crate::types::Decimal;
use crate::util::{self, DecimalRestrictions};

pub struct CalculationInput {
    /// VAT-inclusive revenue
    pub gross_sales: Decimal,
    /// Deductible VAT already paid on purchases
    pub input_vat: Decimal,
    /// Sales VAT rate as a fraction, e.g. 0.22 for 22%
    pub vat_rate: Decimal,
    /// Expenses net of VAT
    pub expenses: Decimal,
    pub partners: Vec<Partner>,
}

impl CalculationInput {
    /// Boundary validation. The quota sum is deliberately not checked here:
    /// each percentage is applied independently and sum-to-100 is the
    /// caller's policy, as is requiring a general partner in the list.
    pub fn validate(&self) -> EmptyResult {
        util::validate_decimal(self.gross_sales, DecimalRestrictions::PositiveOrZero)
            .map_err(|_| format!("Invalid gross sales: {}", self.gross_sales))?;

        util::validate_decimal(self.input_vat, DecimalRestrictions::PositiveOrZero)
            .map_err(|_| format!("Invalid input VAT: {}", self.input_vat))?;

        util::validate_decimal(self.vat_rate, DecimalRestrictions::AboveMinusOne)
            .map_err(|_| format!("Invalid VAT rate: {}", self.vat_rate))?;

        util::validate_decimal(self.expenses, DecimalRestrictions::PositiveOrZero)
            .map_err(|_| format!("Invalid expenses: {}", self.expenses))?;

        if self.partners.is_empty() {
            return Err!("The partner list is empty");
        }

        for partner in &self.partners {
            if partner.percentage < dec!(0) || partner.percentage > dec!(100) {
                return Err!(
                    "Invalid profit share for {:?}: {}%",
                    partner.name, partner.percentage);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VatResult {
    pub net_sales: Decimal,
    pub output_vat: Decimal,
    pub input_vat: Decimal,
    /// May be negative - a credit position, which is preserved as is
    pub vat_due: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerResult {
    pub partner: Partner,
    pub share: Decimal,
    pub irpef: Decimal,
    pub inps: Decimal,
    pub net_income: Decimal,
}

pub struct CalculationSummary {
    pub vat: VatResult,
    /// Profit before taxes and contributions. May be negative (a loss).
    pub net_profit: Decimal,
    pub partners: Vec<PartnerResult>,
    pub total_irpef: Decimal,
    pub total_inps: Decimal,
    /// Profit after all partner-level taxes and contributions
    pub final_profit: Decimal,
    /// (total IRPEF + total INPS) / net profit, in percent. Undefined when
    /// there is no positive profit to relate the taxes to.
    pub effective_tax_rate: Option<Decimal>,
}

pub fn calculate(regime: &TaxRegime, input: &CalculationInput) -> GenericResult<CalculationSummary> {
    input.validate()?;
    Ok(calculate_valid(regime, input))
}

fn calculate_valid(regime: &TaxRegime, input: &CalculationInput) -> CalculationSummary {
    let vat = calculate_vat(input.gross_sales, input.input_vat, input.vat_rate);
    let net_profit = calculate_net_profit(vat.net_sales, input.expenses);

    let mut partners = Vec::with_capacity(input.partners.len());
    let mut total_irpef = dec!(0);
    let mut total_inps = dec!(0);

    for partner in &input.partners {
        let share = net_profit * partner.percentage / dec!(100);

        // A negative share is passed as is: both taxes yield zero on
        // non-positive income
        let irpef = regime.irpef.tax(share);
        let inps = regime.inps.contribution(partner.role, share);

        total_irpef += irpef;
        total_inps += inps;

        partners.push(PartnerResult {
            partner: partner.clone(),
            share, irpef, inps,
            net_income: share - irpef - inps,
        });
    }

    let final_profit = net_profit - total_irpef - total_inps;

    let effective_tax_rate = if net_profit > dec!(0) {
        Some((total_irpef + total_inps) / net_profit * dec!(100))
    } else {
        None
    };

    CalculationSummary {
        vat, net_profit, partners,
        total_irpef, total_inps, final_profit,
        effective_tax_rate,
    }
}

pub fn calculate_vat(gross_sales: Decimal, input_vat: Decimal, vat_rate: Decimal) -> VatResult {
    let net_sales = gross_sales / (dec!(1) + vat_rate);
    let output_vat = gross_sales - net_sales;

    VatResult {
        net_sales, output_vat, input_vat,
        vat_due: output_vat - input_vat,
    }
}

pub fn calculate_net_profit(net_sales: Decimal, expenses: Decimal) -> Decimal {
    net_sales - expenses
}
