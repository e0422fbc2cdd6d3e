mod inps;
mod irpef;

use lazy_static::lazy_static;

pub use self::inps::InpsSchedule;
pub use self::irpef::IrpefSchedule;

/// Tax schedules in effect for a given year. Built once and never mutated:
/// the engine only reads it.
pub struct TaxRegime {
    pub irpef: IrpefSchedule,
    pub inps: InpsSchedule,
}

impl TaxRegime {
    /// IRPEF brackets and INPS parameters for tax year 2025.
    pub fn italy_2025() -> TaxRegime {
        TaxRegime {
            irpef: IrpefSchedule::new(&[
                (Some(dec!(15_000)), dec!(0.23)),
                (Some(dec!(28_000)), dec!(0.25)),
                (Some(dec!(50_000)), dec!(0.35)),
                (None,               dec!(0.43)),
            ]),
            inps: InpsSchedule::new(dec!(4_300), dec!(18_415), dec!(0.24)),
        }
    }
}

lazy_static! {
    pub static ref ITALY_2025: TaxRegime = TaxRegime::italy_2025();
}
