use std::collections::HashSet;
use std::str::FromStr;

use strum::{Display, EnumString, IntoStaticStr};

use crate::core::{EmptyResult, GenericError, GenericResult};
use crate::types::Decimal;
use crate::util::{self, DecimalRestrictions};

/// S.a.s. partner role. An accomandatario has unlimited liability and owes
/// INPS contributions on his profit share, an accomandante doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum PartnerRole {
    #[strum(serialize = "accomandatario")]
    General,
    #[strum(serialize = "accomandante")]
    Limited,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub name: String,
    /// Profit share in percent (0-100)
    pub percentage: Decimal,
    pub role: PartnerRole,
}

impl Partner {
    pub fn new(name: &str, percentage: Decimal, role: PartnerRole) -> Partner {
        Partner {name: name.to_owned(), percentage, role}
    }
}

impl FromStr for Partner {
    type Err = GenericError;

    /// Parses the `name:quota:role` CLI partner specification.
    fn from_str(spec: &str) -> GenericResult<Partner> {
        let error = || format!(
            "Invalid partner specification: {:?}. Expected name:quota:role \
             where role is accomandatario or accomandante", spec);

        let (name, quota, role) = match spec.split(':').collect::<Vec<_>>().as_slice() {
            [name, quota, role] => (*name, *quota, *role),
            _ => return Err(error().into()),
        };

        if name.is_empty() {
            return Err(error().into());
        }

        let percentage = util::parse_decimal(quota, DecimalRestrictions::PositiveOrZero)
            .map_err(|_| error())?;
        let role = PartnerRole::from_str(role).map_err(|_| error())?;

        Ok(Partner::new(name, percentage, role))
    }
}

/// Validates a partner list as a company profile: a valid S.a.s. must have at
/// least one general partner, unique partner names and sane quotas. The tax
/// engine itself doesn't require a general partner (see `calculation`), so
/// this check belongs to profile management.
pub fn validate_profile(partners: &[Partner]) -> EmptyResult {
    if partners.is_empty() {
        return Err!("The company has no partners");
    }

    let mut names = HashSet::new();
    for partner in partners {
        if !names.insert(partner.name.as_str()) {
            return Err!("Duplicated partner name: {:?}", partner.name);
        }

        if partner.percentage < dec!(0) || partner.percentage > dec!(100) {
            return Err!(
                "Invalid profit share for {:?}: {}%", partner.name, partner.percentage);
        }
    }

    if !partners.iter().any(|partner| partner.role == PartnerRole::General) {
        return Err!("An S.a.s. must have at least one accomandatario");
    }

    Ok(())
}

pub fn quota_sum(partners: &[Partner]) -> Decimal {
    partners.iter().map(|partner| partner.percentage).sum()
}

/// Rescales the quotas so that they sum up to exactly 100%. The engine never
/// does this on its own: quota consistency is the caller's policy.
pub fn normalize_quotas(partners: &mut [Partner]) -> EmptyResult {
    let total = quota_sum(partners);
    if total <= dec!(0) {
        return Err!("Unable to normalize quotas: their sum is {}%", total);
    }

    for partner in partners.iter_mut() {
        partner.percentage = partner.percentage / total * dec!(100);
    }

    Ok(())
}
