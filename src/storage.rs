//! Persistence shell around the tax engine: company profiles and calculation
//! history. Each saved calculation is an immutable snapshot of the partner
//! list in effect at calculation time.

use diesel::prelude::*;
use num_traits::ToPrimitive;

use crate::calculation::{CalculationInput, CalculationSummary};
use crate::company::Partner;
use crate::core::{EmptyResult, GenericError, GenericResult};
use crate::db::{self, models, schema::{calculation_results, calculations, companies, partners}};
use crate::types::Decimal;

pub struct Storage {
    db: db::Connection,
}

pub struct StoredResult {
    pub partner_name: String,
    pub share: Decimal,
    pub irpef: Decimal,
    pub inps: Decimal,
    pub net_income: Decimal,
}

pub struct StoredCalculation {
    pub calculation: models::CalculationRow,
    pub company: models::Company,
    pub results: Vec<StoredResult>,
}

impl Storage {
    pub fn open(url: &str) -> GenericResult<Storage> {
        Ok(Storage {
            db: db::connect(url)?,
        })
    }

    /// Saves a company profile. An existing company with the same name is
    /// updated: its partner list is replaced in the same transaction, which
    /// cascades away the stored results tied to the old partners.
    pub fn save_company(&mut self, name: &str, company_partners: &[Partner]) -> GenericResult<i32> {
        self.db.transaction::<i32, GenericError, _>(|db| {
            let existing: Option<models::Company> = companies::table
                .filter(companies::name.eq(name))
                .first(db).optional()?;

            let company_id = match existing {
                Some(company) => {
                    diesel::delete(partners::table.filter(partners::company_id.eq(company.id)))
                        .execute(db)?;
                    company.id
                },
                None => {
                    diesel::insert_into(companies::table)
                        .values(models::NewCompany {name})
                        .returning(companies::id)
                        .get_result(db)?
                },
            };

            for partner in company_partners {
                let role: &'static str = partner.role.into();

                diesel::insert_into(partners::table).values(models::NewPartner {
                    company_id,
                    name: &partner.name,
                    percentage: decimal_to_db(partner.percentage),
                    role,
                }).execute(db)?;
            }

            Ok(company_id)
        })
    }

    pub fn list_companies(&mut self) -> GenericResult<Vec<models::Company>> {
        Ok(companies::table.order(companies::name.asc()).load(&mut self.db)?)
    }

    /// Returns the company profile with the database ID of each partner.
    pub fn get_company(&mut self, name: &str) -> GenericResult<(models::Company, Vec<(i32, Partner)>)> {
        let company: models::Company = companies::table
            .filter(companies::name.eq(name))
            .first(&mut self.db).optional()?
            .ok_or_else(|| format!("The {:?} company doesn't exist", name))?;

        let rows: Vec<models::PartnerRow> = partners::table
            .filter(partners::company_id.eq(company.id))
            .order(partners::id.asc())
            .load(&mut self.db)?;

        let mut company_partners = Vec::with_capacity(rows.len());
        for row in rows {
            let role = row.role.parse().map_err(|_| format!(
                "The database contains an invalid partner role: {:?}", row.role))?;

            company_partners.push((row.id, Partner {
                name: row.name,
                percentage: decimal_from_db(row.percentage)?,
                role,
            }));
        }

        Ok((company, company_partners))
    }

    pub fn delete_company(&mut self, name: &str) -> EmptyResult {
        let deleted = diesel::delete(companies::table.filter(companies::name.eq(name)))
            .execute(&mut self.db)?;

        if deleted == 0 {
            return Err!("The {:?} company doesn't exist", name);
        }

        Ok(())
    }

    /// Saves a calculation with its per-partner results as a snapshot tied to
    /// the company's current partner rows.
    pub fn save_calculation(
        &mut self, name: &str, company_name: &str,
        input: &CalculationInput, summary: &CalculationSummary,
    ) -> GenericResult<i32> {
        let (company, company_partners) = self.get_company(company_name)?;

        self.db.transaction::<i32, GenericError, _>(|db| {
            let calculation_id = diesel::insert_into(calculations::table)
                .values(models::NewCalculation {
                    name,
                    company_id: company.id,
                    gross_sales: decimal_to_db(input.gross_sales),
                    input_vat: decimal_to_db(input.input_vat),
                    vat_rate: decimal_to_db(input.vat_rate),
                    expenses: decimal_to_db(input.expenses),
                })
                .returning(calculations::id)
                .get_result(db)?;

            for result in &summary.partners {
                let partner_id = company_partners.iter()
                    .find(|(_, partner)| partner.name == result.partner.name)
                    .map(|&(id, _)| id)
                    .ok_or_else(|| format!(
                        "The calculation refers to an unknown partner: {:?}",
                        result.partner.name))?;

                diesel::insert_into(calculation_results::table)
                    .values(models::NewCalculationResult {
                        calculation_id,
                        partner_id,
                        share: decimal_to_db(result.share),
                        irpef: decimal_to_db(result.irpef),
                        inps: decimal_to_db(result.inps),
                        net_income: decimal_to_db(result.net_income),
                    }).execute(db)?;
            }

            Ok(calculation_id)
        })
    }

    /// Lists the calculation history (most recent first) with company names.
    pub fn list_calculations(&mut self) -> GenericResult<Vec<(models::CalculationRow, models::Company)>> {
        Ok(calculations::table
            .inner_join(companies::table)
            .order(calculations::created_at.desc())
            .load(&mut self.db)?)
    }

    pub fn load_calculation(&mut self, calculation_id: i32) -> GenericResult<StoredCalculation> {
        let (calculation, company): (models::CalculationRow, models::Company) = calculations::table
            .inner_join(companies::table)
            .filter(calculations::id.eq(calculation_id))
            .first(&mut self.db).optional()?
            .ok_or_else(|| format!("Calculation #{} doesn't exist", calculation_id))?;

        let rows: Vec<(models::CalculationResultRow, models::PartnerRow)> = calculation_results::table
            .inner_join(partners::table)
            .filter(calculation_results::calculation_id.eq(calculation_id))
            .order(calculation_results::id.asc())
            .load(&mut self.db)?;

        let mut results = Vec::with_capacity(rows.len());
        for (result, partner) in rows {
            results.push(StoredResult {
                partner_name: partner.name,
                share: decimal_from_db(result.share)?,
                irpef: decimal_from_db(result.irpef)?,
                inps: decimal_from_db(result.inps)?,
                net_income: decimal_from_db(result.net_income)?,
            });
        }

        Ok(StoredCalculation {calculation, company, results})
    }

    pub fn delete_calculation(&mut self, calculation_id: i32) -> EmptyResult {
        let deleted = diesel::delete(
            calculations::table.filter(calculations::id.eq(calculation_id)),
        ).execute(&mut self.db)?;

        if deleted == 0 {
            return Err!("Calculation #{} doesn't exist", calculation_id);
        }

        Ok(())
    }
}

// SQLite REAL columns give us f64 at the storage boundary. The engine
// operates on Decimal only.
fn decimal_to_db(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn decimal_from_db(value: f64) -> GenericResult<Decimal> {
    Ok(Decimal::try_from(value).map_err(|e| format!(
        "The database contains an invalid decimal value: {}", e))?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::calculation;
    use crate::company::PartnerRole;
    use crate::taxes::TaxRegime;
    use crate::util::round_to;

    use super::*;

    fn open_temp_storage(database: &tempfile::TempDir) -> Storage {
        let path = database.path().join("db.sqlite");
        Storage::open(path.to_str().unwrap()).unwrap()
    }

    fn sample_partners() -> Vec<Partner> {
        vec![
            Partner::new("Mario", dec!(70), PartnerRole::General),
            Partner::new("Luigi", dec!(30), PartnerRole::Limited),
        ]
    }

    #[test]
    fn company_round_trip() {
        let database = tempfile::tempdir().unwrap();
        let mut storage = open_temp_storage(&database);

        storage.save_company("Rossi S.a.s.", &sample_partners()).unwrap();

        let (company, partners) = storage.get_company("Rossi S.a.s.").unwrap();
        assert_eq!(company.name, "Rossi S.a.s.");
        assert_eq!(
            partners.iter().map(|(_, partner)| partner.clone()).collect::<Vec<_>>(),
            sample_partners());

        assert!(storage.get_company("Bianchi S.a.s.").is_err());
    }

    #[test]
    fn company_upsert_replaces_partners() {
        let database = tempfile::tempdir().unwrap();
        let mut storage = open_temp_storage(&database);

        let first_id = storage.save_company("Rossi S.a.s.", &sample_partners()).unwrap();

        let new_partners = vec![Partner::new("Anna", dec!(100), PartnerRole::General)];
        let second_id = storage.save_company("Rossi S.a.s.", &new_partners).unwrap();
        assert_eq!(first_id, second_id);

        let (_, partners) = storage.get_company("Rossi S.a.s.").unwrap();
        assert_eq!(
            partners.iter().map(|(_, partner)| partner.clone()).collect::<Vec<_>>(),
            new_partners);

        assert_eq!(storage.list_companies().unwrap().len(), 1);
    }

    #[test]
    fn calculation_history() {
        let database = tempfile::tempdir().unwrap();
        let mut storage = open_temp_storage(&database);

        storage.save_company("Rossi S.a.s.", &sample_partners()).unwrap();

        let input = CalculationInput {
            gross_sales: dec!(120_000),
            input_vat: dec!(5_000),
            vat_rate: dec!(0.22),
            expenses: dec!(30_000),
            partners: sample_partners(),
        };
        let summary = calculation::calculate(&TaxRegime::italy_2025(), &input).unwrap();

        let calculation_id = storage.save_calculation(
            "Q1 2025", "Rossi S.a.s.", &input, &summary).unwrap();

        let history = storage.list_calculations().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].0.name, "Q1 2025");
        assert_eq!(history[0].1.name, "Rossi S.a.s.");

        let stored = storage.load_calculation(calculation_id).unwrap();
        assert_eq!(stored.calculation.gross_sales, 120_000.0);
        assert_eq!(stored.results.len(), 2);
        assert_eq!(stored.results[0].partner_name, "Mario");
        assert_eq!(
            round_to(stored.results[0].share, 2),
            round_to(summary.partners[0].share, 2));
        assert_eq!(
            round_to(stored.results[1].net_income, 2),
            round_to(summary.partners[1].net_income, 2));

        storage.delete_calculation(calculation_id).unwrap();
        assert!(storage.load_calculation(calculation_id).is_err());
        assert!(storage.delete_calculation(calculation_id).is_err());
    }

    #[test]
    fn company_deletion_cascades() {
        let database = tempfile::tempdir().unwrap();
        let mut storage = open_temp_storage(&database);

        storage.save_company("Rossi S.a.s.", &sample_partners()).unwrap();

        let input = CalculationInput {
            gross_sales: dec!(12_200),
            input_vat: dec!(0),
            vat_rate: dec!(0.22),
            expenses: dec!(1_000),
            partners: sample_partners(),
        };
        let summary = calculation::calculate(&TaxRegime::italy_2025(), &input).unwrap();
        storage.save_calculation("Q1 2025", "Rossi S.a.s.", &input, &summary).unwrap();

        storage.delete_company("Rossi S.a.s.").unwrap();
        assert!(storage.delete_company("Rossi S.a.s.").is_err());
        assert!(storage.list_calculations().unwrap().is_empty());
    }

    // The engine never requires quotas to sum up to 100% - make sure the
    // storage doesn't either
    #[test]
    fn unnormalized_quotas_are_preserved() {
        let database = tempfile::tempdir().unwrap();
        let mut storage = open_temp_storage(&database);

        let partners = vec![
            Partner::new("Mario", dec!(60), PartnerRole::General),
            Partner::new("Luigi", dec!(20), PartnerRole::Limited),
        ];
        storage.save_company("Rossi S.a.s.", &partners).unwrap();

        let (_, stored) = storage.get_company("Rossi S.a.s.").unwrap();
        assert_eq!(stored[0].1.percentage, dec!(60));
        assert_eq!(stored[1].1.percentage, dec!(20));
    }
}
