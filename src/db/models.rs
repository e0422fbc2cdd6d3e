use diesel::prelude::*;

use crate::types::DateTime;

use super::schema::{calculation_results, calculations, companies, partners};

#[derive(Queryable, Identifiable, Debug)]
#[diesel(table_name = companies)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime,
}

#[derive(Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompany<'a> {
    pub name: &'a str,
}

#[derive(Queryable, Identifiable, Debug)]
#[diesel(table_name = partners)]
pub struct PartnerRow {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub percentage: f64,
    pub role: String,
}

#[derive(Insertable)]
#[diesel(table_name = partners)]
pub struct NewPartner<'a> {
    pub company_id: i32,
    pub name: &'a str,
    pub percentage: f64,
    pub role: &'a str,
}

#[derive(Queryable, Identifiable, Debug)]
#[diesel(table_name = calculations)]
pub struct CalculationRow {
    pub id: i32,
    pub name: String,
    pub company_id: i32,
    pub gross_sales: f64,
    pub input_vat: f64,
    pub vat_rate: f64,
    pub expenses: f64,
    pub created_at: DateTime,
}

#[derive(Insertable)]
#[diesel(table_name = calculations)]
pub struct NewCalculation<'a> {
    pub name: &'a str,
    pub company_id: i32,
    pub gross_sales: f64,
    pub input_vat: f64,
    pub vat_rate: f64,
    pub expenses: f64,
}

#[derive(Queryable, Identifiable, Debug)]
#[diesel(table_name = calculation_results)]
pub struct CalculationResultRow {
    pub id: i32,
    pub calculation_id: i32,
    pub partner_id: i32,
    pub share: f64,
    pub irpef: f64,
    pub inps: f64,
    pub net_income: f64,
}

#[derive(Insertable)]
#[diesel(table_name = calculation_results)]
pub struct NewCalculationResult {
    pub calculation_id: i32,
    pub partner_id: i32,
    pub share: f64,
    pub irpef: f64,
    pub inps: f64,
    pub net_income: f64,
}
