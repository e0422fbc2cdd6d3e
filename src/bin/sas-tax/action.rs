use std::path::PathBuf;

use sas_tax::company::Partner;
use sas_tax::types::Decimal;

#[derive(Debug)]
pub enum Action {
    Calculate {
        company: Option<String>,
        partners: Vec<Partner>,
        gross_sales: Decimal,
        input_vat: Decimal,
        vat_rate: Decimal,
        expenses: Decimal,
        normalize: bool,
        save: Option<String>,
    },

    AddCompany {
        name: String,
        partners: Vec<Partner>,
        normalize: bool,
    },
    ListCompanies,
    ShowCompany {name: String},
    RemoveCompany {name: String},

    ListCalculations,
    ShowCalculation {id: i32},
    RemoveCalculation {id: i32},

    ShellCompletion {
        path: PathBuf,
        data: Vec<u8>,
    },
}
