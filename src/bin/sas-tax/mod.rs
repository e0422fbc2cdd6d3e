mod action;
mod parser;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use log::{error, warn};
use rust_decimal_macros::dec;

use sas_tax::calculation::{self, CalculationInput};
use sas_tax::company::{self, Partner, PartnerRole};
use sas_tax::config::Config;
use sas_tax::core::{EmptyResult, GenericResult};
use sas_tax::formatting;
use sas_tax::storage::Storage;
use sas_tax::taxes::ITALY_2025;

use self::action::Action;
use self::parser::{GlobalOptions, Parser};

fn main() -> ExitCode {
    let mut parser = Parser::new();

    let global = match parser.parse_global() {
        Ok(global) => global,
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err}.");
            return ExitCode::FAILURE;
        },
    };

    if let Err(err) = easy_logging::init(module_path!(), global.log_level) {
        let _ = writeln!(io::stderr(), "Failed to initialize the logging: {err}.");
        return ExitCode::FAILURE;
    }

    if let Err(err) = run(global, parser) {
        let message = err.to_string();

        if message.contains('\n') {
            error!("{err}");
        } else {
            error!("{err}.");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(global: GlobalOptions, parser: Parser) -> EmptyResult {
    let config = Config::new(&global.config_dir)?;
    let action = parser.parse(&config)?;

    match action {
        Action::Calculate {
            company, partners, gross_sales, input_vat, vat_rate, expenses, normalize, save,
        } => {
            let partners = match company {
                Some(ref name) => {
                    let mut storage = Storage::open(&config.db_path)?;
                    let (_, partners) = storage.get_company(name)?;
                    partners.into_iter().map(|(_, partner)| partner).collect()
                },
                None => check_quotas(partners, normalize)?,
            };

            let input = CalculationInput {gross_sales, input_vat, vat_rate, expenses, partners};
            let summary = calculation::calculate(&ITALY_2025, &input)?;
            formatting::print_calculation(&summary);

            if let (Some(calculation_name), Some(company_name)) = (save, company) {
                let mut storage = Storage::open(&config.db_path)?;
                let id = storage.save_calculation(&calculation_name, &company_name, &input, &summary)?;
                println!();
                println!("Saved to history as calculation #{id}.");
            }
        },

        Action::AddCompany {name, partners, normalize} => {
            let partners = check_quotas(partners, normalize)?;
            company::validate_profile(&partners)?;

            let mut storage = Storage::open(&config.db_path)?;
            storage.save_company(&name, &partners)?;
            println!("The {name:?} company profile has been saved.");
        },

        Action::ListCompanies => {
            let mut storage = Storage::open(&config.db_path)?;
            formatting::print_companies(&storage.list_companies()?);
        },

        Action::ShowCompany {name} => {
            let mut storage = Storage::open(&config.db_path)?;
            let (record, partners) = storage.get_company(&name)?;
            let partners: Vec<Partner> = partners.into_iter().map(|(_, partner)| partner).collect();
            formatting::print_company(&record, &partners);
        },

        Action::RemoveCompany {name} => {
            let mut storage = Storage::open(&config.db_path)?;
            storage.delete_company(&name)?;
            println!("The {name:?} company has been removed with its calculation history.");
        },

        Action::ListCalculations => {
            let mut storage = Storage::open(&config.db_path)?;
            formatting::print_history(&storage.list_calculations()?);
        },

        Action::ShowCalculation {id} => {
            let mut storage = Storage::open(&config.db_path)?;
            formatting::print_stored_calculation(&storage.load_calculation(id)?);
        },

        Action::RemoveCalculation {id} => {
            let mut storage = Storage::open(&config.db_path)?;
            storage.delete_calculation(id)?;
            println!("Calculation #{id} has been removed.");
        },

        Action::ShellCompletion {path, data} => {
            write_shell_completion(&path, &data).map_err(|e| format!(
                "Failed to write {:?}: {}", path, e))?;
        },
    };

    Ok(())
}

/// Quota consistency is a caller-level policy: the engine applies each
/// percentage as is, so here we either rescale the quotas on request or just
/// warn when their sum is suspicious.
fn check_quotas(mut partners: Vec<Partner>, normalize: bool) -> GenericResult<Vec<Partner>> {
    if normalize {
        company::normalize_quotas(&mut partners)?;
        return Ok(partners);
    }

    let total = company::quota_sum(&partners);
    if !partners.is_empty() && (total < dec!(99) || total > dec!(101)) {
        warn!("The quota sum ({total}%) is not 100%. Pass --normalize to rescale the quotas.");
    }

    if !partners.iter().any(|partner| partner.role == PartnerRole::General) {
        warn!("The partner list has no accomandatario, so no INPS contributions will be calculated.");
    }

    Ok(partners)
}

fn write_shell_completion(path: &Path, data: &[u8]) -> EmptyResult {
    Ok(File::create(path)?.write_all(data)?)
}
