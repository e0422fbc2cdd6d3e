use std::path::PathBuf;

use clap::{value_parser, ArgAction, ArgGroup, ArgMatches, Command};
use clap_complete::Shell;

use sas_tax::cli;
use sas_tax::company::Partner;
use sas_tax::config::Config;
use sas_tax::core::GenericResult;
use sas_tax::types::Decimal;
use sas_tax::util::{self, DecimalRestrictions};

use super::action::Action;

const DEFAULT_CONFIG_DIR_PATH: &str = "~/.sas-tax";

pub struct Parser {
    matches: Option<ArgMatches>,
}

pub struct GlobalOptions {
    pub log_level: log::Level,
    pub config_dir: String,
}

impl Parser {
    pub fn new() -> Parser {
        Parser {matches: None}
    }

    pub fn parse_global(&mut self) -> GenericResult<GlobalOptions> {
        let matches = new_command().get_matches();

        let log_level = match matches.get_count("verbose") {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            2 => log::Level::Trace,
            _ => return Err("Invalid verbosity level".into()),
        };

        let config_dir = matches.get_one::<String>("config").cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_DIR_PATH.to_owned());

        self.matches.replace(matches);

        Ok(GlobalOptions {log_level, config_dir})
    }

    pub fn parse(mut self, config: &Config) -> GenericResult<Action> {
        let matches = self.matches.take().unwrap();
        let (command, matches) = matches.subcommand().unwrap();

        Ok(match command {
            "calculate" => parse_calculate(matches, config)?,

            "company" => {
                let (command, matches) = matches.subcommand().unwrap();
                match command {
                    "add" => {
                        let name = get_name(matches, "NAME");
                        let partners = parse_partners(matches)?;
                        let normalize = matches.get_flag("normalize");
                        Action::AddCompany {name, partners, normalize}
                    },
                    "list" => Action::ListCompanies,
                    "show" => Action::ShowCompany {name: get_name(matches, "NAME")},
                    "remove" => Action::RemoveCompany {name: get_name(matches, "NAME")},
                    _ => unreachable!(),
                }
            },

            "history" => {
                let (command, matches) = matches.subcommand().unwrap();
                match command {
                    "list" => Action::ListCalculations,
                    "show" => Action::ShowCalculation {id: parse_id(matches)?},
                    "remove" => Action::RemoveCalculation {id: parse_id(matches)?},
                    _ => unreachable!(),
                }
            },

            "completion" => {
                let shell = *matches.get_one::<Shell>("shell").unwrap();
                let mut data = Vec::new();
                clap_complete::generate(shell, &mut new_command(), "sas-tax", &mut data);

                Action::ShellCompletion {
                    path: PathBuf::from(get_name(matches, "PATH")),
                    data,
                }
            },

            _ => unreachable!(),
        })
    }
}

fn new_command() -> Command {
    cli::new_app("sas-tax", "Calculates Italian S.a.s. taxation: VAT, IRPEF and INPS")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args([
            cli::new_arg("config", "Configuration directory path [default: ~/.sas-tax]")
                .short('c').long("config")
                .value_name("PATH"),

            cli::new_arg("verbose", "Set verbosity level")
                .short('v').long("verbose")
                .action(ArgAction::Count),
        ])

        .subcommand(cli::new_subcommand(
            "calculate", "Calculate taxes for the specified financial year")
            .long_about("\
                Decomposes VAT-inclusive revenue into net sales and VAT due, allocates the \
                resulting profit across partners according to their quotas and calculates IRPEF \
                and INPS obligations per partner.")
            .args([
                cli::new_arg("company", "Saved company profile to take the partner list from")
                    .short('C').long("company")
                    .value_name("NAME"),

                cli::new_arg("partner", "Ad-hoc partner in name:quota:role format (may be repeated)")
                    .short('p').long("partner")
                    .value_name("PARTNER")
                    .action(ArgAction::Append),

                cli::new_arg("gross_sales", "Gross sales, VAT inclusive")
                    .long("gross-sales")
                    .value_name("AMOUNT")
                    .required(true),

                cli::new_arg("input_vat", "Deductible VAT paid on purchases")
                    .long("input-vat")
                    .value_name("AMOUNT")
                    .required(true),

                cli::new_arg("vat_rate", "Sales VAT rate as a fraction, e.g. 0.22 [default: from config]")
                    .long("vat-rate")
                    .value_name("RATE"),

                cli::new_arg("expenses", "Total expenses, net of VAT")
                    .long("expenses")
                    .value_name("AMOUNT")
                    .required(true),

                cli::new_arg("normalize", "Normalize partner quotas to 100%")
                    .short('n').long("normalize")
                    .action(ArgAction::SetTrue),

                cli::new_arg("save", "Save the calculation to history under the specified name (requires --company)")
                    .short('s').long("save")
                    .value_name("NAME"),
            ])
            .group(ArgGroup::new("partner_source")
                .args(["company", "partner"])
                .required(true)))

        .subcommand(cli::new_subcommand(
            "company", "Manage saved company profiles")
            .subcommand_required(true)
            .subcommand(cli::new_subcommand(
                "add", "Add or update a company profile")
                .args([
                    cli::new_arg("NAME", "Company name")
                        .required(true),

                    cli::new_arg("partner", "Partner in name:quota:role format (may be repeated)")
                        .short('p').long("partner")
                        .value_name("PARTNER")
                        .action(ArgAction::Append)
                        .required(true),

                    cli::new_arg("normalize", "Normalize partner quotas to 100%")
                        .short('n').long("normalize")
                        .action(ArgAction::SetTrue),
                ]))
            .subcommand(cli::new_subcommand(
                "list", "List saved companies"))
            .subcommand(cli::new_subcommand(
                "show", "Show company partners")
                .arg(cli::new_arg("NAME", "Company name").required(true)))
            .subcommand(cli::new_subcommand(
                "remove", "Remove a company with its calculation history")
                .arg(cli::new_arg("NAME", "Company name").required(true))))

        .subcommand(cli::new_subcommand(
            "history", "Manage calculation history")
            .subcommand_required(true)
            .subcommand(cli::new_subcommand(
                "list", "List saved calculations"))
            .subcommand(cli::new_subcommand(
                "show", "Show a saved calculation")
                .arg(cli::new_arg("ID", "Calculation ID").required(true)))
            .subcommand(cli::new_subcommand(
                "remove", "Remove a saved calculation")
                .arg(cli::new_arg("ID", "Calculation ID").required(true))))

        .subcommand(cli::new_subcommand(
            "completion", "Generate shell completion rules")
            .args([
                cli::new_arg("shell", "Shell to generate completion rules for")
                    .short('s').long("shell")
                    .value_name("SHELL")
                    .value_parser(value_parser!(Shell))
                    .default_value("bash"),

                cli::new_arg("PATH", "Path to save the rules to")
                    .required(true),
            ]))
}

fn parse_calculate(matches: &ArgMatches, config: &Config) -> GenericResult<Action> {
    let company = matches.get_one::<String>("company").cloned();
    let partners = parse_partners(matches)?;

    let save = matches.get_one::<String>("save").cloned();
    if save.is_some() && company.is_none() {
        return Err("--save requires a saved company profile (--company)".into());
    }

    let vat_rate = match matches.get_one::<String>("vat_rate") {
        Some(rate) => util::parse_decimal(rate, DecimalRestrictions::AboveMinusOne).map_err(|_| format!(
            "Invalid VAT rate: {:?}", rate))?,
        None => config.default_vat_rate,
    };

    Ok(Action::Calculate {
        company, partners,
        gross_sales: parse_amount(matches, "gross_sales", "gross sales")?,
        input_vat: parse_amount(matches, "input_vat", "input VAT")?,
        vat_rate,
        expenses: parse_amount(matches, "expenses", "expenses")?,
        normalize: matches.get_flag("normalize"),
        save,
    })
}

fn parse_partners(matches: &ArgMatches) -> GenericResult<Vec<Partner>> {
    matches.get_many::<String>("partner").unwrap_or_default()
        .map(|spec| spec.parse())
        .collect()
}

fn parse_amount(matches: &ArgMatches, name: &str, title: &str) -> GenericResult<Decimal> {
    let value = matches.get_one::<String>(name).unwrap();
    util::parse_decimal(value, DecimalRestrictions::PositiveOrZero).map_err(|_| format!(
        "Invalid {}: {:?}", title, value).into())
}

fn parse_id(matches: &ArgMatches) -> GenericResult<i32> {
    let id = get_name(matches, "ID");
    id.parse().map_err(|_| format!("Invalid calculation ID: {:?}", id).into())
}

fn get_name(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_structure() {
        new_command().debug_assert();
    }

    #[test]
    fn save_requires_company() {
        let matches = new_command().try_get_matches_from([
            "sas-tax", "calculate",
            "--partner", "Mario:100:accomandatario",
            "--gross-sales", "1000", "--input-vat", "0", "--expenses", "0",
            "--save", "Q1 2025",
        ]).unwrap();

        let (command, matches) = matches.subcommand().unwrap();
        assert_eq!(command, "calculate");

        let err = parse_calculate(matches, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "--save requires a saved company profile (--company)");
    }

    #[test]
    fn partner_sources_are_mutually_exclusive() {
        assert!(new_command().try_get_matches_from([
            "sas-tax", "calculate",
            "--company", "Rossi S.a.s.",
            "--partner", "Mario:100:accomandatario",
            "--gross-sales", "1000", "--input-vat", "0", "--expenses", "0",
        ]).is_err());
    }
}
