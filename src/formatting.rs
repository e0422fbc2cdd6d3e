//! Rendering of calculation results and stored records for terminal output.

use ansi_term::Style;
use num_traits::ToPrimitive;
use prettytable::{Cell, Row, Table};
use prettytable::format::{Alignment, FormatBuilder, LinePosition, LineSeparator};
use separator::Separatable;

use crate::calculation::CalculationSummary;
use crate::company::Partner;
use crate::db::models;
use crate::storage::StoredCalculation;
use crate::types::Decimal;
use crate::util;

pub fn print_calculation(summary: &CalculationSummary) {
    print_title("VAT settlement");

    let mut table = new_table();
    table.add_row(new_cash_row("Net sales", summary.vat.net_sales));
    table.add_row(new_cash_row("Output VAT", summary.vat.output_vat));
    table.add_row(new_cash_row("Input VAT", summary.vat.input_vat));
    table.add_row(new_cash_row(
        if summary.vat.vat_due < dec!(0) {"VAT credit"} else {"VAT due"},
        summary.vat.vat_due));
    table.printstd();

    print_title("Partners");

    let mut table = new_table();
    table.set_titles(Row::new(vec![
        Cell::new("Partner"),
        Cell::new("Role"),
        Cell::new_align("Quota", Alignment::RIGHT),
        Cell::new_align("Profit share", Alignment::RIGHT),
        Cell::new_align("IRPEF", Alignment::RIGHT),
        Cell::new_align("INPS", Alignment::RIGHT),
        Cell::new_align("Net income", Alignment::RIGHT),
    ]));

    for result in &summary.partners {
        table.add_row(Row::new(vec![
            Cell::new(&result.partner.name),
            Cell::new(&result.partner.role.to_string()),
            Cell::new_align(&format!("{}%", result.partner.percentage.normalize()), Alignment::RIGHT),
            new_cash_cell(result.share),
            new_cash_cell(result.irpef),
            new_cash_cell(result.inps),
            new_cash_cell(result.net_income),
        ]));
    }
    table.printstd();

    print_title("Totals");

    let mut table = new_table();
    table.add_row(new_cash_row("Net profit before taxes", summary.net_profit));
    table.add_row(new_cash_row("Total IRPEF", summary.total_irpef));
    table.add_row(new_cash_row("Total INPS", summary.total_inps));
    table.add_row(new_cash_row("Final net profit", summary.final_profit));
    table.add_row(Row::new(vec![
        Cell::new("Effective tax rate"),
        Cell::new_align(&format_tax_rate(summary.effective_tax_rate), Alignment::RIGHT),
    ]));
    table.printstd();
}

pub fn print_companies(companies: &[models::Company]) {
    if companies.is_empty() {
        println!("No saved companies.");
        return;
    }

    let mut table = new_table();
    table.set_titles(Row::new(vec![
        Cell::new("Company"),
        Cell::new("Created"),
    ]));

    for company in companies {
        table.add_row(Row::new(vec![
            Cell::new(&company.name),
            Cell::new(&util::format_timestamp(company.created_at)),
        ]));
    }
    table.printstd();
}

pub fn print_company(company: &models::Company, partners: &[Partner]) {
    print_title(&company.name);

    let mut table = new_table();
    table.set_titles(Row::new(vec![
        Cell::new("Partner"),
        Cell::new("Role"),
        Cell::new_align("Quota", Alignment::RIGHT),
    ]));

    for partner in partners {
        table.add_row(Row::new(vec![
            Cell::new(&partner.name),
            Cell::new(&partner.role.to_string()),
            Cell::new_align(&format!("{}%", partner.percentage.normalize()), Alignment::RIGHT),
        ]));
    }
    table.printstd();
}

pub fn print_history(records: &[(models::CalculationRow, models::Company)]) {
    if records.is_empty() {
        println!("No saved calculations.");
        return;
    }

    let mut table = new_table();
    table.set_titles(Row::new(vec![
        Cell::new_align("#", Alignment::RIGHT),
        Cell::new("Date"),
        Cell::new("Calculation"),
        Cell::new("Company"),
    ]));

    for (calculation, company) in records {
        table.add_row(Row::new(vec![
            Cell::new_align(&calculation.id.to_string(), Alignment::RIGHT),
            Cell::new(&util::format_timestamp(calculation.created_at)),
            Cell::new(&calculation.name),
            Cell::new(&company.name),
        ]));
    }
    table.printstd();
}

pub fn print_stored_calculation(stored: &StoredCalculation) {
    print_title(&format!("{} - {}", stored.calculation.name, stored.company.name));

    let mut table = new_table();
    table.add_row(new_float_cash_row("Gross sales (VAT inclusive)", stored.calculation.gross_sales));
    table.add_row(new_float_cash_row("Input VAT", stored.calculation.input_vat));
    table.add_row(Row::new(vec![
        Cell::new("VAT rate"),
        Cell::new_align(&stored.calculation.vat_rate.to_string(), Alignment::RIGHT),
    ]));
    table.add_row(new_float_cash_row("Net expenses", stored.calculation.expenses));
    table.printstd();

    let mut table = new_table();
    table.set_titles(Row::new(vec![
        Cell::new("Partner"),
        Cell::new_align("Profit share", Alignment::RIGHT),
        Cell::new_align("IRPEF", Alignment::RIGHT),
        Cell::new_align("INPS", Alignment::RIGHT),
        Cell::new_align("Net income", Alignment::RIGHT),
    ]));

    for result in &stored.results {
        table.add_row(Row::new(vec![
            Cell::new(&result.partner_name),
            new_cash_cell(result.share),
            new_cash_cell(result.irpef),
            new_cash_cell(result.inps),
            new_cash_cell(result.net_income),
        ]));
    }
    table.printstd();
}

pub fn format_cash(amount: Decimal) -> String {
    let amount = util::round_to(amount, 2);

    let negative = amount.is_sign_negative();
    let whole = amount.abs().trunc();
    let cents = (amount.abs() - whole) * dec!(100);

    format!(
        "{sign}{whole}.{cents:02} €",
        sign = if negative {"-"} else {""},
        whole = whole.to_i64().unwrap_or_default().separated_string(),
        cents = cents.to_i64().unwrap_or_default(),
    )
}

pub fn format_tax_rate(rate: Option<Decimal>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", util::round_to(rate, 2)),
        // Relating taxes to a zero or negative profit makes no sense
        None => "n/a".to_owned(),
    }
}

fn print_title(title: &str) {
    println!();
    println!("{}", Style::new().bold().paint(title));
}

fn new_table() -> Table {
    let mut table = Table::new();

    table.set_format(FormatBuilder::new()
        .padding(0, 2)
        .separator(LinePosition::Title, LineSeparator::new('-', ' ', ' ', ' '))
        .build());

    table
}

fn new_cash_cell(amount: Decimal) -> Cell {
    Cell::new_align(&format_cash(amount), Alignment::RIGHT)
}

fn new_cash_row(label: &str, amount: Decimal) -> Row {
    Row::new(vec![
        Cell::new(label),
        new_cash_cell(amount),
    ])
}

fn new_float_cash_row(label: &str, amount: f64) -> Row {
    Row::new(vec![
        Cell::new(label),
        Cell::new_align(&format!("{:.2} €", amount), Alignment::RIGHT),
    ])
}
