//! Realty ROI CLI
//!
//! Projects a buy-to-rent investment and prints the yearly table.
//!
//! ```bash
//! # Reference scenario over 30 years
//! realty_roi
//!
//! # Parameters from a file, with a rent override, chart written to disk
//! realty_roi --params deal.json --rent 4800 --chart report.png
//!
//! # Every row of a scenario sheet
//! realty_roi --scenarios deals.csv --years 15
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use realty_roi::params::{load_parameters, load_scenarios};
use realty_roi::projection::{Project, ProjectionSummary, ProjectionTable, Strategy};
use realty_roi::report::{MetricUnits, ReportRenderer, ReportTarget, Unit};
use realty_roi::{ParameterInputs, ScenarioRunner};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Realty ROI - buy-to-rent investment projections
#[derive(Parser, Debug)]
#[command(name = "realty_roi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON parameter file; omitted fields use the reference scenario
    #[arg(long)]
    params: Option<PathBuf>,

    /// CSV sheet with one named scenario per row
    #[arg(long, conflicts_with_all = ["params", "csv", "chart"])]
    scenarios: Option<PathBuf>,

    /// Holding period in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Purchase price override
    #[arg(long)]
    price: Option<f64>,

    /// Monthly rent override
    #[arg(long)]
    rent: Option<f64>,

    /// Loan amount override
    #[arg(long)]
    loan: Option<f64>,

    /// Annual mortgage rate override, in percent
    #[arg(long)]
    interest_rate: Option<f64>,

    /// Write the table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the chart grid to this file (.png or .svg)
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Print JSON instead of a text table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn inputs(&self) -> Result<ParameterInputs> {
        let mut inputs = match &self.params {
            Some(path) => load_parameters(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => ParameterInputs::default(),
        };

        if let Some(price) = self.price {
            inputs.purchase_price = price;
        }
        if let Some(rent) = self.rent {
            inputs.monthly_rent = rent;
        }
        if let Some(loan) = self.loan {
            inputs.loan_amount = loan;
        }
        if let Some(rate) = self.interest_rate {
            inputs.interest_rate = rate;
        }

        inputs.validate().context("invalid parameters")?;
        Ok(inputs)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    input_summary: &'a str,
    summary: ProjectionSummary,
    table: &'a ProjectionTable,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.scenarios {
        Some(path) => run_sheet(&cli, path),
        None => run_single(&cli),
    }
}

fn run_single(cli: &Cli) -> Result<()> {
    let inputs = cli.inputs()?;
    let strategy = Strategy::purchase_for_rent(inputs.into_parameters());

    info!("projecting {} over {} years", strategy.name(), cli.years);
    let table = ScenarioRunner::new().run(&strategy, cli.years);
    let input_summary = strategy.input_summary();

    if cli.json {
        print_json(&[JsonReport {
            name: strategy.name(),
            input_summary: &input_summary,
            summary: table.summary(),
            table: &table,
        }])?;
    } else {
        print_report(strategy.name(), &input_summary, &table);
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        table
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote table to {}", path.display());
    }

    if let Some(path) = &cli.chart {
        ReportRenderer::new(MetricUnits::default())
            .render(&input_summary, &table, ReportTarget::File(path.clone()))
            .with_context(|| format!("rendering chart to {}", path.display()))?;
    }

    Ok(())
}

fn run_sheet(cli: &Cli, path: &Path) -> Result<()> {
    let scenarios = load_scenarios(path)
        .with_context(|| format!("loading scenarios from {}", path.display()))?;
    let outcomes = ScenarioRunner::new().run_scenarios(&scenarios, cli.years);

    if cli.json {
        let reports: Vec<JsonReport> = outcomes
            .iter()
            .map(|o| JsonReport {
                name: &o.name,
                input_summary: &o.input_summary,
                summary: o.table.summary(),
                table: &o.table,
            })
            .collect();
        return print_json(&reports);
    }

    for outcome in &outcomes {
        print_report(&outcome.name, &outcome.input_summary, &outcome.table);
        println!();
    }
    Ok(())
}

fn print_json(reports: &[JsonReport]) -> Result<()> {
    let text = serde_json::to_string_pretty(reports).context("serializing report")?;
    println!("{}", text);
    Ok(())
}

fn print_report(name: &str, input_summary: &str, table: &ProjectionTable) {
    let units = MetricUnits::default();

    println!("{}", name);
    println!("{}\n", "=".repeat(name.len()));
    println!("{}\n", input_summary);

    let widths: Vec<usize> = table.columns().iter().map(|m| m.label().len().max(12)).collect();

    print!("{:>4}", "Year");
    for (metric, width) in table.columns().iter().zip(&widths) {
        print!(" {:>w$}", metric.label(), w = width);
    }
    println!();
    println!("{}", "-".repeat(4 + widths.iter().map(|w| w + 1).sum::<usize>()));

    for row in table.rows() {
        print!("{:>4}", row.year);
        for (metric, width) in table.columns().iter().zip(&widths) {
            print!(" {:>w$}", cell(units.unit_of(*metric), metric.value(row)), w = width);
        }
        println!();
    }

    let summary = table.summary();
    println!("\nSummary:");
    println!("  Years: {}", summary.years);
    println!("  Total Cash Flow: ${:.2}", summary.total_cash_flow);
    println!("  Total Interest Paid: ${:.2}", summary.total_interest_paid);
    println!("  Final Equity: ${:.2}", summary.final_equity);
    if let Some(roi) = summary.final_total_roi {
        println!("  Final Total ROI: {:.2}%", roi);
    }
    if let Some(year) = summary.first_positive_cash_flow_year {
        println!("  First Positive Cash Flow: year {}", year);
    }
    if let Some(year) = summary.loan_paid_off_year {
        println!("  Loan Paid Off: year {}", year);
    }
    if let Some(irr) = summary.investment_irr {
        println!("  Investment IRR: {:.2}%", irr * 100.0);
    }
}

fn cell(unit: Unit, value: Option<f64>) -> String {
    match (unit, value) {
        (Unit::Percent, Some(v)) => format!("{:.2}%", v),
        (_, Some(v)) => format!("{:.2}", v),
        (_, None) => "n/a".to_string(),
    }
}
