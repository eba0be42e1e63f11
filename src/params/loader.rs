//! Load scenario parameters from JSON documents and CSV scenario sheets

use super::ParameterInputs;
use crate::error::ParameterError;
use csv::Reader;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A scenario row from a CSV sheet, identified by name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedScenario {
    pub name: String,
    pub inputs: ParameterInputs,
}

/// Raw CSV row; blank cells and missing columns fall back to the defaults
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "PurchasePrice", default)]
    purchase_price: Option<f64>,
    #[serde(rename = "MonthlyRent", default)]
    monthly_rent: Option<f64>,
    #[serde(rename = "VacancyRate", default)]
    vacancy_rate: Option<f64>,
    #[serde(rename = "MonthlyHOA", default)]
    monthly_hoa_expenses: Option<f64>,
    #[serde(rename = "PropertyTaxRate", default)]
    property_tax_rate: Option<f64>,
    #[serde(rename = "AnnualRepairs", default)]
    annual_repair_expenses: Option<f64>,
    #[serde(rename = "LoanAmount", default)]
    loan_amount: Option<f64>,
    #[serde(rename = "InterestRate", default)]
    interest_rate: Option<f64>,
    #[serde(rename = "LoanTerm", default)]
    loan_term: Option<f64>,
    #[serde(rename = "AppreciationRate", default)]
    appreciation_rate: Option<f64>,
    #[serde(rename = "AnnualInsurance", default)]
    annual_insurance: Option<f64>,
    #[serde(rename = "TaxRate", default)]
    tax_rate: Option<f64>,
    #[serde(rename = "DepreciationPeriod", default)]
    depreciation_period: Option<f64>,
    #[serde(rename = "InflationRate", default)]
    inflation_rate: Option<f64>,
}

impl CsvRow {
    fn to_scenario(self) -> NamedScenario {
        let base = ParameterInputs::default();
        let inputs = ParameterInputs {
            purchase_price: self.purchase_price.unwrap_or(base.purchase_price),
            monthly_rent: self.monthly_rent.unwrap_or(base.monthly_rent),
            vacancy_rate: self.vacancy_rate.unwrap_or(base.vacancy_rate),
            monthly_hoa_expenses: self.monthly_hoa_expenses.unwrap_or(base.monthly_hoa_expenses),
            property_tax_rate: self.property_tax_rate.unwrap_or(base.property_tax_rate),
            annual_repair_expenses: self.annual_repair_expenses.unwrap_or(base.annual_repair_expenses),
            loan_amount: self.loan_amount.unwrap_or(base.loan_amount),
            interest_rate: self.interest_rate.unwrap_or(base.interest_rate),
            loan_term: self.loan_term.unwrap_or(base.loan_term),
            appreciation_rate: self.appreciation_rate.unwrap_or(base.appreciation_rate),
            annual_insurance: self.annual_insurance.unwrap_or(base.annual_insurance),
            tax_rate: self.tax_rate.unwrap_or(base.tax_rate),
            depreciation_period: self.depreciation_period.unwrap_or(base.depreciation_period),
            inflation_rate: self.inflation_rate.unwrap_or(base.inflation_rate),
        };

        NamedScenario { name: self.name, inputs }
    }
}

/// Load a single scenario from a JSON document
pub fn load_parameters(path: &Path) -> Result<ParameterInputs, ParameterError> {
    let file = File::open(path)?;
    let inputs: ParameterInputs = serde_json::from_reader(BufReader::new(file))?;
    inputs.validate()?;
    debug!("loaded parameters from {}", path.display());
    Ok(inputs)
}

/// Load every scenario row from a CSV file
pub fn load_scenarios(path: &Path) -> Result<Vec<NamedScenario>, ParameterError> {
    let file = File::open(path)?;
    let scenarios = load_scenarios_from_reader(file)?;
    debug!("loaded {} scenarios from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Load scenario rows from any reader (in-memory sheets, stdin)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<NamedScenario>, ParameterError> {
    let mut reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let scenario = row.to_scenario();
        scenario.inputs.validate()?;
        scenarios.push(scenario);
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_scenarios_with_defaults() {
        let data = "\
Name,PurchasePrice,LoanAmount,InterestRate
Reference,,,
Cheaper,450000,380000,
Cash,575000,0,0
";
        let scenarios = load_scenarios_from_reader(data.as_bytes()).unwrap();

        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].name, "Reference");
        assert_eq!(scenarios[0].inputs, ParameterInputs::default());

        assert_eq!(scenarios[1].inputs.purchase_price, 450_000.0);
        assert_eq!(scenarios[1].inputs.loan_amount, 380_000.0);
        assert_eq!(scenarios[1].inputs.interest_rate, 2.0);

        assert_eq!(scenarios[2].inputs.loan_amount, 0.0);
        assert_eq!(scenarios[2].inputs.interest_rate, 0.0);
    }

    #[test]
    fn test_invalid_row_is_rejected() {
        let data = "Name,VacancyRate\nBroken,2.5\n";
        let err = load_scenarios_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ParameterError::Invalid { field: "vacancy_rate", .. }));
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let data = "Name,MonthlyRent\nTypo,abc\n";
        let err = load_scenarios_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ParameterError::Csv(_)));
    }

    #[test]
    fn test_missing_json_file() {
        let err = load_parameters(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ParameterError::Io(_)));
    }
}
