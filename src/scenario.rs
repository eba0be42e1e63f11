//! Scenario runner for batch projections
//!
//! Scenarios are independent, so batches fan out over rayon and come back
//! in input order. Nothing is aggregated across scenarios.

use crate::params::NamedScenario;
use crate::projection::{Metric, Project, ProjectionTable, Strategy};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

/// Projection for one named scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub input_summary: String,
    pub table: ProjectionTable,
}

/// Runs strategies with a shared report column selection
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let tables = runner.run_batch(&strategies, 30);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    columns: Vec<Metric>,
}

impl ScenarioRunner {
    /// Runner producing tables with the standard report columns
    pub fn new() -> Self {
        Self {
            columns: Metric::REPORT_COLUMNS.to_vec(),
        }
    }

    /// Runner producing tables with a custom column selection
    pub fn with_columns(columns: Vec<Metric>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Metric] {
        &self.columns
    }

    /// Evaluate a single strategy
    pub fn run(&self, strategy: &Strategy, years: u32) -> ProjectionTable {
        debug!("running {} over {} years", strategy.name(), years);
        strategy.evaluate(years).with_columns(self.columns.clone())
    }

    /// Evaluate independent strategies in parallel, preserving input order
    pub fn run_batch(&self, strategies: &[Strategy], years: u32) -> Vec<ProjectionTable> {
        strategies.par_iter().map(|s| self.run(s, years)).collect()
    }

    /// Evaluate named parameter sets as purchase-for-rent scenarios
    pub fn run_scenarios(&self, scenarios: &[NamedScenario], years: u32) -> Vec<ScenarioOutcome> {
        info!("running {} scenarios over {} years", scenarios.len(), years);

        scenarios
            .par_iter()
            .map(|scenario| {
                let strategy = Strategy::purchase_for_rent(scenario.inputs.clone().into_parameters());
                ScenarioOutcome {
                    name: scenario.name.clone(),
                    input_summary: strategy.input_summary(),
                    table: self.run(&strategy, years),
                }
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{InvestmentParameters, ParameterInputs};

    fn strategy_with_rent(monthly_rent: f64) -> Strategy {
        let inputs = ParameterInputs {
            monthly_rent,
            ..Default::default()
        };
        Strategy::purchase_for_rent(inputs.into_parameters())
    }

    #[test]
    fn test_run_single() {
        let runner = ScenarioRunner::new();
        let table = runner.run(&Strategy::purchase_for_rent(InvestmentParameters::default()), 30);

        assert_eq!(table.len(), 30);
        assert_eq!(table.columns(), Metric::REPORT_COLUMNS);
    }

    #[test]
    fn test_batch_preserves_order_and_matches_sequential() {
        let runner = ScenarioRunner::new();
        let strategies: Vec<Strategy> = [3_000.0, 4_300.0, 5_500.0, 7_000.0]
            .iter()
            .map(|&rent| strategy_with_rent(rent))
            .collect();

        let batch = runner.run_batch(&strategies, 10);
        assert_eq!(batch.len(), strategies.len());

        for (strategy, table) in strategies.iter().zip(&batch) {
            assert_eq!(*table, runner.run(strategy, 10));
        }

        // Higher rent means higher first-year cash flow
        let first_year: Vec<f64> = batch.iter().map(|t| t.rows()[0].cash_flow).collect();
        assert!(first_year.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_custom_columns_applied() {
        let runner = ScenarioRunner::with_columns(vec![Metric::CashFlow, Metric::Equity]);
        let table = runner.run(&strategy_with_rent(4_300.0), 5);
        assert_eq!(table.columns(), &[Metric::CashFlow, Metric::Equity]);
    }

    #[test]
    fn test_run_named_scenarios() {
        let scenarios = vec![
            NamedScenario {
                name: "base".to_string(),
                inputs: ParameterInputs::default(),
            },
            NamedScenario {
                name: "cash".to_string(),
                inputs: ParameterInputs {
                    loan_amount: 0.0,
                    ..Default::default()
                },
            },
        ];

        let outcomes = ScenarioRunner::new().run_scenarios(&scenarios, 3);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "base");
        assert_eq!(outcomes[1].name, "cash");
        assert!(outcomes[1].input_summary.contains("Loan Amount: $0"));
        assert_eq!(outcomes[1].table.rows()[0].annual_debt_service, 0.0);
    }
}
