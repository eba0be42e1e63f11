//! Realty ROI - Return projections for buy-to-rent real estate
//!
//! This library provides:
//! - Investment parameters with JSON and CSV scenario loading
//! - A month-by-month amortization schedule for the mortgage
//! - Per-year income, expense, tax and return metrics over a holding period
//! - Parallel batch evaluation of independent scenarios
//! - A grid chart report rendered to PNG or SVG

pub mod error;
pub mod format;
pub mod params;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{ParameterError, ReportError};
pub use params::{InvestmentParameters, NamedScenario, ParameterInputs};
pub use projection::{Metric, Project, ProjectionTable, PurchaseForRent, Strategy, YearlyProjection};
pub use report::{MetricUnits, ReportRenderer, ReportTarget};
pub use scenario::{ScenarioOutcome, ScenarioRunner};
