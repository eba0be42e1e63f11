//! Scenario parameters and their loaders

mod data;
pub mod loader;

pub use data::{InvestmentParameters, ParameterInputs};
pub use loader::{load_parameters, load_scenarios, load_scenarios_from_reader, NamedScenario};
