//! Investment strategies the engine can project

use super::purchase_for_rent::PurchaseForRent;
use super::table::ProjectionTable;
use crate::params::InvestmentParameters;

/// Common surface of every investment strategy
pub trait Project {
    /// Human-readable key inputs, one per line
    fn input_summary(&self) -> String;

    /// Projection rows for holding years 1..=years
    fn evaluate(&self, years: u32) -> ProjectionTable;
}

/// Closed set of supported strategies
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    PurchaseForRent(PurchaseForRent),
}

impl Strategy {
    /// Buy-and-hold rental built from validated parameters
    pub fn purchase_for_rent(params: InvestmentParameters) -> Self {
        Strategy::PurchaseForRent(PurchaseForRent::new(params))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::PurchaseForRent(_) => "Purchase for Rent",
        }
    }
}

impl Project for Strategy {
    fn input_summary(&self) -> String {
        match self {
            Strategy::PurchaseForRent(p) => p.input_summary(),
        }
    }

    fn evaluate(&self, years: u32) -> ProjectionTable {
        match self {
            Strategy::PurchaseForRent(p) => p.evaluate(years),
        }
    }
}

impl From<PurchaseForRent> for Strategy {
    fn from(strategy: PurchaseForRent) -> Self {
        Strategy::PurchaseForRent(strategy)
    }
}
