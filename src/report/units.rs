//! Metric unit lookup used for chart axis labels and tick formatting

use crate::format;
use crate::projection::Metric;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display unit of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "")]
    Unitless,
}

impl Unit {
    /// Y-axis description, e.g. "Value (USD)"
    pub fn axis_label(self) -> &'static str {
        match self {
            Unit::Usd => "Value (USD)",
            Unit::Percent => "Value (%)",
            Unit::Unitless => "Value",
        }
    }

    pub fn format_tick(self, value: f64) -> String {
        match self {
            Unit::Usd => format::currency(value),
            Unit::Percent => format::percent_tick(value),
            Unit::Unitless => format::plain_tick(value),
        }
    }
}

/// Metric display name to unit
///
/// Metrics missing from the table are drawn unitless. Callers can replace
/// or extend the table; the renderer never hard-codes units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricUnits(HashMap<String, Unit>);

impl MetricUnits {
    pub fn empty() -> Self {
        MetricUnits(HashMap::new())
    }

    pub fn unit_for(&self, label: &str) -> Unit {
        self.0.get(label).copied().unwrap_or(Unit::Unitless)
    }

    pub fn unit_of(&self, metric: Metric) -> Unit {
        self.unit_for(metric.label())
    }

    /// Set the unit for a display name, replacing any previous entry
    pub fn with(mut self, label: impl Into<String>, unit: Unit) -> Self {
        self.0.insert(label.into(), unit);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MetricUnits {
    fn default() -> Self {
        use Metric::*;

        let usd = [
            Equity,
            CashFlow,
            FutureValue,
            GrossIncome,
            EffectiveGrossIncome,
            OperatingExpenses,
            NetOperatingIncome,
            AnnualDebtService,
            RemainingLoan,
            InterestPaid,
            PrincipalPaid,
            Depreciation,
            PreTaxRevenue,
            PostTaxRevenue,
        ];
        let percent = [CapRate, Roi, BreakEvenOccupancyRate, TotalRoi, EquivalentAnnualRate];

        usd.iter()
            .map(|m| (m.label(), Unit::Usd))
            .chain(percent.iter().map(|m| (m.label(), Unit::Percent)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Unit)> for MetricUnits {
    fn from_iter<I: IntoIterator<Item = (S, Unit)>>(iter: I) -> Self {
        MetricUnits(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let units = MetricUnits::default();
        assert_eq!(units.unit_for("Cash Flow"), Unit::Usd);
        assert_eq!(units.unit_for("Cap Rate"), Unit::Percent);
        assert_eq!(units.unit_for("Equiv Avg Annual IR"), Unit::Percent);
        assert_eq!(units.unit_for("Year"), Unit::Unitless);
        assert!(Metric::ALL.iter().all(|m| units.unit_of(*m) != Unit::Unitless));
    }

    #[test]
    fn test_injected_table() {
        let units = MetricUnits::empty().with("Cash Flow", Unit::Percent);
        assert_eq!(units.unit_of(Metric::CashFlow), Unit::Percent);
        assert_eq!(units.unit_of(Metric::Equity), Unit::Unitless);
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn test_tick_formatting() {
        assert_eq!(Unit::Usd.format_tick(1_234.0), "$1,234");
        assert_eq!(Unit::Percent.format_tick(12.5), "12.5%");
        assert_eq!(Unit::Unitless.format_tick(3.0), "3");
        assert_eq!(Unit::Usd.axis_label(), "Value (USD)");
    }

    #[test]
    fn test_deserialize_from_json() {
        let units: MetricUnits =
            serde_json::from_str(r#"{"Cash Flow": "USD", "Cap Rate": "%"}"#).unwrap();
        assert_eq!(units.unit_for("Cash Flow"), Unit::Usd);
        assert_eq!(units.unit_for("Cap Rate"), Unit::Percent);
    }
}
