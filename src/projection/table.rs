//! Projection output structures: per-year rows, the table and its summary

use super::irr::calculate_irr;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A single row of projection output for one holding year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: u32,

    // Financing
    pub remaining_loan: f64,
    pub annual_debt_service: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,

    // Operations
    pub gross_income: f64,
    pub effective_gross_income: f64,
    pub operating_expenses: f64,
    pub net_operating_income: f64,

    // Tax treatment
    pub depreciation: f64,
    pub pre_tax_revenue: f64,
    pub post_tax_revenue: f64,
    pub cash_flow: f64,

    // Ratios (None when the denominator is zero)
    pub cap_rate: Option<f64>,
    pub roi: Option<f64>,
    pub break_even_occupancy_rate: Option<f64>,

    // Value and cumulative return
    pub future_value: f64,
    pub equity: f64,
    pub total_roi: Option<f64>,
    pub equivalent_annual_rate: Option<f64>,
}

/// Every per-year metric the engine produces, keyed by its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    RemainingLoan,
    GrossIncome,
    EffectiveGrossIncome,
    OperatingExpenses,
    NetOperatingIncome,
    AnnualDebtService,
    InterestPaid,
    PrincipalPaid,
    Depreciation,
    PreTaxRevenue,
    PostTaxRevenue,
    CashFlow,
    CapRate,
    Roi,
    BreakEvenOccupancyRate,
    FutureValue,
    Equity,
    TotalRoi,
    EquivalentAnnualRate,
}

impl Metric {
    pub const ALL: [Metric; 19] = [
        Metric::RemainingLoan,
        Metric::GrossIncome,
        Metric::EffectiveGrossIncome,
        Metric::OperatingExpenses,
        Metric::NetOperatingIncome,
        Metric::AnnualDebtService,
        Metric::InterestPaid,
        Metric::PrincipalPaid,
        Metric::Depreciation,
        Metric::PreTaxRevenue,
        Metric::PostTaxRevenue,
        Metric::CashFlow,
        Metric::CapRate,
        Metric::Roi,
        Metric::BreakEvenOccupancyRate,
        Metric::FutureValue,
        Metric::Equity,
        Metric::TotalRoi,
        Metric::EquivalentAnnualRate,
    ];

    /// Columns of the standard report, in order (after "Year")
    pub const REPORT_COLUMNS: [Metric; 10] = [
        Metric::RemainingLoan,
        Metric::GrossIncome,
        Metric::OperatingExpenses,
        Metric::NetOperatingIncome,
        Metric::AnnualDebtService,
        Metric::CashFlow,
        Metric::CapRate,
        Metric::BreakEvenOccupancyRate,
        Metric::FutureValue,
        Metric::TotalRoi,
    ];

    /// Display name used for table headers, chart titles and unit lookup
    pub fn label(self) -> &'static str {
        match self {
            Metric::RemainingLoan => "Remaining Loan",
            Metric::GrossIncome => "Gross Income",
            Metric::EffectiveGrossIncome => "Effective Gross Income",
            Metric::OperatingExpenses => "Operating Expenses",
            Metric::NetOperatingIncome => "Net Operating Income",
            Metric::AnnualDebtService => "Annual Debt Service",
            Metric::InterestPaid => "Interest Paid",
            Metric::PrincipalPaid => "Principal Paid",
            Metric::Depreciation => "Depreciation",
            Metric::PreTaxRevenue => "Pre-Tax Revenue",
            Metric::PostTaxRevenue => "Post-Tax Revenue",
            Metric::CashFlow => "Cash Flow",
            Metric::CapRate => "Cap Rate",
            Metric::Roi => "ROI",
            Metric::BreakEvenOccupancyRate => "Break-Even Occupancy Rate",
            Metric::FutureValue => "Future Value",
            Metric::Equity => "Equity",
            Metric::TotalRoi => "Total ROI",
            Metric::EquivalentAnnualRate => "Equiv Avg Annual IR",
        }
    }

    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.label() == label)
    }

    /// Read this metric from a row
    pub fn value(self, row: &YearlyProjection) -> Option<f64> {
        match self {
            Metric::RemainingLoan => Some(row.remaining_loan),
            Metric::GrossIncome => Some(row.gross_income),
            Metric::EffectiveGrossIncome => Some(row.effective_gross_income),
            Metric::OperatingExpenses => Some(row.operating_expenses),
            Metric::NetOperatingIncome => Some(row.net_operating_income),
            Metric::AnnualDebtService => Some(row.annual_debt_service),
            Metric::InterestPaid => Some(row.interest_paid),
            Metric::PrincipalPaid => Some(row.principal_paid),
            Metric::Depreciation => Some(row.depreciation),
            Metric::PreTaxRevenue => Some(row.pre_tax_revenue),
            Metric::PostTaxRevenue => Some(row.post_tax_revenue),
            Metric::CashFlow => Some(row.cash_flow),
            Metric::CapRate => row.cap_rate,
            Metric::Roi => row.roi,
            Metric::BreakEvenOccupancyRate => row.break_even_occupancy_rate,
            Metric::FutureValue => Some(row.future_value),
            Metric::Equity => Some(row.equity),
            Metric::TotalRoi => row.total_roi,
            Metric::EquivalentAnnualRate => row.equivalent_annual_rate,
        }
    }
}

/// Complete projection result for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    /// Cash invested at purchase, needed for the IRR
    initial_investment: f64,

    /// Rows for years 1..=N in order
    rows: Vec<YearlyProjection>,

    /// Metric columns shown in reports, in order
    columns: Vec<Metric>,
}

impl ProjectionTable {
    pub fn new(initial_investment: f64, rows: Vec<YearlyProjection>) -> Self {
        Self {
            initial_investment,
            rows,
            columns: Metric::REPORT_COLUMNS.to_vec(),
        }
    }

    /// Replace the report column selection
    pub fn with_columns(mut self, columns: Vec<Metric>) -> Self {
        self.columns = columns;
        self
    }

    pub fn initial_investment(&self) -> f64 {
        self.initial_investment
    }

    pub fn rows(&self) -> &[YearlyProjection] {
        &self.rows
    }

    pub fn columns(&self) -> &[Metric] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a 1-based year
    pub fn row(&self, year: u32) -> Option<&YearlyProjection> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// (year, value) pairs of one metric
    pub fn series(&self, metric: Metric) -> Vec<(u32, Option<f64>)> {
        self.rows.iter().map(|r| (r.year, metric.value(r))).collect()
    }

    /// Write the report columns as CSV with display headers
    ///
    /// Undefined ratios are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Year"];
        header.extend(self.columns.iter().map(|m| m.label()));
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(
                self.columns
                    .iter()
                    .map(|m| m.value(row).map(|v| v.to_string()).unwrap_or_default()),
            );
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Annual IRR of buying, collecting cash flow and selling at the final year
    ///
    /// Cash flows: -initial investment, then each year's cash flow, with the
    /// final year's equity added as sale proceeds.
    pub fn investment_irr(&self) -> Option<f64> {
        let last = self.rows.last()?;
        let mut flows = Vec::with_capacity(self.rows.len() + 1);
        flows.push(-self.initial_investment);
        flows.extend(self.rows.iter().map(|r| r.cash_flow));
        if let Some(final_flow) = flows.last_mut() {
            *final_flow += last.equity;
        }
        calculate_irr(&flows, 1)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_cash_flow: f64 = self.rows.iter().map(|r| r.cash_flow).sum();
        let total_interest_paid: f64 = self.rows.iter().map(|r| r.interest_paid).sum();

        let final_equity = self.rows.last().map(|r| r.equity).unwrap_or(0.0);
        let final_total_roi = self.rows.last().and_then(|r| r.total_roi);
        let first_positive_cash_flow_year =
            self.rows.iter().find(|r| r.cash_flow > 0.0).map(|r| r.year);
        let loan_paid_off_year = self
            .rows
            .iter()
            .find(|r| r.remaining_loan < 0.005)
            .map(|r| r.year);

        ProjectionSummary {
            years: self.rows.len() as u32,
            total_cash_flow,
            total_interest_paid,
            final_equity,
            final_total_roi,
            first_positive_cash_flow_year,
            loan_paid_off_year,
            investment_irr: self.investment_irr(),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_cash_flow: f64,
    pub total_interest_paid: f64,
    pub final_equity: f64,
    pub final_total_roi: Option<f64>,
    pub first_positive_cash_flow_year: Option<u32>,
    pub loan_paid_off_year: Option<u32>,
    /// Annual IRR as a decimal
    pub investment_irr: Option<f64>,
}
