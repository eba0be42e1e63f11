//! Buy-and-hold rental projection
//!
//! Every metric is a pure function of the parameters and a 1-based holding
//! year. Loan balance and interest come from a schedule precomputed once at
//! construction.
//!
//! Ratio metrics return `None` when their denominator is zero (free
//! property, all-cash purchase financed entirely by debt, zero rent).

use super::amortization::AmortizationSchedule;
use super::strategy::Project;
use super::table::{ProjectionTable, YearlyProjection};
use crate::format;
use crate::params::InvestmentParameters;
use log::debug;

/// Percentage ratio, undefined when the denominator is zero
fn ratio_pct(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator * 100.0)
    }
}

/// Growth factor for `year` with year 1 as the base
fn growth(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(year as i32 - 1)
}

/// Purchase a property, rent it out, and hold it
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseForRent {
    params: InvestmentParameters,
    schedule: AmortizationSchedule,
}

impl PurchaseForRent {
    pub fn new(params: InvestmentParameters) -> Self {
        let schedule = AmortizationSchedule::new(
            params.loan_amount(),
            params.interest_rate(),
            params.loan_term(),
        );
        Self { params, schedule }
    }

    pub fn parameters(&self) -> &InvestmentParameters {
        &self.params
    }

    pub fn schedule(&self) -> &AmortizationSchedule {
        &self.schedule
    }

    /// Rent billed over the year, grown by inflation
    pub fn gross_income(&self, year: u32) -> f64 {
        self.params.monthly_rent() * 12.0 * growth(self.params.inflation_rate(), year)
    }

    /// Gross income net of vacancy loss
    pub fn effective_gross_income(&self, year: u32) -> f64 {
        self.gross_income(year) * (1.0 - self.params.vacancy_rate())
    }

    /// Property taxes track appreciation; HOA, repairs and insurance track inflation
    pub fn operating_expenses_adjusted(&self, year: u32) -> f64 {
        let taxes = self.params.property_taxes() * growth(self.params.appreciation_rate(), year);
        taxes + self.params.inflating_expenses() * growth(self.params.inflation_rate(), year)
    }

    pub fn net_operating_income(&self, year: u32) -> f64 {
        self.effective_gross_income(year) - self.operating_expenses_adjusted(year)
    }

    /// Level mortgage payment; constant for the life of the loan
    pub fn monthly_debt_service(&self) -> f64 {
        self.schedule.monthly_payment()
    }

    pub fn annual_debt_service(&self) -> f64 {
        self.monthly_debt_service() * 12.0
    }

    /// Mortgage payment plus one twelfth of the year's operating expenses
    pub fn monthly_total_expenses(&self, year: u32) -> f64 {
        self.monthly_debt_service() + self.operating_expenses_adjusted(year) / 12.0
    }

    /// Loan balance at the end of `year`
    pub fn remaining_loan(&self, year: u32) -> f64 {
        self.schedule.balance_after(year * 12)
    }

    /// Interest charged during `year`
    pub fn interest_paid(&self, year: u32) -> f64 {
        let (first, last) = year_months(year);
        self.schedule.interest_between(first, last)
    }

    /// Principal repaid during `year`
    pub fn principal_paid(&self, year: u32) -> f64 {
        let (first, last) = year_months(year);
        self.schedule.principal_between(first, last)
    }

    /// Straight-line depreciation; zero when the period is not positive
    pub fn depreciation(&self) -> f64 {
        let period = self.params.depreciation_period();
        if period > 0.0 {
            self.params.purchase_price() / period
        } else {
            0.0
        }
    }

    pub fn pre_tax_revenue(&self, year: u32) -> f64 {
        self.net_operating_income(year) - self.annual_debt_service()
    }

    /// Pre-tax revenue less income tax, with interest and depreciation deducted
    pub fn post_tax_revenue(&self, year: u32) -> f64 {
        let pre_tax = self.pre_tax_revenue(year);
        let taxable_income = pre_tax - self.interest_paid(year) - self.depreciation();
        let tax_liability = (taxable_income * self.params.tax_rate()).max(0.0);
        pre_tax - tax_liability
    }

    /// Cash left after operating costs and the mortgage
    pub fn cash_flow(&self, year: u32) -> f64 {
        self.net_operating_income(year) - self.annual_debt_service()
    }

    pub fn cap_rate(&self, year: u32) -> Option<f64> {
        ratio_pct(self.net_operating_income(year), self.params.purchase_price())
    }

    /// Cash-on-cash return for a single year
    pub fn roi(&self, year: u32) -> Option<f64> {
        ratio_pct(self.cash_flow(year), self.params.initial_investment())
    }

    /// Occupancy at which rent exactly covers expenses and debt service
    pub fn break_even_occupancy_rate(&self, year: u32) -> Option<f64> {
        ratio_pct(12.0 * self.monthly_total_expenses(year), self.gross_income(year))
    }

    /// Property value after `year` years of appreciation
    pub fn future_value(&self, year: u32) -> f64 {
        self.params.purchase_price() * (1.0 + self.params.appreciation_rate()).powi(year as i32)
    }

    pub fn equity(&self, year: u32) -> f64 {
        self.future_value(year) - self.remaining_loan(year)
    }

    /// Cumulative return from equity growth plus all cash flow to date
    pub fn total_roi(&self, year: u32) -> Option<f64> {
        let mut cumulative_cash_flow = 0.0;
        for y in 1..=year {
            cumulative_cash_flow += self.cash_flow(y);
        }
        self.total_roi_with(year, cumulative_cash_flow)
    }

    fn total_roi_with(&self, year: u32, cumulative_cash_flow: f64) -> Option<f64> {
        let initial_investment = self.params.initial_investment();
        let net_gain = self.equity(year) + cumulative_cash_flow - initial_investment;
        ratio_pct(net_gain, initial_investment)
    }

    /// Constant annual rate compounding to the total ROI over `year` years
    pub fn equivalent_annual_rate(&self, year: u32) -> Option<f64> {
        equivalent_rate(self.total_roi(year), year)
    }

    /// Annual IRR of holding for `year` years and selling at market value
    pub fn investment_irr(&self, year: u32) -> Option<f64> {
        self.evaluate(year).investment_irr()
    }

    /// All metrics for one year
    pub fn projection(&self, year: u32) -> YearlyProjection {
        let mut cumulative_cash_flow = 0.0;
        for y in 1..=year {
            cumulative_cash_flow += self.cash_flow(y);
        }
        self.row(year, cumulative_cash_flow)
    }

    fn row(&self, year: u32, cumulative_cash_flow: f64) -> YearlyProjection {
        let total_roi = self.total_roi_with(year, cumulative_cash_flow);

        YearlyProjection {
            year,
            remaining_loan: self.remaining_loan(year),
            annual_debt_service: self.annual_debt_service(),
            interest_paid: self.interest_paid(year),
            principal_paid: self.principal_paid(year),
            gross_income: self.gross_income(year),
            effective_gross_income: self.effective_gross_income(year),
            operating_expenses: self.operating_expenses_adjusted(year),
            net_operating_income: self.net_operating_income(year),
            depreciation: self.depreciation(),
            pre_tax_revenue: self.pre_tax_revenue(year),
            post_tax_revenue: self.post_tax_revenue(year),
            cash_flow: self.cash_flow(year),
            cap_rate: self.cap_rate(year),
            roi: self.roi(year),
            break_even_occupancy_rate: self.break_even_occupancy_rate(year),
            future_value: self.future_value(year),
            equity: self.equity(year),
            total_roi,
            equivalent_annual_rate: equivalent_rate(total_roi, year),
        }
    }
}

impl Project for PurchaseForRent {
    fn input_summary(&self) -> String {
        let p = &self.params;
        [
            format!("Purchase Price: {}", format::currency(p.purchase_price())),
            format!("Monthly Rent: {}", format::currency(p.monthly_rent())),
            format!("Loan Amount: {}", format::currency(p.loan_amount())),
            format!("Interest Rate: {}", format::percent(p.interest_rate() * 100.0, 2)),
            format!("Loan Term: {} years", p.loan_term()),
            format!("Appreciation Rate: {}", format::percent(p.appreciation_rate() * 100.0, 2)),
            format!("Inflation Rate: {}", format::percent(p.inflation_rate() * 100.0, 2)),
        ]
        .join("\n")
    }

    /// Rows for years 1..=years; cumulative cash flow is carried forward
    /// rather than re-summed for every row
    fn evaluate(&self, years: u32) -> ProjectionTable {
        let mut rows = Vec::with_capacity(years as usize);
        let mut cumulative_cash_flow = 0.0;

        for year in 1..=years {
            cumulative_cash_flow += self.cash_flow(year);
            rows.push(self.row(year, cumulative_cash_flow));
        }

        debug!("evaluated purchase-for-rent projection over {} years", years);
        ProjectionTable::new(self.params.initial_investment(), rows)
    }
}

/// First and last month of a 1-based year
fn year_months(year: u32) -> (u32, u32) {
    if year == 0 {
        return (1, 0);
    }
    ((year - 1) * 12 + 1, year * 12)
}

fn equivalent_rate(total_roi: Option<f64>, year: u32) -> Option<f64> {
    let growth = 1.0 + total_roi? / 100.0;
    if year == 0 || growth < 0.0 {
        return None;
    }
    Some((growth.powf(1.0 / year as f64) - 1.0) * 100.0)
}
