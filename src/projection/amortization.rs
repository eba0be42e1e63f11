//! Monthly amortization schedule for a fixed-rate loan
//!
//! The schedule is walked once at construction, month by month from the
//! original principal. Per-year queries slice into it instead of replaying
//! the amortization from month 1 every time. Results are identical to a
//! replay because each entry is produced by the same step function.

use log::debug;
use serde::{Deserialize, Serialize};

/// One month of the amortization walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Month number (1-indexed)
    pub month: u32,
    pub opening_balance: f64,
    pub interest: f64,
    /// Actual balance reduction (capped by the outstanding balance)
    pub principal: f64,
    pub closing_balance: f64,
}

/// Level monthly payment that retires `principal` over `num_payments` months
///
/// A zero rate amortizes linearly; no payments at all means no debt service.
pub fn level_payment(principal: f64, monthly_rate: f64, num_payments: f64) -> f64 {
    if num_payments <= 0.0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / num_payments;
    }
    let growth = (1.0 + monthly_rate).powf(num_payments);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Precomputed amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    principal: f64,
    monthly_rate: f64,
    monthly_payment: f64,
    payments: Vec<ScheduledPayment>,
    /// True once the walk drove the balance to zero
    paid_off: bool,
}

impl AmortizationSchedule {
    /// Build the schedule for a loan of `principal` at `annual_rate` (fraction)
    /// over `term_years`
    pub fn new(principal: f64, annual_rate: f64, term_years: f64) -> Self {
        let monthly_rate = annual_rate / 12.0;
        let num_payments = term_years * 12.0;
        let monthly_payment = level_payment(principal, monthly_rate, num_payments);

        let horizon = num_payments.max(0.0).ceil() as u32;
        let mut schedule = Self {
            principal,
            monthly_rate,
            monthly_payment,
            payments: Vec::with_capacity(horizon as usize),
            paid_off: false,
        };

        let mut balance = principal;
        for month in 1..=horizon.max(1) {
            let entry = schedule.step(month, balance);
            schedule.payments.push(entry);
            balance = entry.closing_balance;
            if balance <= 0.0 {
                schedule.paid_off = true;
                break;
            }
        }

        debug!(
            "amortization schedule: principal={:.2} payment={:.2} months={} paid_off={}",
            principal,
            monthly_payment,
            schedule.payments.len(),
            schedule.paid_off
        );

        schedule
    }

    /// Apply one month of interest and payment to `balance`
    fn step(&self, month: u32, balance: f64) -> ScheduledPayment {
        let interest = balance * self.monthly_rate;
        let mut closing = balance - (self.monthly_payment - interest);
        if closing <= 0.0 {
            closing = 0.0;
        }
        ScheduledPayment {
            month,
            opening_balance: balance,
            interest,
            principal: balance - closing,
            closing_balance: closing,
        }
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    /// Precomputed entries; ends at payoff or at the end of the term
    pub fn payments(&self) -> &[ScheduledPayment] {
        &self.payments
    }

    /// Month in which the balance first reaches zero, if within the term
    pub fn payoff_month(&self) -> Option<u32> {
        if self.paid_off {
            self.payments.last().map(|p| p.month)
        } else {
            None
        }
    }

    /// Iterate the walk from month 1
    ///
    /// Past the precomputed horizon the walk continues from the last entry,
    /// so a loan that has not reached zero keeps accruing until it does.
    pub fn iter(&self) -> Payments<'_> {
        Payments {
            schedule: self,
            next_month: 1,
            balance: self.principal,
            done: false,
        }
    }

    /// Outstanding balance after `month` payments (month 0 = original principal)
    pub fn balance_after(&self, month: u32) -> f64 {
        if month == 0 {
            return self.principal;
        }
        if let Some(entry) = self.payments.get(month as usize - 1) {
            return entry.closing_balance;
        }
        if self.paid_off {
            return 0.0;
        }
        self.iter()
            .nth(month as usize - 1)
            .map_or(0.0, |entry| entry.closing_balance)
    }

    /// Interest charged over months `first..=last`
    pub fn interest_between(&self, first: u32, last: u32) -> f64 {
        self.window(first, last).map(|entry| entry.interest).sum()
    }

    /// Principal repaid over months `first..=last`
    pub fn principal_between(&self, first: u32, last: u32) -> f64 {
        self.window(first, last).map(|entry| entry.principal).sum()
    }

    fn window(&self, first: u32, last: u32) -> impl Iterator<Item = ScheduledPayment> + '_ {
        let first = first.max(1);
        let count = if last >= first { (last - first + 1) as usize } else { 0 };
        self.iter().skip(first as usize - 1).take(count)
    }
}

/// Iterator over the amortization walk, see [`AmortizationSchedule::iter`]
pub struct Payments<'a> {
    schedule: &'a AmortizationSchedule,
    next_month: u32,
    balance: f64,
    done: bool,
}

impl Iterator for Payments<'_> {
    type Item = ScheduledPayment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let entry = match self.schedule.payments.get(self.next_month as usize - 1) {
            Some(entry) => *entry,
            None if self.schedule.paid_off => {
                self.done = true;
                return None;
            }
            None => self.schedule.step(self.next_month, self.balance),
        };

        self.next_month += 1;
        self.balance = entry.closing_balance;
        if entry.closing_balance <= 0.0 {
            self.done = true;
        }

        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Month-by-month replay from the original principal, no caching
    fn replay_balance(principal: f64, annual_rate: f64, term_years: f64, months: u32) -> f64 {
        let rate = annual_rate / 12.0;
        let payment = level_payment(principal, rate, term_years * 12.0);
        let mut balance = principal;
        for _ in 0..months {
            let interest = balance * rate;
            balance -= payment - interest;
            if balance <= 0.0 {
                balance = 0.0;
                break;
            }
        }
        balance
    }

    fn replay_interest(principal: f64, annual_rate: f64, term_years: f64, year: u32) -> f64 {
        let rate = annual_rate / 12.0;
        let payment = level_payment(principal, rate, term_years * 12.0);
        let mut balance = principal;
        let mut total = 0.0;
        let start = (year - 1) * 12 + 1;
        let end = year * 12;
        for month in 1..=end {
            let interest = balance * rate;
            if month >= start {
                total += interest;
            }
            balance -= payment - interest;
            if balance <= 0.0 {
                break;
            }
        }
        total
    }

    #[test]
    fn test_level_payment_standard_mortgage() {
        // $500k at 2% over 30 years
        let payment = level_payment(500_000.0, 0.02 / 12.0, 360.0);
        assert_relative_eq!(payment, 1_848.10, epsilon = 0.01);
    }

    #[test]
    fn test_level_payment_zero_rate_is_linear() {
        assert_eq!(level_payment(360_000.0, 0.0, 360.0), 1_000.0);
        assert_eq!(level_payment(360_000.0, 0.01, 0.0), 0.0);
    }

    #[test]
    fn test_schedule_matches_replay() {
        let schedule = AmortizationSchedule::new(500_000.0, 0.02, 30.0);

        for year in [1, 2, 5, 10, 29, 30, 31, 35] {
            assert_eq!(
                schedule.balance_after(year * 12),
                replay_balance(500_000.0, 0.02, 30.0, year * 12),
                "balance mismatch in year {}",
                year
            );
            assert_eq!(
                schedule.interest_between((year - 1) * 12 + 1, year * 12),
                replay_interest(500_000.0, 0.02, 30.0, year),
                "interest mismatch in year {}",
                year
            );
        }
    }

    #[test]
    fn test_balance_reaches_zero_at_term() {
        let schedule = AmortizationSchedule::new(500_000.0, 0.02, 30.0);
        assert!(schedule.balance_after(360) < 1e-6);
        assert_eq!(schedule.balance_after(372), 0.0);
        assert_eq!(schedule.interest_between(373, 384), 0.0);
    }

    #[test]
    fn test_zero_principal_pays_off_immediately() {
        let schedule = AmortizationSchedule::new(0.0, 0.05, 30.0);
        assert_eq!(schedule.monthly_payment(), 0.0);
        assert_eq!(schedule.payoff_month(), Some(1));
        assert_eq!(schedule.balance_after(12), 0.0);
        assert_eq!(schedule.interest_between(1, 12), 0.0);
    }

    #[test]
    fn test_principal_and_interest_sum_to_payments() {
        let schedule = AmortizationSchedule::new(200_000.0, 0.045, 15.0);
        let paid = schedule.interest_between(1, 12) + schedule.principal_between(1, 12);
        assert_relative_eq!(paid, schedule.monthly_payment() * 12.0, epsilon = 1e-6);
        assert_relative_eq!(
            schedule.principal_between(1, 12),
            200_000.0 - schedule.balance_after(12),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_short_term_loan_pays_off_early() {
        // Two-year loan queried far past its term
        let schedule = AmortizationSchedule::new(24_000.0, 0.0, 2.0);
        assert_eq!(schedule.monthly_payment(), 1_000.0);
        assert_eq!(schedule.balance_after(12), 12_000.0);
        assert_eq!(schedule.balance_after(120), 0.0);
        assert!(schedule.payoff_month().is_some());
    }
}
