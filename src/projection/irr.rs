//! Internal Rate of Return (IRR) calculation
//!
//! Used for the levered return of holding the property and selling at the
//! end of the projection horizon.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Calculate the IRR of a series of periodic cash flows
///
/// Newton-Raphson first, bisection over [-99%, 1000%] when Newton stalls.
///
/// # Arguments
/// * `cashflows` - Cash flows at t = 0, 1, 2... (positive = inflow)
/// * `periods_per_year` - 1 for annual flows, 12 for monthly
///
/// # Returns
/// Annual IRR as a decimal, or None when the flows never change sign
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    // At least one sign change is required for a root to exist
    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    let periodic = newton(cashflows, 0.05 / periods_per_year as f64)
        .or_else(|| bisect(cashflows))?;

    Some((1.0 + periodic).powi(periods_per_year as i32) - 1.0)
}

fn newton(cashflows: &[f64], guess: f64) -> Option<f64> {
    let scale = cashflows.iter().fold(1.0_f64, |acc, cf| acc.max(cf.abs()));
    let mut rate = guess;

    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = (rate - value / slope).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            // A step pinned at a bound is not a root
            return (npv(cashflows, next).abs() < 1e-6 * scale).then_some(next);
        }
        rate = next;
    }

    None
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let mut npv_low = npv(cashflows, low);

    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Net present value at a periodic rate
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut slope = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        value += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            slope -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (value, slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_period_return() {
        // Invest $1000, receive $1100 a year later
        let irr = calculate_irr(&[-1000.0, 1100.0], 1).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_monthly_flows_annualized() {
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert!((irr - 0.10).abs() < 0.001, "Expected ~10% IRR, got {}", irr);
    }

    #[test]
    fn test_npv_zero_at_irr() {
        let flows = [-75_000.0, 5_000.0, 6_000.0, 7_000.0, 120_000.0];
        let irr = calculate_irr(&flows, 1).unwrap();
        assert!(npv(&flows, irr).abs() < 1e-4);
    }

    #[test]
    fn test_root_below_rate_floor() {
        // True IRR is -99.9%, outside the search range
        assert_eq!(calculate_irr(&[-1000.0, 1.0], 1), None);

        let irr = calculate_irr(&[-1000.0, 50.0], 1).unwrap();
        assert_relative_eq!(irr, -0.95, epsilon = 1e-8);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(calculate_irr(&[100.0, 200.0], 1), None);
        assert_eq!(calculate_irr(&[], 1), None);
        assert_eq!(calculate_irr(&[0.0, 0.0], 1), Some(0.0));
    }
}
