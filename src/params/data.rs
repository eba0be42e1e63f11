//! Investment parameter structures for a single buy-to-rent scenario

use crate::error::ParameterError;
use log::warn;
use serde::{Deserialize, Serialize};

fn default_purchase_price() -> f64 {
    575_000.0
}

fn default_monthly_rent() -> f64 {
    4_300.0
}

fn default_vacancy_rate() -> f64 {
    1.0 / 12.0
}

fn default_monthly_hoa_expenses() -> f64 {
    200.0
}

fn default_property_tax_rate() -> f64 {
    2.2
}

fn default_annual_repair_expenses() -> f64 {
    5_000.0
}

fn default_loan_amount() -> f64 {
    500_000.0
}

fn default_interest_rate() -> f64 {
    2.0
}

fn default_loan_term() -> f64 {
    30.0
}

fn default_appreciation_rate() -> f64 {
    1.0
}

fn default_annual_insurance() -> f64 {
    1_200.0
}

fn default_tax_rate() -> f64 {
    25.0
}

fn default_depreciation_period() -> f64 {
    27.5
}

fn default_inflation_rate() -> f64 {
    2.0
}

/// Raw scenario inputs as a user states them
///
/// Rates are percentages (`2.0` means 2%) except `vacancy_rate`, which is
/// the fraction of the year the unit sits empty. Every field falls back to
/// the reference scenario when omitted from a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInputs {
    #[serde(default = "default_purchase_price")]
    pub purchase_price: f64,

    #[serde(default = "default_monthly_rent")]
    pub monthly_rent: f64,

    /// Fraction of the year without a tenant (0.0 - 1.0)
    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate: f64,

    #[serde(default = "default_monthly_hoa_expenses")]
    pub monthly_hoa_expenses: f64,

    /// Annual property tax as a percentage of the purchase price
    #[serde(default = "default_property_tax_rate")]
    pub property_tax_rate: f64,

    #[serde(default = "default_annual_repair_expenses")]
    pub annual_repair_expenses: f64,

    #[serde(default = "default_loan_amount")]
    pub loan_amount: f64,

    /// Annual mortgage rate (%)
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,

    /// Loan term in years
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,

    /// Annual property value growth (%)
    #[serde(default = "default_appreciation_rate")]
    pub appreciation_rate: f64,

    #[serde(default = "default_annual_insurance")]
    pub annual_insurance: f64,

    /// Marginal income tax rate applied to rental profit (%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Straight-line depreciation period in years
    #[serde(default = "default_depreciation_period")]
    pub depreciation_period: f64,

    /// Annual growth of rent, HOA, repairs and insurance (%)
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
}

impl Default for ParameterInputs {
    fn default() -> Self {
        Self {
            purchase_price: default_purchase_price(),
            monthly_rent: default_monthly_rent(),
            vacancy_rate: default_vacancy_rate(),
            monthly_hoa_expenses: default_monthly_hoa_expenses(),
            property_tax_rate: default_property_tax_rate(),
            annual_repair_expenses: default_annual_repair_expenses(),
            loan_amount: default_loan_amount(),
            interest_rate: default_interest_rate(),
            loan_term: default_loan_term(),
            appreciation_rate: default_appreciation_rate(),
            annual_insurance: default_annual_insurance(),
            tax_rate: default_tax_rate(),
            depreciation_period: default_depreciation_period(),
            inflation_rate: default_inflation_rate(),
        }
    }
}

impl ParameterInputs {
    /// Check the preconditions the engine assumes but never enforces
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("purchase_price", self.purchase_price),
            ("monthly_rent", self.monthly_rent),
            ("vacancy_rate", self.vacancy_rate),
            ("monthly_hoa_expenses", self.monthly_hoa_expenses),
            ("property_tax_rate", self.property_tax_rate),
            ("annual_repair_expenses", self.annual_repair_expenses),
            ("loan_amount", self.loan_amount),
            ("interest_rate", self.interest_rate),
            ("loan_term", self.loan_term),
            ("appreciation_rate", self.appreciation_rate),
            ("annual_insurance", self.annual_insurance),
            ("tax_rate", self.tax_rate),
            ("depreciation_period", self.depreciation_period),
            ("inflation_rate", self.inflation_rate),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ParameterError::Invalid { field, value, reason: "must be finite" });
            }
        }

        // Appreciation and inflation may legitimately be negative
        for (field, value) in fields {
            if matches!(field, "appreciation_rate" | "inflation_rate") {
                continue;
            }
            if value < 0.0 {
                return Err(ParameterError::Invalid { field, value, reason: "must not be negative" });
            }
        }

        if self.vacancy_rate > 1.0 {
            return Err(ParameterError::Invalid {
                field: "vacancy_rate",
                value: self.vacancy_rate,
                reason: "must be a fraction between 0 and 1",
            });
        }

        if self.depreciation_period <= 0.0 {
            return Err(ParameterError::Invalid {
                field: "depreciation_period",
                value: self.depreciation_period,
                reason: "must be positive",
            });
        }

        if self.loan_amount > 0.0 && self.loan_term <= 0.0 {
            return Err(ParameterError::Invalid {
                field: "loan_term",
                value: self.loan_term,
                reason: "must be positive when a loan is taken",
            });
        }

        Ok(())
    }

    /// Convert percentages to fractions and precompute the annual property tax
    pub fn into_parameters(self) -> InvestmentParameters {
        InvestmentParameters::from(self)
    }
}

/// Immutable parameters of a purchase-for-rent scenario
///
/// All rates are decimal fractions. Build through [`ParameterInputs`] so the
/// percent-to-fraction conversion happens exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentParameters {
    purchase_price: f64,
    monthly_rent: f64,
    vacancy_rate: f64,
    monthly_hoa_expenses: f64,
    property_tax_rate: f64,
    /// Year-one property tax in dollars
    property_taxes: f64,
    annual_repair_expenses: f64,
    annual_insurance: f64,
    loan_amount: f64,
    interest_rate: f64,
    loan_term: f64,
    appreciation_rate: f64,
    tax_rate: f64,
    depreciation_period: f64,
    inflation_rate: f64,
}

impl From<ParameterInputs> for InvestmentParameters {
    fn from(inputs: ParameterInputs) -> Self {
        if inputs.loan_amount > inputs.purchase_price {
            warn!(
                "loan amount {} exceeds purchase price {}; initial investment is negative",
                inputs.loan_amount, inputs.purchase_price
            );
        }

        let property_tax_rate = inputs.property_tax_rate / 100.0;

        Self {
            purchase_price: inputs.purchase_price,
            monthly_rent: inputs.monthly_rent,
            vacancy_rate: inputs.vacancy_rate,
            monthly_hoa_expenses: inputs.monthly_hoa_expenses,
            property_tax_rate,
            property_taxes: inputs.purchase_price * property_tax_rate,
            annual_repair_expenses: inputs.annual_repair_expenses,
            annual_insurance: inputs.annual_insurance,
            loan_amount: inputs.loan_amount,
            interest_rate: inputs.interest_rate / 100.0,
            loan_term: inputs.loan_term,
            appreciation_rate: inputs.appreciation_rate / 100.0,
            tax_rate: inputs.tax_rate / 100.0,
            depreciation_period: inputs.depreciation_period,
            inflation_rate: inputs.inflation_rate / 100.0,
        }
    }
}

impl Default for InvestmentParameters {
    fn default() -> Self {
        ParameterInputs::default().into_parameters()
    }
}

impl InvestmentParameters {
    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn monthly_rent(&self) -> f64 {
        self.monthly_rent
    }

    pub fn vacancy_rate(&self) -> f64 {
        self.vacancy_rate
    }

    pub fn monthly_hoa_expenses(&self) -> f64 {
        self.monthly_hoa_expenses
    }

    pub fn property_tax_rate(&self) -> f64 {
        self.property_tax_rate
    }

    pub fn property_taxes(&self) -> f64 {
        self.property_taxes
    }

    pub fn annual_repair_expenses(&self) -> f64 {
        self.annual_repair_expenses
    }

    pub fn annual_insurance(&self) -> f64 {
        self.annual_insurance
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn loan_term(&self) -> f64 {
        self.loan_term
    }

    pub fn appreciation_rate(&self) -> f64 {
        self.appreciation_rate
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn depreciation_period(&self) -> f64 {
        self.depreciation_period
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    /// Cash put down at purchase (price not covered by the loan)
    pub fn initial_investment(&self) -> f64 {
        self.purchase_price - self.loan_amount
    }

    /// Year-one HOA, repair and insurance costs; these grow with inflation
    pub fn inflating_expenses(&self) -> f64 {
        self.monthly_hoa_expenses * 12.0 + self.annual_repair_expenses + self.annual_insurance
    }

    /// Year-one operating expenses before any growth
    pub fn operating_expenses(&self) -> f64 {
        self.inflating_expenses() + self.property_taxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rates_converted_once() {
        let params = InvestmentParameters::default();

        assert_relative_eq!(params.interest_rate(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(params.property_tax_rate(), 0.022, epsilon = 1e-12);
        assert_relative_eq!(params.appreciation_rate(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(params.tax_rate(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(params.inflation_rate(), 0.02, epsilon = 1e-12);
        // Vacancy is already a fraction
        assert_relative_eq!(params.vacancy_rate(), 1.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_property_taxes_precomputed() {
        let params = InvestmentParameters::default();
        assert_relative_eq!(params.property_taxes(), 12_650.0, epsilon = 1e-9);
        assert_relative_eq!(params.operating_expenses(), 2_400.0 + 12_650.0 + 5_000.0 + 1_200.0, epsilon = 1e-9);
        assert_relative_eq!(params.initial_investment(), 75_000.0);
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let inputs: ParameterInputs =
            serde_json::from_str(r#"{"purchase_price": 400000, "interest_rate": 6.5}"#).unwrap();

        assert_eq!(inputs.purchase_price, 400_000.0);
        assert_eq!(inputs.interest_rate, 6.5);
        assert_eq!(inputs.monthly_rent, 4_300.0);
        assert_eq!(inputs.loan_term, 30.0);
    }

    #[test]
    fn test_empty_document_is_reference_scenario() {
        let inputs: ParameterInputs = serde_json::from_str("{}").unwrap();
        assert_eq!(inputs, ParameterInputs::default());

        let params = inputs.into_parameters();
        assert_eq!(params.purchase_price(), 575_000.0);
        assert_eq!(params.monthly_rent(), 4_300.0);
        assert_eq!(params.monthly_hoa_expenses(), 200.0);
        assert_eq!(params.annual_repair_expenses(), 5_000.0);
        assert_eq!(params.annual_insurance(), 1_200.0);
        assert_eq!(params.loan_amount(), 500_000.0);
        assert_eq!(params.loan_term(), 30.0);
        assert_eq!(params.depreciation_period(), 27.5);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(ParameterInputs::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let negative_rent = ParameterInputs { monthly_rent: -1.0, ..Default::default() };
        assert!(matches!(
            negative_rent.validate(),
            Err(ParameterError::Invalid { field: "monthly_rent", .. })
        ));

        let full_vacancy = ParameterInputs { vacancy_rate: 1.5, ..Default::default() };
        assert!(full_vacancy.validate().is_err());

        let no_term = ParameterInputs { loan_term: 0.0, ..Default::default() };
        assert!(no_term.validate().is_err());

        let cash_purchase = ParameterInputs { loan_amount: 0.0, loan_term: 0.0, ..Default::default() };
        assert!(cash_purchase.validate().is_ok());

        let deflation = ParameterInputs { inflation_rate: -1.0, ..Default::default() };
        assert!(deflation.validate().is_ok());

        let nan_price = ParameterInputs { purchase_price: f64::NAN, ..Default::default() };
        assert!(nan_price.validate().is_err());
    }
}
