//! Projection engine: amortization, per-year metrics and the projection table

mod amortization;
mod irr;
mod purchase_for_rent;
mod strategy;
mod table;

pub use amortization::{level_payment, AmortizationSchedule, Payments, ScheduledPayment};
pub use irr::{calculate_irr, npv};
pub use purchase_for_rent::PurchaseForRent;
pub use strategy::{Project, Strategy};
pub use table::{Metric, ProjectionSummary, ProjectionTable, YearlyProjection};
