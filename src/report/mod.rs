//! Grid report: input summary plus one line chart per metric column

mod layout;
mod renderer;
mod units;

pub use layout::GridLayout;
pub use renderer::{ReportRenderer, ReportTarget};
pub use units::{MetricUnits, Unit};
