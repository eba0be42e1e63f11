//! Grid geometry of the report

/// Fixed two-column grid: one summary panel followed by one panel per metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    /// Panels in use (summary + metrics); the rest are left blank
    pub active: usize,
}

impl GridLayout {
    pub const COLUMNS: usize = 2;

    pub fn for_metrics(metric_count: usize) -> Self {
        let active = metric_count + 1;
        Self {
            rows: (active + Self::COLUMNS - 1) / Self::COLUMNS,
            cols: Self::COLUMNS,
            active,
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Blank trailing cells
    pub fn hidden(&self) -> usize {
        self.cells() - self.active
    }
}
