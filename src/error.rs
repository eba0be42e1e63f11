//! Error types for parameter loading and report rendering
//!
//! The projection engine itself never fails: degenerate inputs produce
//! well-defined values (see `projection`). Errors only arise at the edges,
//! when reading scenario files or drawing charts.

use thiserror::Error;

/// Errors raised while validating or loading investment parameters
#[derive(Error, Debug)]
pub enum ParameterError {
    /// A field holds a value the engine cannot give meaning to
    #[error("invalid {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed scenario CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while rendering the chart grid
#[derive(Error, Debug)]
pub enum ReportError {
    /// The plotting backend rejected a drawing operation
    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported chart extension: {0}")]
    UnsupportedFormat(String),

    /// PNG output was requested from a build without a font rasterizer
    #[error("PNG rendering needs the `ttf` feature to draw text")]
    NoTextBackend,
}

impl ReportError {
    pub(crate) fn drawing<E: std::fmt::Display>(err: E) -> Self {
        ReportError::Drawing(err.to_string())
    }
}
