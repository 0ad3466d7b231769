//! Errors raised while encoding a report.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("report buffer failed: {0}")]
    Io(#[from] std::io::Error),
}

impl<W> From<csv::IntoInnerError<W>> for ReportError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        Self::Io(err.into_error())
    }
}
