//! Report rendering: the same [`ReportSnapshot`] rendered as CSV or PDF.

use engine::Conversion;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use delimited::render_delimited;
pub use error::ReportError;
pub use pdf::{render_document, text_width, wrap};
pub use snapshot::{ReportSnapshot, converted};

mod delimited;
mod error;
mod pdf;
mod snapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Pdf,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
        }
    }
}

/// A rendered report ready to be downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Renders `snapshot` in `format`.
pub fn render(
    snapshot: &ReportSnapshot,
    conversion: &Conversion,
    format: Format,
) -> Result<Artifact, ReportError> {
    let bytes = match format {
        Format::Csv => render_delimited(snapshot, conversion)?,
        Format::Pdf => render_document(snapshot, conversion),
    };
    let filename = format!("{}.{}", snapshot.file_stem(), format.extension());
    debug!("rendered {filename} ({} bytes)", bytes.len());
    Ok(Artifact {
        bytes,
        content_type: format.content_type(),
        filename,
    })
}
