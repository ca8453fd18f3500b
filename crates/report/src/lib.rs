//! SDS Dump Report
//!
//! Writes resolved endpoint entries as a small XML-style document:
//!
//! ```text
//! <reference type="sdsDump">
//! <entry asid="…" nacs="…" … endpoint="…"  />
//! </reference>
//! ```
//!
//! Every line ends in CRLF. Entries are appended as they are written; nothing is held back, so a
//! run that fails midway leaves the entries already written in the destination.
//!
//! ## Example Usage
//!
//! ```no_run
//! use sds_report::{Escaping, ReportWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut report = ReportWriter::create_file("sdsdump.xml", Escaping::Markup)?;
//! report.write_header()?;
//! report.write_footer()?;
//! report.finish()?;
//! # Ok(())
//! # }
//! ```

mod writer;

pub use writer::{escape_markup, Escaping, ReportWriter, LINE_ENDING};

/// Errors that can occur while writing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The destination file could not be created
    #[error("Cannot create report file {path}: {source}", path = path.display())]
    Create {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the destination failed
    #[error("Failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

/// Type alias for Results that can fail with a [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;
