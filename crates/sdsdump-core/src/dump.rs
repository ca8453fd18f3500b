//! Full report runs.
//!
//! A run connects to the directory once, opens the report once, and resolves each configured
//! organisation in order, appending entries to the report as they are built.
//!
//! A run either completes (footer written) or fails with the first fatal error. Entries written
//! before a failure stay in the output file; the caller decides whether a partial file is
//! acceptable.

use crate::config::CoreConfig;
use crate::lookup::resolve_each;
use crate::SdsResult;
use sds_directory::{DirectorySearch, LdapDirectory};
use sds_report::ReportWriter;
use std::io::Write;
use std::sync::Arc;

/// Totals from a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub organisations: usize,
    pub entries: usize,
    pub skipped: usize,
}

/// Service that produces the endpoint report.
#[derive(Clone, Debug)]
pub struct DumpService {
    cfg: Arc<CoreConfig>,
}

impl DumpService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Runs a full dump against the configured directory and output file.
    ///
    /// The directory connection is opened before the output file, so a connection failure
    /// leaves no output behind.
    ///
    /// # Errors
    ///
    /// Returns a `SdsError` if:
    /// - the directory cannot be reached or rejects the bind (`Connection`),
    /// - the output file cannot be created or written (`Report`),
    /// - any search fails (`Query`),
    /// - a required attribute is missing and the policy is `Abort` (`MissingField`).
    pub fn run(&self) -> SdsResult<DumpSummary> {
        let mut directory = LdapDirectory::connect(self.cfg.directory())?;
        let mut report =
            ReportWriter::create_file(self.cfg.output_path(), self.cfg.escaping())?;

        let summary = self.write_report(&mut directory, &mut report)?;
        report.finish()?;

        if let Err(e) = directory.close() {
            tracing::warn!("{}", e);
        }

        tracing::info!(
            "wrote {} entries for {} organisation(s) to {}",
            summary.entries,
            summary.organisations,
            self.cfg.output_path().display()
        );
        Ok(summary)
    }

    /// Runs [`DumpService::dump`]; on failure flushes whatever was written before returning
    /// the error. A flush failure at that point is logged, and the dump error is returned.
    fn write_report<D, W>(
        &self,
        directory: &mut D,
        report: &mut ReportWriter<W>,
    ) -> SdsResult<DumpSummary>
    where
        D: DirectorySearch + ?Sized,
        W: Write,
    {
        match self.dump(directory, report) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                if let Err(flush_err) = report.flush() {
                    tracing::warn!(
                        "partial report {} may be incomplete: {}",
                        self.cfg.output_path().display(),
                        flush_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Writes the complete document (header, entries, footer) using the given directory and
    /// report writer. The writer is not flushed.
    pub fn dump<D, W>(
        &self,
        directory: &mut D,
        report: &mut ReportWriter<W>,
    ) -> SdsResult<DumpSummary>
    where
        D: DirectorySearch + ?Sized,
        W: Write,
    {
        report.write_header()?;

        let mut summary = DumpSummary::default();
        for ods_code in self.cfg.ods_codes() {
            tracing::info!("dumping {}", ods_code);
            let stats = resolve_each(
                directory,
                ods_code,
                self.cfg.missing_field_policy(),
                |entry| Ok(report.write_entry(&entry)?),
            )?;
            summary.organisations += 1;
            summary.entries += stats.entries;
            summary.skipped += stats.skipped;
        }

        report.write_footer()?;
        Ok(summary)
    }
}
