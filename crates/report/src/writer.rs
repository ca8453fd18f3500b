//! Report serialisation.

use crate::{ReportError, ReportResult};
use sds_types::Entry;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Line terminator used after the header, each entry and the footer.
pub const LINE_ENDING: &str = "\r\n";

const HEADER: &str = r#"<reference type="sdsDump">"#;
const FOOTER: &str = "</reference>";

/// How attribute values are written into the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Replace `&`, `<`, `>`, `"` and `'` with character entities.
    #[default]
    Markup,
    /// Write values exactly as read from the directory. A value containing `"` or `<` will
    /// produce a malformed document.
    None,
}

/// Escapes the five XML markup characters.
pub fn escape_markup(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Writes the report document to any destination.
///
/// The destination is owned by the writer and released when the writer is dropped, including
/// when a run stops early on an error. [`ReportWriter::finish`] flushes and hands the
/// destination back.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    out: W,
    escaping: Escaping,
    entries_written: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and wraps it in a buffered report writer.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Create`] if the file cannot be created.
    pub fn create_file(path: impl AsRef<Path>, escaping: Escaping) -> ReportResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ReportError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), escaping))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, escaping: Escaping) -> Self {
        Self {
            out,
            escaping,
            entries_written: 0,
        }
    }

    pub fn write_header(&mut self) -> ReportResult<()> {
        write!(self.out, "{HEADER}{LINE_ENDING}")?;
        Ok(())
    }

    /// Appends one self-contained `<entry … />` element.
    pub fn write_entry(&mut self, entry: &Entry) -> ReportResult<()> {
        let mut line = String::from("<entry ");
        for (name, value) in entry.attributes() {
            let value = match self.escaping {
                Escaping::Markup => escape_markup(value),
                Escaping::None => Cow::Borrowed(value),
            };
            line.push_str(name);
            line.push_str("=\"");
            line.push_str(&value);
            line.push_str("\" ");
        }
        line.push_str(" />");
        line.push_str(LINE_ENDING);

        self.out.write_all(line.as_bytes())?;
        self.entries_written += 1;
        Ok(())
    }

    pub fn write_footer(&mut self) -> ReportResult<()> {
        write!(self.out, "{FOOTER}{LINE_ENDING}")?;
        Ok(())
    }

    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Pushes buffered output through to the destination without finishing the document.
    pub fn flush(&mut self) -> ReportResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flushes buffered output and returns the destination.
    pub fn finish(mut self) -> ReportResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
