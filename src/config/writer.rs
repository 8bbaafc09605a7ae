//! INI writer for [`ConfigDocument`].
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use super::ConfigDocument;
use crate::error::ConfigError;

/// Render a document to the on-disk text format.
///
/// Every section is preceded by a blank line. Values are written verbatim:
/// a value containing a newline or an option name containing `=` will not
/// survive a read-back.
///
/// # Examples
///
/// ```
/// use devtools::config::ConfigDocument;
/// use devtools::config::writer::render_config;
///
/// let mut doc = ConfigDocument::new();
/// doc.set("user", "name", "ana");
/// assert_eq!(render_config(&doc), "\n[user]\nname=ana\n");
/// ```
#[must_use]
pub fn render_config(doc: &ConfigDocument) -> String {
    doc.to_string()
}

/// Write `doc` to `path`, creating the file or truncating an existing one.
///
/// Option names are written as given; callers are expected to pass them
/// lowercase, matching what [`read_config`](super::ini::read_config) returns.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be created or written.
pub fn write_config(path: &Path, doc: &ConfigDocument) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write!(out, "{doc}").map_err(io_err)?;
    out.flush().map_err(io_err)?;

    tracing::debug!("wrote {} sections to {}", doc.len(), path.display());
    Ok(())
}
