//! Command: copy a file to a timestamped backup.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::backup::{BackupDescriptor, BackupOutcome, BackupRequest, execute};
use crate::cli::{BackupOpts, GlobalOpts};
use crate::logging::Logger;

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if the source cannot be read, the copy fails, or the
/// destination directory could not be created.
pub fn run(global: &GlobalOpts, opts: &BackupOpts, log: &Logger) -> Result<()> {
    let locale = global.locale();
    let mut request = BackupRequest::new(&opts.source)
        .destination_dir(opts.dest.as_str())
        .locale(locale);
    if let Some(name) = &opts.name {
        request = request.name(name.as_str());
    }

    let descriptor = BackupDescriptor::resolve(&request);
    log.stage(&format!("Backing up {}", descriptor.source().display()));

    let outcome = execute(&descriptor, locale)
        .with_context(|| format!("backing up {}", descriptor.source().display()))?;

    match outcome {
        BackupOutcome::Copied {
            destination,
            created_directory,
            ..
        } => {
            if created_directory {
                log.info(&format!("created {}", descriptor.destination_dir()));
            }
            log.info(&format!("backup written to {}", destination.display()));
            Ok(())
        }
        BackupOutcome::DirectoryNotAuthorized { directory } => Err(not_authorized(&directory)),
    }
}

/// Error reported when the destination directory may not be created.
fn not_authorized(directory: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "backup not created: permission denied creating {}",
        directory.display()
    )
}
