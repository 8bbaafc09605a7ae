//! Command: digest one file or compare several.
use anyhow::{Context as _, Result};

use crate::cli::HashOpts;
use crate::hash::{HashCheck, check_hash};
use crate::logging::Logger;

/// Run the hash command.
///
/// Prints the hex digest for a single file. For several files, prints
/// `match` or `mismatch` and fails on a mismatch.
///
/// # Errors
///
/// Returns an error if a file cannot be read, or if the files differ.
pub fn run(opts: &HashOpts, log: &Logger) -> Result<()> {
    log.debug(&format!("hashing {} file(s)", opts.files.len()));
    let check = check_hash(&opts.files).context("computing SHA-256 digests")?;

    if opts.json {
        println!("{}", serde_json::to_string(&check)?);
    }

    match check {
        HashCheck::Digest(digest) => {
            if !opts.json {
                println!("{digest}");
            }
            Ok(())
        }
        HashCheck::Matches(matched) => {
            if !opts.json {
                println!("{}", if matched { "match" } else { "mismatch" });
            }
            if !matched {
                anyhow::bail!("{} files are not identical", opts.files.len());
            }
            log.debug(&format!("all {} files are identical", opts.files.len()));
            Ok(())
        }
    }
}
