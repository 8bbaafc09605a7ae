//! Command: read or write INI configuration files.
use anyhow::{Context as _, Result};

use crate::cli::{ConfigAction, ConfigOpts, ConfigReadOpts, ConfigWriteOpts};
use crate::config::ConfigDocument;
use crate::config::ini::read_config;
use crate::config::writer::{render_config, write_config};
use crate::logging::Logger;

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the file cannot be written, read, or parsed.
pub fn run(opts: &ConfigOpts, log: &Logger) -> Result<()> {
    match &opts.action {
        ConfigAction::Write(write) => run_write(write, log),
        ConfigAction::Read(read) => run_read(read, log),
    }
}

fn run_write(opts: &ConfigWriteOpts, log: &Logger) -> Result<()> {
    let mut doc = ConfigDocument::new();
    for assignment in &opts.set {
        if doc.get(&assignment.section, &assignment.option).is_some() {
            log.warn(&format!(
                "{}.{} set more than once; keeping the last value",
                assignment.section, assignment.option
            ));
        }
        doc.set(
            &assignment.section,
            assignment.option.clone(),
            assignment.value.clone(),
        );
    }

    write_config(&opts.file, &doc)
        .with_context(|| format!("writing {}", opts.file.display()))?;
    log.info(&format!(
        "wrote {} section(s) to {}",
        doc.len(),
        opts.file.display()
    ));
    Ok(())
}

fn run_read(opts: &ConfigReadOpts, log: &Logger) -> Result<()> {
    let doc =
        read_config(&opts.file).with_context(|| format!("reading {}", opts.file.display()))?;
    log.debug(&format!(
        "{} section(s) in {}",
        doc.len(),
        opts.file.display()
    ));

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render_config(&doc));
    }
    Ok(())
}
