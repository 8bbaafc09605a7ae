//! Domain-specific error types for the devtools helpers.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library operations return typed errors (e.g., [`ConfigError`],
//! [`HashError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DevtoolsError
//! ├── Config(ConfigError)   INI reading and writing
//! ├── Backup(BackupError)   source access, directory creation and copying
//! └── Hash(HashError)       file access while digesting
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the devtools helpers.
///
/// Library API for callers that drive several helpers and want a single
/// error type; each operation itself returns its own error and converts
/// into this one with `?`. The `devtools` binary goes straight to
/// [`anyhow::Error`] instead.
#[derive(Error, Debug)]
pub enum DevtoolsError {
    /// Configuration file error (I/O, syntax, duplicates).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backup error (unreadable source, directory creation, copy).
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    /// Hashing error (unreadable file, missing input).
    #[error("Hash error: {0}")]
    Hash(#[from] HashError),
}

/// Errors that arise while reading or writing configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option line appeared before any `[section]` header.
    #[error("{file}: option outside of any section at line {line}: {content}")]
    MissingSectionHeader {
        /// File (or `<string>`) being parsed.
        file: String,
        /// One-based line number.
        line: usize,
        /// Offending line, trimmed.
        content: String,
    },

    /// A section header appeared twice in the same file.
    #[error("{file}: section [{section}] already exists (line {line})")]
    DuplicateSection {
        /// File (or `<string>`) being parsed.
        file: String,
        /// Repeated section name.
        section: String,
        /// One-based line number of the repeated header.
        line: usize,
    },

    /// An option appeared twice within one section.
    #[error("{file}: option '{option}' in section [{section}] already exists (line {line})")]
    DuplicateOption {
        /// File (or `<string>`) being parsed.
        file: String,
        /// Section holding the repeated option.
        section: String,
        /// Repeated option name (lowercased).
        option: String,
        /// One-based line number of the repeated option.
        line: usize,
    },

    /// A line could not be interpreted as a header, option, or comment.
    #[error("Invalid INI syntax in {file} at line {line}: {content}")]
    InvalidSyntax {
        /// File (or `<string>`) being parsed.
        file: String,
        /// One-based line number.
        line: usize,
        /// Offending line, trimmed.
        content: String,
    },

    /// An I/O error occurred while reading or writing a config file.
    #[error("IO error on config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while creating a backup copy.
#[derive(Error, Debug)]
pub enum BackupError {
    /// The source file does not exist or cannot be read.
    #[error("Cannot read backup source {path}: {source}")]
    SourceUnreadable {
        /// Source path as given by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The destination directory could not be created for a reason other
    /// than missing permission.
    #[error("Cannot create backup directory {path}: {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The destination path resolves to the source file itself.
    #[error("Backup destination {path} is the source file itself")]
    SameFile {
        /// Destination path as resolved.
        path: PathBuf,
    },

    /// Copying the source to its destination failed.
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while hashing files.
#[derive(Error, Debug)]
pub enum HashError {
    /// No file paths were supplied.
    #[error("No files given to hash")]
    NoFiles,

    /// A comparison was requested with fewer than two files.
    #[error("Comparing digests requires at least two files, got {0}")]
    NotEnoughFiles(usize),

    /// A file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
