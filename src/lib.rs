//! Standalone file helpers.
//!
//! Four independent operations, each a complete unit of work:
//!
//! - **[`config::writer`]**: write a section/option/value document as INI text
//! - **[`config::ini`]**: read that text back into a [`config::ConfigDocument`]
//! - **[`backup`]**: copy a file to a timestamped backup, creating the
//!   destination directory when needed
//! - **[`hash`]**: SHA-256 digest of one file, or equality check across several
//!
//! The [`cli`] and [`commands`] modules expose them as the `devtools` binary.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hash;
pub mod locale;
pub mod logging;
