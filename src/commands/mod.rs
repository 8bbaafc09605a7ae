//! Top-level subcommand handlers.
//!
//! Each handler takes the parsed options and a [`Logger`](crate::logging::Logger),
//! calls into the library, and converts typed errors into [`anyhow::Error`].
pub mod backup;
pub mod config;
pub mod hash;
pub mod version;
