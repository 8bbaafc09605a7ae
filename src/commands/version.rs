//! Command: print version information.

/// The version string: `DEVTOOLS_VERSION` baked in at build time, else the
/// crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DEVTOOLS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the devtools version to stdout.
pub fn run() {
    println!("devtools {}", version());
}
